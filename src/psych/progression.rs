//! Unlock gate sequencer: brain level, feature visibility, quiz bands.

use super::schedule;
use super::state::{
    Difficulty, Feature, GameState, LogCategory, RecurringAction, UpgradeId,
    MINIGAME_UNLOCK_SEQUENCE,
};
use super::supplies;

/// Reveal one feature. Returns false if it was already visible.
pub fn unlock_feature(state: &mut GameState, feature: Feature) -> bool {
    if !state.progression.unlocked_features.insert(feature) {
        return false;
    }
    let text = match feature {
        Feature::UpgradesPanel => "Upgrades are now available!".to_string(),
        Feature::Minigame(game) => format!("Minigame unlocked: {}", game.name()),
        other => format!("Unlocked: {:?}", other),
    };
    state.log_message(&text, LogCategory::Unlock);
    true
}

/// Raise the brain level to at least `tier`.
pub fn unlock_tier(state: &mut GameState, tier: u32) -> bool {
    if tier <= state.progression.current_tier {
        return false;
    }
    state.progression.current_tier = tier;
    true
}

/// Raise the quiz band to at least `difficulty`.
pub fn unlock_difficulty(state: &mut GameState, difficulty: Difficulty) {
    let current = state.progression.difficulty_unlocked;
    if current.map_or(true, |d| d < difficulty) {
        state.progression.difficulty_unlocked = Some(difficulty);
    }
}

/// Unlock the first `level - 1` minigames that are still locked.
/// Returns how many were newly unlocked.
pub fn unlock_features_up_to_tier(state: &mut GameState, level: u32) -> usize {
    let count = (level.saturating_sub(1) as usize).min(MINIGAME_UNLOCK_SEQUENCE.len());
    MINIGAME_UNLOCK_SEQUENCE[..count]
        .iter()
        .filter(|game| unlock_feature(state, Feature::Minigame(**game)))
        .count()
}

pub fn unlock_remaining_minigames(state: &mut GameState, reason: Option<&str>) -> usize {
    let locked: Vec<_> = MINIGAME_UNLOCK_SEQUENCE
        .iter()
        .copied()
        .filter(|g| !state.progression.is_unlocked(Feature::Minigame(*g)))
        .collect();
    if locked.is_empty() {
        return 0;
    }
    if let Some(reason) = reason {
        state.log_message(reason, LogCategory::Unlock);
    }
    for game in &locked {
        unlock_feature(state, Feature::Minigame(*game));
    }
    locked.len()
}

/// Everything a brain level hands out, in one place so load can replay it.
fn grant_tier_features(state: &mut GameState, tier: u32) {
    if tier >= 1 {
        unlock_feature(state, Feature::Questions);
        unlock_feature(state, Feature::ProliferationPanel);
        unlock_feature(state, Feature::NeuroFuel);
        unlock_feature(state, Feature::Projects);
        unlock_difficulty(state, Difficulty::Easy);
    }
    if tier >= 2 {
        unlock_feature(state, Feature::HypothalamusControls);
        unlock_difficulty(state, Difficulty::Medium);
    }
    if tier >= 3 {
        unlock_difficulty(state, Difficulty::Hard);
    }
    unlock_features_up_to_tier(state, tier);
}

/// Effect of a brain-growth upgrade.
pub fn advance_tier(state: &mut GameState, tier: u32) {
    unlock_tier(state, tier);
    supplies::reroll_fuel_cost(state);
    grant_tier_features(state, tier);
    let text = match tier {
        1 => "Brain Growth I: Easy Qs & Proliferation unlocked.",
        2 => "Brain Growth II: Medium Qs & Hypothalamus unlocked.",
        _ => "Brain Growth III: Hard Qs & Amygdala research.",
    };
    if tier >= 3 {
        schedule::start(state, RecurringAction::IrregularSnacks);
    }
    state.log_message(text, LogCategory::Unlock);
}

/// Drop one brain level and re-lock the upgrade that granted it.
///
/// Features, minigames and the quiz band stay unlocked. Returns the
/// upgrade that was re-locked, if any.
pub fn downgrade(state: &mut GameState) -> Option<UpgradeId> {
    let old_tier = state.progression.current_tier;
    if old_tier == 0 {
        return None;
    }
    state.progression.current_tier = old_tier - 1;
    supplies::reroll_fuel_cost(state);

    let relocked = state
        .upgrades
        .iter_mut()
        .find(|u| u.def().progression_tier == Some(old_tier) && u.effect_applied)
        .map(|u| {
            u.effect_applied = false;
            u.id
        });
    if let Some(id) = relocked {
        tracing::info!(upgrade = %id, tier = old_tier - 1, "brain level rolled back");
    }
    relocked
}

/// Replay the unlocks implied by the saved brain level. Used after load.
pub fn restore_features(state: &mut GameState) {
    let tier = state.progression.current_tier;
    grant_tier_features(state, tier);
    if state.progression.current_tier >= 3 {
        schedule::start(state, RecurringAction::IrregularSnacks);
    }
}
