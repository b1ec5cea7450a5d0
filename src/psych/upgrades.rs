//! Upgrade dependency resolver and effect dispatch.

use crate::error::PurchaseError;

use super::state::{
    Catalog, Currency, Feature, GameState, LogCategory, Requirement, Upgrade, UpgradeEffect,
    UpgradeId,
};
use super::{instability, progression, schedule};

/// Upgrades belonging to one catalog, in declaration order.
pub fn catalog(state: &GameState, catalog: Catalog) -> impl Iterator<Item = &Upgrade> {
    state
        .upgrades
        .iter()
        .filter(move |u| u.def().catalog == catalog)
}

pub fn requirement_met(state: &GameState, requirement: Requirement) -> bool {
    match requirement {
        Requirement::Factories(n) => state.factory_count >= n,
        Requirement::BrainLevel(n) => state.progression.current_tier >= n,
    }
}

/// Dependency and gates only, ignoring whether it was already bought.
fn unlocked(state: &GameState, id: UpgradeId) -> Result<(), PurchaseError> {
    let def = id.def();
    if let Some(parent) = def.depends_on {
        if !state.is_applied(parent) {
            return Err(PurchaseError::DependencyNotMet {
                upgrade: id,
                missing: parent,
            });
        }
    }
    if let Some(req) = def
        .requirements
        .iter()
        .copied()
        .find(|r| !requirement_met(state, *r))
    {
        return Err(PurchaseError::RequirementNotMet {
            upgrade: id,
            requirement: req,
        });
    }
    Ok(())
}

/// Why `id` cannot be bought right now, ignoring cost.
pub fn check_purchasable(state: &GameState, id: UpgradeId) -> Result<(), PurchaseError> {
    if state.is_applied(id) {
        return Err(PurchaseError::AlreadyApplied(id));
    }
    unlocked(state, id)
}

pub fn is_purchasable(state: &GameState, id: UpgradeId) -> bool {
    check_purchasable(state, id).is_ok()
}

/// Entries whose dependency and gates are met, purchased ones included.
pub fn visible_upgrades(state: &GameState, cat: Catalog) -> Vec<UpgradeId> {
    catalog(state, cat)
        .filter(|u| unlocked(state, u.id).is_ok())
        .map(|u| u.id)
        .collect()
}

/// Buy an upgrade. On any failure the state is unchanged apart from the log.
pub fn purchase(state: &mut GameState, id: UpgradeId) -> Result<(), PurchaseError> {
    let def = id.def();
    if let Err(e) = check_purchasable(state, id) {
        state.log_message(&e.to_string(), LogCategory::Info);
        return Err(e);
    }
    if let Err(e) = state.ledger.spend_all(def.costs) {
        state.log_message(&format!("Cannot afford {}: {}", def.name, e), LogCategory::Warning);
        return Err(e.into());
    }

    if let Some(u) = state.upgrade_mut(id) {
        u.effect_applied = true;
    }
    if def.brain {
        let brain_cost: f64 = def
            .costs
            .iter()
            .filter(|c| c.currency == Currency::Neurons)
            .map(|c| c.amount)
            .sum();
        state.ledger.neurons_spent_on_brain += brain_cost;
    }
    state.log_message(&format!("Purchased: {}", def.name), LogCategory::Upgrade);
    for effect in def.effects {
        apply_effect(state, *effect);
    }
    if def.catalog == Catalog::Proliferation {
        let rate = state.rates.passive_neurons_per_sec;
        state.rates.passive_neurons_per_sec = (rate * 100.0).round() / 100.0;
    }
    state.purchase_flash = 5;
    Ok(())
}

/// Buy by string id, as a UI button or save file would name it.
pub fn purchase_by_key(state: &mut GameState, key: &str) -> Result<(), PurchaseError> {
    match UpgradeId::parse(key) {
        Some(id) => purchase(state, id),
        None => {
            tracing::warn!(key, "purchase requested for unknown upgrade");
            Err(PurchaseError::UnknownUpgrade(key.to_string()))
        }
    }
}

/// Run one upgrade effect.
pub fn apply_effect(state: &mut GameState, effect: UpgradeEffect) {
    match effect {
        UpgradeEffect::AdvanceTier(tier) => progression::advance_tier(state, tier),
        UpgradeEffect::ActivateAmygdala => {
            let rate = state.rates.passive_neurons_per_sec;
            state.rates.passive_neurons_per_sec = (if rate > 0.0 { rate } else { 0.1 }) * 2.0;
            instability::activate_amygdala(state);
            state.log_message("Amygdala activated! Production boosted.", LogCategory::Unlock);
        }
        UpgradeEffect::UnlockAllMinigames => {
            progression::unlock_remaining_minigames(
                state,
                Some("Pleasure center engaged! Minigames available."),
            );
        }
        UpgradeEffect::RevealFactory => {
            progression::unlock_feature(state, Feature::FactoryPanel);
        }
        UpgradeEffect::AddPassiveRate(amount) => {
            state.rates.passive_neurons_per_sec += amount;
        }
        UpgradeEffect::ScalePassiveRate { percent } => {
            state.rates.passive_neurons_per_sec *= 1.0 + percent / 100.0;
        }
        UpgradeEffect::ScaleFuelUse { manual, passive } => {
            state.rates.manual_fuel_multiplier *= manual;
            state.rates.passive_fuel_multiplier *= passive;
        }
        UpgradeEffect::RaiseAnxiety(amount) => instability::increase_meter(state, amount),
        UpgradeEffect::StartRecurring(action) => {
            schedule::start(state, action);
        }
    }
}

/// Restart runtime effects of already-applied upgrades after a load.
/// Balance effects are not replayed; their results are in the save.
pub fn restore_runtime_effects(state: &mut GameState) {
    let applied: Vec<UpgradeId> = state
        .upgrades
        .iter()
        .filter(|u| u.effect_applied)
        .map(|u| u.id)
        .collect();
    for id in applied {
        for effect in id.def().effects {
            match *effect {
                UpgradeEffect::StartRecurring(action) => {
                    schedule::start(state, action);
                }
                UpgradeEffect::RevealFactory => {
                    progression::unlock_feature(state, Feature::FactoryPanel);
                }
                UpgradeEffect::UnlockAllMinigames => {
                    progression::unlock_remaining_minigames(state, None);
                }
                UpgradeEffect::ActivateAmygdala => {
                    state.instability.amygdala_online = false;
                    instability::activate_amygdala(state);
                }
                _ => {}
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::psych::state::upgrade_defs;
    use proptest::prelude::*;

    fn any_upgrade() -> impl Strategy<Value = UpgradeId> {
        (0..upgrade_defs().len()).prop_map(|i| upgrade_defs()[i].id)
    }

    proptest! {
        #[test]
        fn child_never_before_parent(
            order in proptest::collection::vec(any_upgrade(), 1..40),
        ) {
            let mut state = GameState::new();
            state.ledger.neurons = 1e9;
            state.ledger.psychbucks = 1e9;
            state.factory_count = 10;
            for id in order {
                let parent_done = id.def().depends_on.map_or(true, |p| state.is_applied(p));
                let ok = purchase(&mut state, id).is_ok();
                if ok {
                    prop_assert!(parent_done);
                }
            }
        }

        #[test]
        fn double_purchase_never_double_charges(id in any_upgrade()) {
            let mut state = GameState::new();
            state.ledger.neurons = 1e9;
            state.ledger.psychbucks = 1e9;
            state.factory_count = 10;
            state.progression.current_tier = 3;
            for u in state.upgrades.iter_mut() {
                if Some(u.id) == id.def().depends_on {
                    u.effect_applied = true;
                }
            }
            let first = purchase(&mut state, id);
            let after_first = state.ledger.clone();
            let rates_after_first = state.rates.clone();
            let second = purchase(&mut state, id);
            prop_assert!(first.is_ok());
            prop_assert_eq!(second, Err(PurchaseError::AlreadyApplied(id)));
            prop_assert_eq!(state.ledger, after_first);
            prop_assert_eq!(state.rates, rates_after_first);
        }
    }
}
