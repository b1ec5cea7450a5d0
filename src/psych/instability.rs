//! Anxiety meter and the Normal/Attack state machine.

use super::phrases::phrase;
use super::progression;
use super::schedule;
use super::state::{GameState, LogCategory, RecurringAction};

/// Coarse readout of the instability state, most severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Attack,
    Stimuli,
    Critical,
    Elevated,
    Moderate,
    Normal,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Attack => "ANXIETY ATTACK",
            Status::Stimuli => "Stimuli detected",
            Status::Critical => "Critical",
            Status::Elevated => "Elevated",
            Status::Moderate => "Moderate",
            Status::Normal => "Normal",
        }
    }
}

pub fn status(state: &GameState) -> Status {
    let inst = &state.instability;
    if inst.attack_active {
        Status::Attack
    } else if inst.active_stimuli > 0 {
        Status::Stimuli
    } else if inst.meter > 60.0 {
        Status::Critical
    } else if inst.meter > 30.0 {
        Status::Elevated
    } else if inst.meter > 0.0 {
        Status::Moderate
    } else {
        Status::Normal
    }
}

fn clamp_meter(state: &mut GameState) {
    let max = state.tuning.max_anxiety;
    let m = state.instability.meter;
    state.instability.meter = if m.is_finite() { m.clamp(0.0, max) } else { 0.0 };
}

/// Push the meter up. Suspended while an attack is running.
pub fn increase_meter(state: &mut GameState, amount: f64) {
    if state.instability.attack_active {
        return;
    }
    state.instability.meter += amount;
    clamp_meter(state);
}

/// True when the hypothalamus is overdriven this step.
fn is_overdriven(state: &GameState) -> bool {
    let d = state.controls.dopamine as f64;
    let g = state.controls.gaba as f64;
    state.progression.current_tier >= 2
        && d > state.tuning.anxiety_dopamine_threshold
        && (g < d * 0.4 || g < 20.0)
}

/// One game step of the state machine.
pub fn update(state: &mut GameState) {
    if state.instability.attack_active {
        let gaba = state.controls.gaba as f64;
        if gaba > 0.0 {
            state.instability.meter =
                (state.instability.meter - gaba / state.tuning.gaba_recovery_divisor).max(0.0);
            if state.instability.meter <= 0.0 {
                recover(state);
            }
        }
        return;
    }

    let delta = if is_overdriven(state) {
        state.instability.sustained_high_input_time += 1;
        let mut rise =
            state.controls.dopamine as f64 / 25.0 * state.tuning.anxiety_increase_factor;
        if state.instability.amygdala_online && state.instability.active_stimuli > 0 {
            rise *= 2.0;
        }
        rise
    } else {
        let inst = &mut state.instability;
        inst.sustained_high_input_time = inst.sustained_high_input_time.saturating_sub(1);
        -(state.tuning.anxiety_decrease_factor
            + state.controls.gaba as f64 / state.tuning.gaba_decay_divisor)
    };
    state.instability.meter += delta;
    clamp_meter(state);

    if state.instability.sustained_high_input_time >= state.tuning.anxiety_time_limit
        && state.instability.meter > state.tuning.anxiety_sustained_threshold
    {
        trigger_attack(state);
    }
}

fn trigger_attack(state: &mut GameState) {
    state.instability.attack_active = true;
    state.instability.sustained_high_input_time = 0;
    let before = state.ledger.neurons;
    state.ledger.neurons = (before * state.tuning.attack_neuron_retention).floor();
    let lost = before - state.ledger.neurons;
    let relocked = progression::downgrade(state);

    tracing::warn!(lost, tier = state.progression.current_tier, "anxiety attack");
    let text = phrase("anxietyAttack", state.progression.current_tier);
    state.log_message(text, LogCategory::Warning);
    state.log_message(
        &format!("Lost {} neurons. Raise GABA to recover.", lost),
        LogCategory::Warning,
    );
    if let Some(id) = relocked {
        let name = id.def().name;
        state.log_message(&format!("{} regressed.", name), LogCategory::Warning);
    }
}

fn recover(state: &mut GameState) {
    state.instability.attack_active = false;
    state.instability.sustained_high_input_time = 0;
    state.log_message("Anxiety subsided.", LogCategory::Info);
}

/// Bring the amygdala online and begin the stimuli timer.
pub fn activate_amygdala(state: &mut GameState) {
    if state.instability.amygdala_online {
        return;
    }
    state.instability.amygdala_online = true;
    schedule::start(state, RecurringAction::ScaryStimuli);
}

/// Replace whatever stimuli are on screen with a fresh batch of 3 to 5.
pub fn trigger_stimuli_batch(state: &mut GameState) {
    if !state.instability.amygdala_online {
        return;
    }
    let count = state.random_between(3, 5);
    state.instability.active_stimuli = count;
    state.log_message(
        &format!("Awareness: {} abrupt stimuli!", count),
        LogCategory::Warning,
    );
}

/// Clear one stimulus. Returns false if none were showing.
pub fn dismiss_stimulus(state: &mut GameState) -> bool {
    if state.instability.active_stimuli == 0 {
        return false;
    }
    state.instability.active_stimuli -= 1;
    if state.instability.active_stimuli == 0 {
        state.log_message("Stimuli cleared. Focus returning.", LogCategory::Info);
    }
    true
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn meter_stays_in_bounds(
            inputs in proptest::collection::vec((0u8..=100, 0u8..=100, -50.0f64..50.0), 1..200),
            tier in 0u32..4,
        ) {
            let mut state = GameState::new();
            state.progression.current_tier = tier;
            state.ledger.neurons = 1000.0;
            for (dopamine, gaba, bump) in inputs {
                state.controls.dopamine = dopamine;
                state.controls.gaba = gaba;
                increase_meter(&mut state, bump);
                let was_active = state.instability.attack_active;
                update(&mut state);
                prop_assert!(state.instability.meter >= 0.0);
                prop_assert!(state.instability.meter <= state.tuning.max_anxiety);
                if !was_active && state.instability.attack_active {
                    prop_assert_eq!(state.instability.sustained_high_input_time, 0);
                }
            }
        }
    }
}
