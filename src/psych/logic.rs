//! Universal Psychology game loop: pure functions over `GameState`.

use super::state::{Feature, GameState};
use super::{instability, ledger, quiz, schedule};

/// Ticks in one game step. The clock runs at 10 ticks/sec.
pub const TICKS_PER_STEP: u32 = 10;

/// Samples kept for the neuron/fuel sparkline.
const HISTORY_LEN: usize = 50;

/// Advance the game by `delta_ticks` ticks.
pub fn tick(state: &mut GameState, delta_ticks: u32) {
    for _ in 0..delta_ticks {
        schedule::advance_tick(state);

        state.sub_step_ticks += 1;
        if state.sub_step_ticks >= TICKS_PER_STEP {
            state.sub_step_ticks = 0;
            step(state);
        }

        state.autosave_countdown = state.autosave_countdown.saturating_sub(1);
        if state.autosave_countdown == 0 {
            state.save_requested = true;
            state.autosave_countdown = state.tuning.autosave_interval_secs.saturating_mul(TICKS_PER_STEP);
        }
    }
    if state.purchase_flash > 0 {
        state.purchase_flash = state.purchase_flash.saturating_sub(delta_ticks);
    }
}

/// One second of game time. Instability runs before generation so the
/// generation clamp sees this step's attack state.
pub fn step(state: &mut GameState) {
    instability::update(state);
    ledger::passive_step(state);
    quiz::ensure_question(state);

    state.total_steps += 1;
    state.history.push((state.ledger.neurons, state.ledger.neuro_fuel));
    if state.history.len() > HISTORY_LEN {
        state.history.remove(0);
    }
}

/// Nudge the hypothalamus sliders. Both stay within 0..=100, and nothing
/// moves until the controls are unlocked.
pub fn adjust_controls(state: &mut GameState, dopamine_delta: i16, gaba_delta: i16) -> bool {
    if !state.progression.is_unlocked(Feature::HypothalamusControls) {
        return false;
    }
    let nudge = |value: u8, delta: i16| (value as i16 + delta).clamp(0, 100) as u8;
    state.controls.dopamine = nudge(state.controls.dopamine, dopamine_delta);
    state.controls.gaba = nudge(state.controls.gaba, gaba_delta);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psych::state::RecurringAction;

    #[test]
    fn tick_zero_does_nothing() {
        let mut state = GameState::new();
        state.rates.passive_neurons_per_sec = 1.0;
        tick(&mut state, 0);
        assert_eq!(state.ledger.neurons, 0.0);
        assert_eq!(state.total_steps, 0);
    }

    #[test]
    fn passive_income_per_second() {
        let mut state = GameState::new();
        state.rates.passive_neurons_per_sec = 2.0;
        tick(&mut state, 9);
        assert_eq!(state.ledger.neurons, 0.0);
        tick(&mut state, 1);
        assert!((state.ledger.neurons - 2.0).abs() < 0.001);
        assert!((state.ledger.neuro_fuel - 8.0).abs() < 0.001);
    }

    #[test]
    fn partial_frames_accumulate_into_steps() {
        let mut state = GameState::new();
        state.rates.passive_neurons_per_sec = 1.0;
        for _ in 0..10 {
            tick(&mut state, 3);
        }
        assert_eq!(state.total_steps, 3);
    }

    #[test]
    fn history_is_bounded() {
        let mut state = GameState::new();
        tick(&mut state, 10 * 80);
        assert_eq!(state.history.len(), 50);
    }

    #[test]
    fn autosave_flag_raised_every_interval() {
        let mut state = GameState::new();
        tick(&mut state, 99);
        assert!(!state.save_requested);
        tick(&mut state, 1);
        assert!(state.save_requested);
    }

    #[test]
    fn attack_halts_income_in_same_step() {
        let mut state = GameState::new();
        state.progression.current_tier = 2;
        state.controls.dopamine = 100;
        state.rates.passive_neurons_per_sec = 5.0;
        state.ledger.neurons = 100.0;
        state.ledger.neuro_fuel = 1000.0;
        state.instability.meter = 65.0;
        state.instability.sustained_high_input_time = 20;
        tick(&mut state, 10);
        assert!(state.instability.attack_active);
        assert!((state.ledger.neurons - 80.0).abs() < 0.001);
    }

    #[test]
    fn scheduler_runs_before_step() {
        let mut state = GameState::new();
        schedule::start(&mut state, RecurringAction::AutoClick);
        tick(&mut state, 10);
        assert!((state.ledger.neurons - 1.0).abs() < 0.001);
    }

    #[test]
    fn controls_locked_until_hypothalamus() {
        let mut state = GameState::new();
        assert!(!adjust_controls(&mut state, 10, 0));
        assert_eq!(state.controls.dopamine, 0);
    }

    #[test]
    fn controls_clamp_to_range() {
        let mut state = GameState::new();
        state
            .progression
            .unlocked_features
            .insert(Feature::HypothalamusControls);
        assert!(adjust_controls(&mut state, 95, -10));
        assert_eq!(state.controls.dopamine, 95);
        assert_eq!(state.controls.gaba, 0);
        adjust_controls(&mut state, 10, 250);
        assert_eq!(state.controls.dopamine, 100);
        assert_eq!(state.controls.gaba, 100);
    }
}
