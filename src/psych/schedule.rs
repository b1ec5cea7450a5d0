//! Recurring background actions on the tick clock.
//!
//! A running action owns one timer counting down in ticks. Starting an
//! action that already has a timer does nothing; stopping drops the timer.

use std::collections::BTreeMap;

use super::logic::TICKS_PER_STEP;
use super::state::{GameState, LogCategory, RecurringAction};
use super::{instability, ledger, supplies};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scheduler {
    /// Ticks left until each running action fires.
    timers: BTreeMap<RecurringAction, u32>,
}

impl Scheduler {
    pub fn is_running(&self, action: RecurringAction) -> bool {
        self.timers.contains_key(&action)
    }

    pub fn running(&self) -> impl Iterator<Item = RecurringAction> + '_ {
        self.timers.keys().copied()
    }

    pub fn ticks_until(&self, action: RecurringAction) -> Option<u32> {
        self.timers.get(&action).copied()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

/// Delay before `action` next fires.
fn next_delay(state: &mut GameState, action: RecurringAction) -> u32 {
    let secs = |s: u32| s.saturating_mul(TICKS_PER_STEP).max(1);
    match action {
        RecurringAction::IntermittentFasting => secs(state.tuning.intermittent_fasting_interval_secs),
        RecurringAction::AutoClick => secs(state.tuning.auto_click_interval_secs),
        RecurringAction::ScaryStimuli => secs(state.tuning.scary_stimuli_interval_secs),
        RecurringAction::IrregularSnacks => {
            let ms = state.random_between(
                state.tuning.irregular_snack_min_ms,
                state.tuning.irregular_snack_max_ms,
            );
            let ms_per_tick = 1000 / TICKS_PER_STEP;
            (ms / ms_per_tick).max(1)
        }
    }
}

/// Begin a recurring action. Returns false if it was already running.
pub fn start(state: &mut GameState, action: RecurringAction) -> bool {
    if state.scheduler.is_running(action) {
        return false;
    }
    let delay = next_delay(state, action);
    state.scheduler.timers.insert(action, delay);
    let text = format!("{} activated.", action.name());
    let category = match action {
        RecurringAction::ScaryStimuli => LogCategory::Warning,
        _ => LogCategory::Info,
    };
    state.log_message(&text, category);
    true
}

/// Cancel a recurring action. Returns false if it was not running.
pub fn stop(state: &mut GameState, action: RecurringAction) -> bool {
    if state.scheduler.timers.remove(&action).is_none() {
        return false;
    }
    state.log_message(&format!("{} stopped.", action.name()), LogCategory::Info);
    true
}

pub fn is_running(state: &GameState, action: RecurringAction) -> bool {
    state.scheduler.is_running(action)
}

/// Advance every timer by one tick and fire whatever came due.
pub fn advance_tick(state: &mut GameState) {
    let mut due = Vec::new();
    for (action, left) in state.scheduler.timers.iter_mut() {
        *left = left.saturating_sub(1);
        if *left == 0 {
            due.push(*action);
        }
    }
    for action in due {
        // Firing may have stopped the action.
        if !state.scheduler.is_running(action) {
            continue;
        }
        let delay = next_delay(state, action);
        state.scheduler.timers.insert(action, delay);
        fire(state, action);
    }
}

fn fire(state: &mut GameState, action: RecurringAction) {
    match action {
        RecurringAction::IntermittentFasting | RecurringAction::IrregularSnacks => {
            // Failures are already in the player log.
            supplies::buy_neurofuel(state).ok();
        }
        RecurringAction::AutoClick => {
            let fuel_left = state
                .ledger
                .clamp_to_fuel(state.rates.neurons_per_click, state.rates.manual_fuel_multiplier);
            if !state.is_attack_active() && fuel_left > 0.0 {
                ledger::generate_manual(state).ok();
            }
        }
        RecurringAction::ScaryStimuli => instability::trigger_stimuli_batch(state),
    }
}
