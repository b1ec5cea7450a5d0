//! Resource ledger arithmetic: debits, fuel clamping, generation.

use crate::error::{GenerateError, LedgerError};

use super::progression;
use super::state::{Cost, Currency, Feature, GameState, Ledger, LogCategory};

/// Modifiers outside this range are clamped before they are applied.
const MODIFIER_RANGE: (f64, f64) = (0.0, 2.0);

impl Ledger {
    /// Spendable balance of a currency.
    pub fn balance(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Neurons => self.neurons,
            Currency::Psychbucks => self.psychbucks,
            Currency::NeuroFuel => self.neuro_fuel,
            Currency::MindOps => (self.mind_ops - self.mind_ops_spent).max(0.0),
        }
    }

    /// Credit generated neurons. The caller clamps `amount` to fuel first.
    pub fn add_primary(&mut self, amount: f64, ops_per_neuron: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.neurons += amount;
        self.total_neurons_generated += amount;
        self.mind_ops += amount * ops_per_neuron;
    }

    /// Debit one currency. Leaves every balance untouched on failure.
    pub fn spend(&mut self, currency: Currency, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Ok(());
        }
        let available = self.balance(currency);
        if amount > available {
            return Err(LedgerError::InsufficientFunds {
                currency,
                needed: amount,
                available,
            });
        }
        match currency {
            Currency::Neurons => self.neurons -= amount,
            Currency::Psychbucks => self.psychbucks -= amount,
            Currency::NeuroFuel => self.neuro_fuel -= amount,
            Currency::MindOps => self.mind_ops_spent += amount,
        }
        Ok(())
    }

    /// First cost in `costs` that the ledger cannot cover, if any.
    fn first_shortfall(&self, costs: &[Cost]) -> Option<LedgerError> {
        costs.iter().find_map(|c| {
            let available = self.balance(c.currency);
            (c.amount > available).then_some(LedgerError::InsufficientFunds {
                currency: c.currency,
                needed: c.amount,
                available,
            })
        })
    }

    pub fn can_afford(&self, costs: &[Cost]) -> bool {
        self.first_shortfall(costs).is_none()
    }

    /// Debit every cost, or none of them.
    pub fn spend_all(&mut self, costs: &[Cost]) -> Result<(), LedgerError> {
        if let Some(err) = self.first_shortfall(costs) {
            return Err(err);
        }
        for c in costs {
            self.spend(c.currency, c.amount)?;
        }
        Ok(())
    }

    /// Largest generation the current fuel can pay for.
    pub fn clamp_to_fuel(&self, requested: f64, multiplier: f64) -> f64 {
        if multiplier <= 0.0 {
            return requested.max(0.0);
        }
        requested.min(self.neuro_fuel / multiplier).max(0.0)
    }

    pub fn consume_fuel(&mut self, generated: f64, multiplier: f64) {
        self.neuro_fuel = (self.neuro_fuel - generated * multiplier.max(0.0)).max(0.0);
    }

    /// One second of passive production. Returns the neurons credited.
    pub fn tick_passive_generation(
        &mut self,
        base_rate: f64,
        modifiers: &[f64],
        fuel_multiplier: f64,
        ops_per_neuron: f64,
    ) -> f64 {
        if self.neuro_fuel <= 0.0 {
            return 0.0;
        }
        let rate = modifiers
            .iter()
            .fold(base_rate, |r, m| r * m.clamp(MODIFIER_RANGE.0, MODIFIER_RANGE.1))
            .max(0.0);
        let generated = self.clamp_to_fuel(rate, fuel_multiplier);
        self.add_primary(generated, ops_per_neuron);
        self.consume_fuel(generated, fuel_multiplier);
        generated
    }
}

/// Hypothalamus modifiers on passive production, active from brain level 2.
pub fn passive_modifiers(state: &GameState) -> Vec<f64> {
    if state.progression.current_tier < 2 {
        return Vec::new();
    }
    let d = state.controls.dopamine as f64;
    let g = state.controls.gaba as f64;
    vec![1.0 + d / 100.0 * 0.2, 1.0 - g / 100.0 * 0.2]
}

/// Passive production for one game step. Nothing is produced during an
/// attack.
pub fn passive_step(state: &mut GameState) -> f64 {
    if state.is_attack_active() {
        return 0.0;
    }
    let modifiers = passive_modifiers(state);
    let generated = state.ledger.tick_passive_generation(
        state.rates.passive_neurons_per_sec,
        &modifiers,
        state.rates.passive_fuel_multiplier,
        state.tuning.ops_per_neuron,
    );
    check_upgrades_area(state);
    generated
}

/// Manual click. Returns the neurons generated.
pub fn generate_manual(state: &mut GameState) -> Result<f64, GenerateError> {
    if state.is_attack_active() {
        state.log_message(
            "Brain recovering... clicking disabled (Anxiety Active).",
            LogCategory::Warning,
        );
        return Err(GenerateError::AttackActive);
    }
    let multiplier = state.rates.manual_fuel_multiplier;
    let possible = state
        .ledger
        .clamp_to_fuel(state.rates.neurons_per_click, multiplier);
    if possible <= 0.0 {
        let text = super::phrases::phrase("outOfNeuroFuel", state.progression.current_tier);
        state.log_message(text, LogCategory::Warning);
        return Err(GenerateError::OutOfFuel);
    }
    state.ledger.add_primary(possible, state.tuning.ops_per_neuron);
    state.ledger.consume_fuel(possible, multiplier);
    check_upgrades_area(state);
    Ok(possible)
}

fn check_upgrades_area(state: &mut GameState) {
    if state.ledger.neurons >= state.tuning.upgrades_area_threshold
        && !state.progression.is_unlocked(Feature::UpgradesPanel)
    {
        progression::unlock_feature(state, Feature::UpgradesPanel);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn overspend_never_mutates(balance in 0.0f64..1e6, extra in 0.001f64..1e6) {
            let mut l = Ledger { psychbucks: balance, ..Ledger::default() };
            let before = l.clone();
            prop_assert!(l.spend(Currency::Psychbucks, balance + extra).is_err());
            prop_assert_eq!(l, before);
        }

        #[test]
        fn fuel_never_negative(
            fuel in 0.0f64..100.0,
            rate in 0.0f64..50.0,
            mult in 0.1f64..5.0,
            steps in 1usize..20,
        ) {
            let mut l = Ledger { neuro_fuel: fuel, ..Ledger::default() };
            for _ in 0..steps {
                l.tick_passive_generation(rate, &[], mult, 0.01);
                prop_assert!(l.neuro_fuel >= 0.0);
            }
        }

        #[test]
        fn attack_blocks_all_generation(clicks in 1usize..30, rate in 0.0f64..20.0) {
            let mut state = GameState::new();
            state.ledger.neuro_fuel = 1e6;
            state.rates.passive_neurons_per_sec = rate;
            state.instability.attack_active = true;
            for _ in 0..clicks {
                let _ = generate_manual(&mut state);
                passive_step(&mut state);
            }
            prop_assert_eq!(state.ledger.neurons, 0.0);
        }
    }
}
