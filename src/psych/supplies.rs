//! NeuroFuel purchases and proliferation factories.

use crate::error::PurchaseError;

use super::phrases::phrase_with;
use super::state::{Currency, GameState, LogCategory};

pub struct Food {
    pub name: &'static str,
    pub fuel: f64,
}

pub const FOODS: [Food; 6] = [
    Food { name: "Banana", fuel: 10.0 },
    Food { name: "Sandwich", fuel: 20.0 },
    Food { name: "Apple", fuel: 15.0 },
    Food { name: "Cookie", fuel: 25.0 },
    Food { name: "Pizza slice", fuel: 30.0 },
    Food { name: "Cake", fuel: 50.0 },
];

/// Upper bound of the fuel price at a brain level.
pub fn max_fuel_cost(tier: u32) -> u32 {
    match tier {
        0..=1 => 4,
        2 => 8,
        _ => 16,
    }
}

/// Pick a new fuel price in `1..=max_fuel_cost(tier)`.
pub fn reroll_fuel_cost(state: &mut GameState) {
    let max = max_fuel_cost(state.progression.current_tier);
    state.neuro_fuel_cost = state.random_between(1, max) as f64;
}

/// Trade Psychbucks for a random meal. Returns the fuel gained.
pub fn buy_neurofuel(state: &mut GameState) -> Result<f64, PurchaseError> {
    let cost = state.neuro_fuel_cost;
    if let Err(e) = state.ledger.spend(Currency::Psychbucks, cost) {
        let text = phrase_with(
            "notEnoughPsychbucks",
            state.progression.current_tier,
            &[("item", "food")],
        );
        state.log_message(&text, LogCategory::Warning);
        return Err(e.into());
    }
    let pick = state.next_random() as usize % FOODS.len();
    let food = &FOODS[pick];
    state.ledger.neuro_fuel += food.fuel;
    state.log_message(
        &format!("Purchased {}! (+{} Fuel)", food.name, food.fuel),
        LogCategory::Upgrade,
    );
    reroll_fuel_cost(state);
    Ok(food.fuel)
}

/// Build one proliferation factory.
pub fn buy_factory(state: &mut GameState) -> Result<u32, PurchaseError> {
    let cost = state.factory_cost;
    if let Err(e) = state.ledger.spend(Currency::Psychbucks, cost) {
        let text = phrase_with(
            "notEnoughPsychbucks",
            state.progression.current_tier,
            &[("item", "a factory")],
        );
        state.log_message(&text, LogCategory::Warning);
        return Err(e.into());
    }
    state.factory_count += 1;
    state.rates.passive_neurons_per_sec += state.tuning.factory_rate;
    state.factory_cost *= state.tuning.factory_cost_growth;
    state.purchase_flash = 5;
    let text = format!(
        "Proliferation Factory purchased! Total: {}",
        state.factory_count
    );
    state.log_message(&text, LogCategory::Upgrade);
    Ok(state.factory_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuel_cost_bounds_by_tier() {
        assert_eq!(max_fuel_cost(0), 4);
        assert_eq!(max_fuel_cost(1), 4);
        assert_eq!(max_fuel_cost(2), 8);
        assert_eq!(max_fuel_cost(3), 16);
        assert_eq!(max_fuel_cost(7), 16);
    }

    #[test]
    fn reroll_stays_in_range() {
        let mut state = GameState::new();
        state.progression.current_tier = 2;
        for _ in 0..200 {
            reroll_fuel_cost(&mut state);
            assert!(state.neuro_fuel_cost >= 1.0 && state.neuro_fuel_cost <= 8.0);
        }
    }

    #[test]
    fn buy_neurofuel_adds_a_meal() {
        let mut state = GameState::new();
        state.ledger.psychbucks = 20.0;
        let cost = state.neuro_fuel_cost;
        let gained = buy_neurofuel(&mut state).unwrap();
        assert!(FOODS.iter().any(|f| f.fuel == gained));
        assert!((state.ledger.neuro_fuel - (10.0 + gained)).abs() < 0.001);
        assert!((state.ledger.psychbucks - (20.0 - cost)).abs() < 0.001);
    }

    #[test]
    fn buy_neurofuel_without_funds() {
        let mut state = GameState::new();
        assert!(matches!(
            buy_neurofuel(&mut state),
            Err(PurchaseError::InsufficientFunds(_))
        ));
        assert!((state.ledger.neuro_fuel - 10.0).abs() < 0.001);
    }

    #[test]
    fn factory_raises_rate_and_cost() {
        let mut state = GameState::new();
        state.ledger.psychbucks = 30.0;
        assert_eq!(buy_factory(&mut state).unwrap(), 1);
        assert!((state.rates.passive_neurons_per_sec - 0.5).abs() < 0.001);
        assert!((state.factory_cost - 11.5).abs() < 0.001);
        assert!((state.ledger.psychbucks - 20.0).abs() < 0.001);
    }

    #[test]
    fn factory_rejected_when_broke() {
        let mut state = GameState::new();
        state.ledger.psychbucks = 5.0;
        assert!(buy_factory(&mut state).is_err());
        assert_eq!(state.factory_count, 0);
        assert!((state.ledger.psychbucks - 5.0).abs() < 0.001);
    }
}
