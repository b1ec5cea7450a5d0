//! Balance constants, overridable from JSON.
//!
//! Every field has a default, so an override document only needs the keys
//! it changes: `{"anxiety_time_limit": 30}` is a valid tuning file.

use serde::Deserialize;

use crate::error::ConfigError;

/// Upper bound for any timer, one day.
const MAX_INTERVAL_SECS: u32 = 86_400;

fn out_of_range(field: &'static str, reason: String) -> ConfigError {
    ConfigError::OutOfRange { field, reason }
}

/// Engine tuning. Time values are in game steps (one step = one second)
/// unless the name says otherwise.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Dopamine level above which the hypothalamus counts as overdriven.
    pub anxiety_dopamine_threshold: f64,
    /// Meter level that must be exceeded for an attack to start.
    pub anxiety_sustained_threshold: f64,
    /// Consecutive overdriven steps required for an attack.
    pub anxiety_time_limit: u32,
    pub max_anxiety: f64,
    pub anxiety_increase_factor: f64,
    pub anxiety_decrease_factor: f64,
    /// Calming divisor applied to GABA during normal decay.
    pub gaba_decay_divisor: f64,
    /// Calming divisor applied to GABA while recovering from an attack.
    pub gaba_recovery_divisor: f64,
    /// Share of neurons kept when an attack starts.
    pub attack_neuron_retention: f64,

    pub ops_per_neuron: f64,
    pub starting_fuel: f64,
    pub factory_rate: f64,
    pub factory_base_cost: f64,
    pub factory_cost_growth: f64,
    /// Neurons needed before the upgrades panel appears.
    pub upgrades_area_threshold: f64,

    pub scary_stimuli_interval_secs: u32,
    pub intermittent_fasting_interval_secs: u32,
    /// Irregular snack delay window in milliseconds.
    pub irregular_snack_min_ms: u32,
    pub irregular_snack_max_ms: u32,
    pub auto_click_interval_secs: u32,
    pub autosave_interval_secs: u32,

    pub save_key_prefix: String,
    pub max_log_entries: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            anxiety_dopamine_threshold: 70.0,
            anxiety_sustained_threshold: 60.0,
            anxiety_time_limit: 20,
            max_anxiety: 100.0,
            anxiety_increase_factor: 0.1,
            anxiety_decrease_factor: 0.5,
            gaba_decay_divisor: 15.0,
            gaba_recovery_divisor: 20.0,
            attack_neuron_retention: 0.8,
            ops_per_neuron: 0.01,
            starting_fuel: 10.0,
            factory_rate: 0.5,
            factory_base_cost: 10.0,
            factory_cost_growth: 1.15,
            upgrades_area_threshold: 10.0,
            scary_stimuli_interval_secs: 120,
            intermittent_fasting_interval_secs: 10,
            irregular_snack_min_ms: 1_000,
            irregular_snack_max_ms: 10_000,
            auto_click_interval_secs: 1,
            autosave_interval_secs: 10,
            save_key_prefix: "up_save_".into(),
            max_log_entries: 20,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_anxiety", self.max_anxiety),
            ("gaba_decay_divisor", self.gaba_decay_divisor),
            ("gaba_recovery_divisor", self.gaba_recovery_divisor),
            ("factory_cost_growth", self.factory_cost_growth),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(out_of_range(field, format!("{value} must be finite and above 0")));
            }
        }

        let non_negative = [
            ("anxiety_dopamine_threshold", self.anxiety_dopamine_threshold),
            ("anxiety_sustained_threshold", self.anxiety_sustained_threshold),
            ("anxiety_increase_factor", self.anxiety_increase_factor),
            ("anxiety_decrease_factor", self.anxiety_decrease_factor),
            ("ops_per_neuron", self.ops_per_neuron),
            ("starting_fuel", self.starting_fuel),
            ("factory_rate", self.factory_rate),
            ("factory_base_cost", self.factory_base_cost),
            ("upgrades_area_threshold", self.upgrades_area_threshold),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(out_of_range(field, format!("{value} must be finite and not negative")));
            }
        }

        if !(0.0..=1.0).contains(&self.attack_neuron_retention) {
            return Err(out_of_range(
                "attack_neuron_retention",
                format!("{} must be between 0 and 1", self.attack_neuron_retention),
            ));
        }

        let intervals = [
            ("anxiety_time_limit", self.anxiety_time_limit),
            ("scary_stimuli_interval_secs", self.scary_stimuli_interval_secs),
            ("intermittent_fasting_interval_secs", self.intermittent_fasting_interval_secs),
            ("auto_click_interval_secs", self.auto_click_interval_secs),
            ("autosave_interval_secs", self.autosave_interval_secs),
        ];
        for (field, value) in intervals {
            if !(1..=MAX_INTERVAL_SECS).contains(&value) {
                return Err(out_of_range(
                    field,
                    format!("{value} must be between 1 and {MAX_INTERVAL_SECS}"),
                ));
            }
        }

        if self.irregular_snack_min_ms > self.irregular_snack_max_ms
            || self.irregular_snack_max_ms > MAX_INTERVAL_SECS * 1000
        {
            return Err(out_of_range(
                "irregular_snack_max_ms",
                format!(
                    "window {}..={} must be ordered and at most {} ms",
                    self.irregular_snack_min_ms,
                    self.irregular_snack_max_ms,
                    MAX_INTERVAL_SECS * 1000
                ),
            ));
        }

        if self.max_log_entries == 0 {
            return Err(out_of_range("max_log_entries", "must keep at least one entry".into()));
        }
        Ok(())
    }

    /// localStorage key for a save slot.
    pub fn save_key(&self, slot: u32) -> String {
        format!("{}{}", self.save_key_prefix, slot)
    }
}
