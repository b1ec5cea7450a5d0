//! Save/load for Universal Psychology.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format that still loads. Bump only on
//!   breaking changes (a field removed or its meaning changed).
//!
//! Older saves at or above `MIN_COMPATIBLE_VERSION` load with missing
//! fields filled from defaults. Runtime-only state (timers, stimuli on
//! screen, the current quiz question) is never saved; `restore` rebuilds
//! it from what was saved.

#[cfg(any(target_arch = "wasm32", test))]
use serde::{Deserialize, Serialize};

#[cfg(any(target_arch = "wasm32", test))]
use crate::error::PersistenceError;

#[cfg(any(target_arch = "wasm32", test))]
use super::state::{
    Catalog, Controls, GameState, Instability, Ledger, ProjectId, Progression, Rates, UpgradeId,
};
#[cfg(any(target_arch = "wasm32", test))]
use super::{progression, projects, quiz, supplies, upgrades};

#[cfg(any(target_arch = "wasm32", test))]
pub const SAVE_VERSION: u32 = 1;

#[cfg(any(target_arch = "wasm32", test))]
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage key holding tuning overrides.
#[cfg(target_arch = "wasm32")]
const TUNING_KEY: &str = "up_tuning";

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub game: GameSave,
}

/// Purchase flag of one upgrade, keyed by its string id.
#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeFlag {
    pub id: String,
    pub effect_applied: bool,
}

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameSave {
    pub ledger: Ledger,
    pub rates: Rates,
    pub controls: Controls,
    pub factory_count: u32,
    pub factory_cost: Option<f64>,
    /// Re-rolled on load when absent.
    pub neuro_fuel_cost: Option<f64>,
    pub progression: Progression,
    pub instability: Instability,
    pub core_upgrades: Vec<UpgradeFlag>,
    pub proliferation_upgrades: Vec<UpgradeFlag>,
    pub purchased_projects: Vec<ProjectId>,
    pub streak_count: u32,
    pub streak_bonus: f64,
    pub rng_state: u32,
    pub total_steps: u64,
}

#[cfg(any(target_arch = "wasm32", test))]
fn flags(state: &GameState, catalog: Catalog) -> Vec<UpgradeFlag> {
    upgrades::catalog(state, catalog)
        .map(|u| UpgradeFlag {
            id: u.id.as_str().to_string(),
            effect_applied: u.effect_applied,
        })
        .collect()
}

/// Snapshot the persistent part of the state.
#[cfg(any(target_arch = "wasm32", test))]
pub fn extract_save(state: &GameState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            ledger: state.ledger.clone(),
            rates: state.rates.clone(),
            controls: state.controls,
            factory_count: state.factory_count,
            factory_cost: Some(state.factory_cost),
            neuro_fuel_cost: Some(state.neuro_fuel_cost),
            progression: state.progression.clone(),
            instability: state.instability.clone(),
            core_upgrades: flags(state, Catalog::Core),
            proliferation_upgrades: flags(state, Catalog::Proliferation),
            purchased_projects: state.purchased_projects.clone(),
            streak_count: state.quiz.streak_count,
            streak_bonus: state.quiz.streak_bonus,
            rng_state: state.rng_state,
            total_steps: state.total_steps,
        },
    }
}

#[cfg(any(target_arch = "wasm32", test))]
pub fn encode(state: &GameState) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&extract_save(state))?)
}

/// Parse a save and check that its version can be loaded.
#[cfg(any(target_arch = "wasm32", test))]
pub fn decode(json: &str) -> Result<SaveData, PersistenceError> {
    let data: SaveData = serde_json::from_str(json)?;
    if data.version < MIN_COMPATIBLE_VERSION {
        return Err(PersistenceError::Incompatible {
            saved: data.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    if data.version < SAVE_VERSION {
        tracing::info!(saved = data.version, current = SAVE_VERSION, "migrating old save");
    }
    Ok(data)
}

#[cfg(any(target_arch = "wasm32", test))]
fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Saved balances with every currency floored at zero.
#[cfg(any(target_arch = "wasm32", test))]
fn sanitized_ledger(saved: &Ledger) -> Ledger {
    let mind_ops = non_negative(saved.mind_ops);
    Ledger {
        neurons: non_negative(saved.neurons),
        psychbucks: non_negative(saved.psychbucks),
        neuro_fuel: non_negative(saved.neuro_fuel),
        mind_ops,
        mind_ops_spent: non_negative(saved.mind_ops_spent).min(mind_ops),
        total_neurons_generated: non_negative(saved.total_neurons_generated),
        neurons_spent_on_brain: non_negative(saved.neurons_spent_on_brain),
    }
}

#[cfg(any(target_arch = "wasm32", test))]
fn sanitized_rates(saved: &Rates) -> Rates {
    Rates {
        neurons_per_click: non_negative(saved.neurons_per_click),
        passive_neurons_per_sec: non_negative(saved.passive_neurons_per_sec),
        manual_fuel_multiplier: non_negative(saved.manual_fuel_multiplier),
        passive_fuel_multiplier: non_negative(saved.passive_fuel_multiplier),
    }
}

/// Overwrite `state` with a save and rebuild runtime-only state.
#[cfg(any(target_arch = "wasm32", test))]
pub fn restore(state: &mut GameState, save: &GameSave) {
    state.ledger = sanitized_ledger(&save.ledger);
    state.rates = sanitized_rates(&save.rates);
    state.controls = Controls {
        dopamine: save.controls.dopamine.min(100),
        gaba: save.controls.gaba.min(100),
    };
    state.factory_count = save.factory_count;
    state.factory_cost = save
        .factory_cost
        .filter(|c| *c > 0.0)
        .unwrap_or(state.tuning.factory_base_cost);
    state.progression = save.progression.clone();
    state.instability = save.instability.clone();
    state.instability.active_stimuli = 0;
    state.instability.meter = state.instability.meter.clamp(0.0, state.tuning.max_anxiety);
    state.purchased_projects = save.purchased_projects.clone();
    state.quiz.streak_count = save.streak_count;
    state.quiz.streak_bonus = non_negative(save.streak_bonus);
    state.quiz.current = None;
    state.quiz.feedback = None;
    state.total_steps = save.total_steps;
    state.seed_rng(save.rng_state);

    for u in state.upgrades.iter_mut() {
        u.effect_applied = false;
    }
    for flag in save.core_upgrades.iter().chain(&save.proliferation_upgrades) {
        match UpgradeId::parse(&flag.id) {
            Some(id) => {
                if let Some(u) = state.upgrade_mut(id) {
                    u.effect_applied = flag.effect_applied;
                }
            }
            None => tracing::debug!(id = %flag.id, "ignoring unknown upgrade in save"),
        }
    }

    match save.neuro_fuel_cost {
        Some(cost) if cost >= 1.0 => state.neuro_fuel_cost = cost,
        _ => supplies::reroll_fuel_cost(state),
    }

    state.scheduler.clear();
    progression::restore_features(state);
    upgrades::restore_runtime_effects(state);
    projects::restore_runtime_effects(state);
    quiz::ensure_question(state);
}

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Result<web_sys::Storage, PersistenceError> {
    web_sys::window()
        .ok_or_else(|| PersistenceError::Unavailable("no window".into()))?
        .local_storage()
        .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))?
        .ok_or_else(|| PersistenceError::Unavailable("localStorage disabled".into()))
}

/// Write the state to its slot. Last write wins.
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &GameState, slot: u32) -> Result<(), PersistenceError> {
    let json = encode(state)?;
    get_storage()?
        .set_item(&state.tuning.save_key(slot), &json)
        .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))
}

/// Load a slot into `state`. `Ok(false)` means the slot is empty. Corrupt
/// or incompatible data is removed from storage.
#[cfg(target_arch = "wasm32")]
pub fn load_game(state: &mut GameState, slot: u32) -> Result<bool, PersistenceError> {
    let storage = get_storage()?;
    let key = state.tuning.save_key(slot);
    let json = match storage.get_item(&key) {
        Ok(Some(j)) => j,
        Ok(None) => return Ok(false),
        Err(e) => return Err(PersistenceError::Unavailable(format!("{e:?}"))),
    };
    match decode(&json) {
        Ok(data) => {
            restore(state, &data.game);
            Ok(true)
        }
        Err(e) => {
            if let Err(js) = storage.remove_item(&key) {
                tracing::warn!(slot, error = ?js, "could not discard unreadable save");
            }
            Err(e)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn delete_save(state: &GameState, slot: u32) -> Result<(), PersistenceError> {
    get_storage()?
        .remove_item(&state.tuning.save_key(slot))
        .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))
}

/// Tuning overrides from localStorage, or defaults.
#[cfg(target_arch = "wasm32")]
pub fn load_tuning() -> crate::config::Tuning {
    use crate::config::Tuning;

    let json = get_storage()
        .ok()
        .and_then(|s| s.get_item(TUNING_KEY).ok().flatten());
    match json {
        Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring invalid tuning overrides, using defaults");
            Tuning::default()
        }),
        None => Tuning::default(),
    }
}
