//! Universal Psychology game state definitions.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Tuning;

use super::schedule::Scheduler;

// ── Currencies ─────────────────────────────────────────────────

/// Every balance the ledger tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// Primary currency, produced by clicking and by factories.
    Neurons,
    /// Secondary currency, earned from the quiz and minigames.
    Psychbucks,
    /// Consumed by every generation action.
    NeuroFuel,
    /// Derived from cumulative generation, spent on projects.
    MindOps,
}

impl Currency {
    pub fn name(&self) -> &'static str {
        match self {
            Currency::Neurons => "Neurons",
            Currency::Psychbucks => "Psychbucks",
            Currency::NeuroFuel => "NeuroFuel",
            Currency::MindOps => "Mind Ops",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource balances. All fields stay ≥ 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledger {
    pub neurons: f64,
    pub psychbucks: f64,
    pub neuro_fuel: f64,
    /// Lifetime operations counter. Never decreases.
    pub mind_ops: f64,
    /// Operations already spent on projects.
    pub mind_ops_spent: f64,
    pub total_neurons_generated: f64,
    pub neurons_spent_on_brain: f64,
}

/// Production rates and fuel multipliers adjusted by upgrades.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rates {
    pub neurons_per_click: f64,
    pub passive_neurons_per_sec: f64,
    pub manual_fuel_multiplier: f64,
    pub passive_fuel_multiplier: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            neurons_per_click: 1.0,
            passive_neurons_per_sec: 0.0,
            manual_fuel_multiplier: 1.0,
            passive_fuel_multiplier: 1.0,
        }
    }
}

/// Hypothalamus sliders, both 0..=100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    /// The "stress" input. Boosts production, drives anxiety.
    pub dopamine: u8,
    /// The "calming" input. Dampens production, drains anxiety.
    pub gaba: u8,
}

// ── Upgrades ───────────────────────────────────────────────────

/// Which purchase list an upgrade belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Catalog {
    Core,
    Proliferation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeId {
    BiggerBrain1,
    BiggerBrain2,
    BiggerBrain3,
    AmygdalaActivation,
    NucleusAccumbens,
    ProlifFactory,
    DendriticSprouting,
    Myelination,
    MetabolicEfficiency,
    IntermittentFasting,
    MetabolicEfficiency2,
}

impl UpgradeId {
    /// Stable string id, as used in save files.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeId::BiggerBrain1 => "biggerBrain1",
            UpgradeId::BiggerBrain2 => "biggerBrain2",
            UpgradeId::BiggerBrain3 => "biggerBrain3",
            UpgradeId::AmygdalaActivation => "amygdalaActivation",
            UpgradeId::NucleusAccumbens => "nucleusAccumbens",
            UpgradeId::ProlifFactory => "prolifFactory",
            UpgradeId::DendriticSprouting => "dendriticSprouting",
            UpgradeId::Myelination => "myelination",
            UpgradeId::MetabolicEfficiency => "metabolicEfficiency",
            UpgradeId::IntermittentFasting => "intermittentFasting",
            UpgradeId::MetabolicEfficiency2 => "metabolicEfficiency2",
        }
    }

    pub fn parse(id: &str) -> Option<UpgradeId> {
        upgrade_defs()
            .iter()
            .map(|d| d.id)
            .find(|u| u.as_str() == id)
    }

    /// Static catalog entry for this id. The catalog is declared in
    /// variant order.
    pub fn def(&self) -> &'static UpgradeDef {
        &upgrade_defs()[*self as usize]
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric gate on top of the dependency link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    /// At least this many proliferation factories built.
    Factories(u32),
    /// Brain level at least this high.
    BrainLevel(u32),
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Factories(n) => write!(f, "requires {n} factories"),
            Requirement::BrainLevel(n) => write!(f, "requires brain level {n}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cost {
    pub currency: Currency,
    pub amount: f64,
}

/// What an upgrade does when it is purchased. Dispatched by
/// `upgrades::apply_effect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpgradeEffect {
    /// Raise the brain level and run that tier's unlocks.
    AdvanceTier(u32),
    /// Double passive production and bring the amygdala online.
    ActivateAmygdala,
    /// Unlock every minigame at once.
    UnlockAllMinigames,
    /// Show the factory panel.
    RevealFactory,
    /// Flat passive neurons/sec bonus.
    AddPassiveRate(f64),
    /// Percentage passive production bonus.
    ScalePassiveRate { percent: f64 },
    /// Multiply fuel consumption.
    ScaleFuelUse { manual: f64, passive: f64 },
    /// Push the anxiety meter up.
    RaiseAnxiety(f64),
    /// Begin a recurring background action.
    StartRecurring(RecurringAction),
}

/// Immutable catalog entry.
#[derive(Debug)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub catalog: Catalog,
    pub name: &'static str,
    pub description: &'static str,
    /// All listed costs are debited together.
    pub costs: &'static [Cost],
    pub depends_on: Option<UpgradeId>,
    pub requirements: &'static [Requirement],
    pub effects: &'static [UpgradeEffect],
    /// Set on brain-growth upgrades: the tier they grant.
    pub progression_tier: Option<u32>,
    /// Brain upgrades count their neuron cost towards IQ.
    pub brain: bool,
}

/// Returns the full catalogue of upgrades, core first.
pub fn upgrade_defs() -> &'static [UpgradeDef] {
    use Currency::*;
    use UpgradeId::*;

    static DEFS: &[UpgradeDef] = &[
        // ── Core ─────────────────────────────────────────────
        UpgradeDef {
            id: BiggerBrain1,
            catalog: Catalog::Core,
            name: "Brain Growth: Stage 1",
            description: "Unlocks EASY Qs & Neuron Proliferation.",
            costs: &[Cost { currency: Neurons, amount: 10.0 }],
            depends_on: None,
            requirements: &[],
            effects: &[UpgradeEffect::AdvanceTier(1)],
            progression_tier: Some(1),
            brain: true,
        },
        UpgradeDef {
            id: BiggerBrain2,
            catalog: Catalog::Core,
            name: "Brain Growth: Stage 2",
            description: "Unlocks MEDIUM Qs & Hypothalamus.",
            costs: &[Cost { currency: Neurons, amount: 250.0 }],
            depends_on: Some(BiggerBrain1),
            requirements: &[],
            effects: &[UpgradeEffect::AdvanceTier(2)],
            progression_tier: Some(2),
            brain: true,
        },
        UpgradeDef {
            id: BiggerBrain3,
            catalog: Catalog::Core,
            name: "Brain Growth: Stage 3",
            description: "Unlocks HARD Qs & Amygdala research.",
            costs: &[Cost { currency: Neurons, amount: 1000.0 }],
            depends_on: Some(BiggerBrain2),
            requirements: &[],
            effects: &[UpgradeEffect::AdvanceTier(3)],
            progression_tier: Some(3),
            brain: true,
        },
        UpgradeDef {
            id: AmygdalaActivation,
            catalog: Catalog::Core,
            name: "Activate Amygdala",
            description: "Doubles passive neuron production. WARNING: Random stimuli.",
            costs: &[
                Cost { currency: Neurons, amount: 5000.0 },
                Cost { currency: Psychbucks, amount: 200.0 },
            ],
            depends_on: Some(BiggerBrain3),
            requirements: &[],
            effects: &[UpgradeEffect::ActivateAmygdala],
            progression_tier: None,
            brain: true,
        },
        UpgradeDef {
            id: NucleusAccumbens,
            catalog: Catalog::Core,
            name: "Nucleus Accumbens",
            description: "Unlocks access to NeuroGames.",
            costs: &[Cost { currency: Neurons, amount: 2000.0 }],
            depends_on: Some(BiggerBrain3),
            requirements: &[],
            effects: &[UpgradeEffect::UnlockAllMinigames],
            progression_tier: None,
            brain: true,
        },
        // ── Neuron proliferation ─────────────────────────────
        UpgradeDef {
            id: ProlifFactory,
            catalog: Catalog::Proliferation,
            name: "Neuron Proliferation Factory",
            description: "Builds a facility for passive neuron growth (+0.5/sec).",
            costs: &[Cost { currency: Psychbucks, amount: 10.0 }],
            depends_on: None,
            requirements: &[],
            effects: &[UpgradeEffect::RevealFactory, UpgradeEffect::AddPassiveRate(0.5)],
            progression_tier: None,
            brain: false,
        },
        UpgradeDef {
            id: DendriticSprouting,
            catalog: Catalog::Proliferation,
            name: "Dendritic Sprouting",
            description: "Increase passive neuron production by 0.1%.",
            costs: &[Cost { currency: Psychbucks, amount: 25.0 }],
            depends_on: Some(ProlifFactory),
            requirements: &[],
            effects: &[UpgradeEffect::ScalePassiveRate { percent: 0.1 }],
            progression_tier: None,
            brain: false,
        },
        UpgradeDef {
            id: Myelination,
            catalog: Catalog::Proliferation,
            name: "Myelination",
            description: "Boost production but consumes more fuel and raises anxiety.",
            costs: &[Cost { currency: Psychbucks, amount: 60.0 }],
            depends_on: Some(DendriticSprouting),
            requirements: &[],
            effects: &[
                UpgradeEffect::ScalePassiveRate { percent: 20.0 },
                UpgradeEffect::ScaleFuelUse { manual: 1.0, passive: 1.2 },
                UpgradeEffect::RaiseAnxiety(5.0),
            ],
            progression_tier: None,
            brain: false,
        },
        UpgradeDef {
            id: MetabolicEfficiency,
            catalog: Catalog::Proliferation,
            name: "Metabolic Efficiency",
            description: "Cuts Neurofuel consumption by 50%.",
            costs: &[Cost { currency: Psychbucks, amount: 80.0 }],
            depends_on: None,
            requirements: &[Requirement::Factories(4)],
            effects: &[UpgradeEffect::ScaleFuelUse { manual: 0.5, passive: 0.5 }],
            progression_tier: None,
            brain: false,
        },
        UpgradeDef {
            id: IntermittentFasting,
            catalog: Catalog::Proliferation,
            name: "Intermittent Fasting",
            description: "Automatically purchase fuel every 10 seconds.",
            costs: &[Cost { currency: Psychbucks, amount: 120.0 }],
            depends_on: Some(MetabolicEfficiency),
            requirements: &[],
            effects: &[UpgradeEffect::StartRecurring(RecurringAction::IntermittentFasting)],
            progression_tier: None,
            brain: false,
        },
        UpgradeDef {
            id: MetabolicEfficiency2,
            catalog: Catalog::Proliferation,
            name: "Metabolic Efficiency II",
            description: "Further cuts fuel use by 50%.",
            costs: &[Cost { currency: Psychbucks, amount: 200.0 }],
            depends_on: Some(MetabolicEfficiency),
            requirements: &[Requirement::BrainLevel(3)],
            effects: &[UpgradeEffect::ScaleFuelUse { manual: 0.5, passive: 0.5 }],
            progression_tier: None,
            brain: false,
        },
    ];
    DEFS
}

/// Runtime purchase status of one catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub id: UpgradeId,
    /// Set exactly once per purchase; cleared only by an attack rollback.
    pub effect_applied: bool,
}

impl Upgrade {
    pub fn def(&self) -> &'static UpgradeDef {
        self.id.def()
    }
}

// ── Progression ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Minigame {
    BrainTetris,
    NeuroSnake,
    FlappyFreud,
    FeedSundgren,
}

/// Order in which brain levels hand out minigames.
pub const MINIGAME_UNLOCK_SEQUENCE: [Minigame; 4] = [
    Minigame::BrainTetris,
    Minigame::NeuroSnake,
    Minigame::FlappyFreud,
    Minigame::FeedSundgren,
];

impl Minigame {
    pub fn name(&self) -> &'static str {
        match self {
            Minigame::BrainTetris => "Brain Tetris",
            Minigame::NeuroSnake => "NeuroSnake",
            Minigame::FlappyFreud => "Flappy Freud",
            Minigame::FeedSundgren => "Feed Sundgren",
        }
    }
}

/// Externally-owned game features whose visibility the sequencer gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    UpgradesPanel,
    Questions,
    ProliferationPanel,
    NeuroFuel,
    Projects,
    HypothalamusControls,
    FactoryPanel,
    Minigame(Minigame),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy = 0,
    Medium = 1,
    Hard = 2,
}

impl Difficulty {
    pub fn from_level(level: u8) -> Option<Difficulty> {
        match level {
            0 => Some(Difficulty::Easy),
            1 => Some(Difficulty::Medium),
            2 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Psychbucks paid at brain level 1.
    pub fn base_reward(&self) -> f64 {
        match self {
            Difficulty::Easy => 4.0,
            Difficulty::Medium => 6.0,
            Difficulty::Hard => 8.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progression {
    /// Brain level. Only an attack rollback ever lowers it.
    pub current_tier: u32,
    pub unlocked_features: BTreeSet<Feature>,
    /// Highest quiz band available. Sticky across rollbacks.
    pub difficulty_unlocked: Option<Difficulty>,
}

impl Progression {
    pub fn is_unlocked(&self, feature: Feature) -> bool {
        self.unlocked_features.contains(&feature)
    }
}

// ── Instability ────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instability {
    /// Always within `[0, tuning.max_anxiety]`.
    pub meter: f64,
    /// Consecutive steps spent overdriven.
    pub sustained_high_input_time: u32,
    pub attack_active: bool,
    pub amygdala_online: bool,
    /// Scary stimuli currently on screen. Runtime only.
    #[serde(skip)]
    pub active_stimuli: u32,
}

// ── Recurring actions / projects ───────────────────────────────

/// Background actions that fire on a timer until stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecurringAction {
    /// Buy fuel at a fixed interval.
    IntermittentFasting,
    /// Buy fuel at random intervals.
    IrregularSnacks,
    /// Generate neurons as if clicked.
    AutoClick,
    /// Throw a batch of scary stimuli at the player.
    ScaryStimuli,
}

impl RecurringAction {
    pub fn name(&self) -> &'static str {
        match self {
            RecurringAction::IntermittentFasting => "Intermittent Fasting",
            RecurringAction::IrregularSnacks => "Irregular Snacks",
            RecurringAction::AutoClick => "Autonomy",
            RecurringAction::ScaryStimuli => "Amygdala awareness",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectId {
    Efficiency,
    Automation,
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProjectId::Efficiency => "efficiency",
            ProjectId::Automation => "automation",
        })
    }
}

// ── Quiz ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub difficulty: u8,
}

#[derive(Clone, Debug, Default)]
pub struct QuizState {
    pub bank: Vec<Question>,
    /// Index into `bank` of the question on screen.
    pub current: Option<usize>,
    pub streak_count: u32,
    pub streak_bonus: f64,
    /// Feedback line for the last answer.
    pub feedback: Option<String>,
}

// ── Log ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogCategory {
    Info,
    Warning,
    Upgrade,
    Unlock,
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub category: LogCategory,
}

// ── UI selection ───────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Brain,
    Upgrades,
    Proliferation,
    Quiz,
    Projects,
}

/// Full state of a Universal Psychology session.
pub struct GameState {
    pub tuning: Tuning,
    pub ledger: Ledger,
    pub rates: Rates,
    pub controls: Controls,
    pub factory_count: u32,
    pub factory_cost: f64,
    pub neuro_fuel_cost: f64,
    pub progression: Progression,
    pub instability: Instability,
    pub upgrades: Vec<Upgrade>,
    pub purchased_projects: Vec<ProjectId>,
    pub quiz: QuizState,
    pub scheduler: Scheduler,
    /// Player-facing narration, newest last.
    pub log: Vec<LogEntry>,
    pub rng_state: u32,
    /// Ticks accumulated toward the next one-second game step.
    pub sub_step_ticks: u32,
    pub total_steps: u64,
    /// (neurons, fuel) sampled once per step.
    pub history: Vec<(f64, f64)>,
    pub autosave_countdown: u32,
    /// Set when an autosave is due; cleared by the host after saving.
    pub save_requested: bool,
    pub tab: Tab,
    /// Purchase flash timer for the renderer.
    pub purchase_flash: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    /// Build a fresh game. Tuning that fails validation is replaced by the
    /// defaults.
    pub fn with_tuning(tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting tuning, using defaults");
                Tuning::default()
            }
        };
        let upgrades = upgrade_defs()
            .iter()
            .map(|d| Upgrade {
                id: d.id,
                effect_applied: false,
            })
            .collect();
        let ledger = Ledger {
            neuro_fuel: tuning.starting_fuel,
            ..Ledger::default()
        };
        let factory_cost = tuning.factory_base_cost;
        let autosave_countdown = tuning
            .autosave_interval_secs
            .saturating_mul(super::logic::TICKS_PER_STEP);

        let mut state = Self {
            tuning,
            ledger,
            rates: Rates::default(),
            controls: Controls::default(),
            factory_count: 0,
            factory_cost,
            neuro_fuel_cost: 1.0,
            progression: Progression::default(),
            instability: Instability::default(),
            upgrades,
            purchased_projects: Vec::new(),
            quiz: QuizState::default(),
            scheduler: Scheduler::default(),
            log: Vec::new(),
            rng_state: 0x2545_F491,
            sub_step_ticks: 0,
            total_steps: 0,
            history: Vec::new(),
            autosave_countdown,
            save_requested: false,
            tab: Tab::Brain,
            purchase_flash: 0,
        };
        super::supplies::reroll_fuel_cost(&mut state);
        state
    }

    /// Narrate a state change to the player. Never fails.
    pub fn log_message(&mut self, text: &str, category: LogCategory) {
        match category {
            LogCategory::Warning => tracing::warn!(target: "player", "{text}"),
            LogCategory::Upgrade | LogCategory::Unlock => tracing::info!(target: "player", "{text}"),
            LogCategory::Info => tracing::debug!(target: "player", "{text}"),
        }
        self.log.push(LogEntry {
            text: text.to_string(),
            category,
        });
        if self.log.len() > self.tuning.max_log_entries {
            self.log.remove(0);
        }
    }

    pub fn upgrade(&self, id: UpgradeId) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn upgrade_mut(&mut self, id: UpgradeId) -> Option<&mut Upgrade> {
        self.upgrades.iter_mut().find(|u| u.id == id)
    }

    pub fn is_applied(&self, id: UpgradeId) -> bool {
        self.upgrade(id).is_some_and(|u| u.effect_applied)
    }

    pub fn is_attack_active(&self) -> bool {
        self.instability.attack_active
    }

    pub fn available_mind_ops(&self) -> f64 {
        (self.ledger.mind_ops - self.ledger.mind_ops_spent).max(0.0)
    }

    /// IQ readout derived from lifetime activity.
    pub fn iq(&self) -> u32 {
        let activity =
            self.ledger.total_neurons_generated + self.ledger.neurons_spent_on_brain + 1.0;
        (80.0 + activity.log10() * 15.0).floor() as u32
    }

    /// xorshift32.
    pub fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    /// Uniform integer in `lo..=hi`.
    pub fn random_between(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = u64::from(hi - lo) + 1;
        lo + (u64::from(self.next_random()) % span) as u32
    }

    /// Reseed the RNG. Zero would lock xorshift at zero, so it is remapped.
    pub fn seed_rng(&mut self, seed: u32) {
        self.rng_state = if seed == 0 { 0x9E37_79B9 } else { seed };
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_starting_fuel_and_all_upgrades() {
        let state = GameState::new();
        assert!((state.ledger.neuro_fuel - 10.0).abs() < 0.001);
        assert_eq!(state.upgrades.len(), upgrade_defs().len());
        assert!(state.upgrades.iter().all(|u| !u.effect_applied));
        assert_eq!(state.progression.current_tier, 0);
    }

    #[test]
    fn initial_fuel_cost_within_tier_one_range() {
        let state = GameState::new();
        assert!(state.neuro_fuel_cost >= 1.0 && state.neuro_fuel_cost <= 4.0);
    }

    #[test]
    fn upgrade_ids_are_unique_and_parse_back() {
        for def in upgrade_defs() {
            assert_eq!(UpgradeId::parse(def.id.as_str()), Some(def.id));
            assert_eq!(
                upgrade_defs().iter().filter(|d| d.id == def.id).count(),
                1
            );
        }
        assert_eq!(UpgradeId::parse("nope"), None);
    }

    #[test]
    fn catalog_is_declared_in_variant_order() {
        for (i, def) in upgrade_defs().iter().enumerate() {
            assert_eq!(def.id as usize, i);
            assert_eq!(def.id.def().id, def.id);
        }
    }

    #[test]
    fn serde_id_matches_as_str() {
        let json = serde_json::to_string(&UpgradeId::MetabolicEfficiency2).unwrap();
        assert_eq!(json, "\"metabolicEfficiency2\"");
    }

    #[test]
    fn dependencies_point_at_existing_entries() {
        for def in upgrade_defs() {
            if let Some(parent) = def.depends_on {
                assert!(upgrade_defs().iter().any(|d| d.id == parent));
                assert_ne!(parent, def.id);
            }
        }
    }

    #[test]
    fn tier_granting_upgrades_are_core() {
        for def in upgrade_defs().iter().filter(|d| d.progression_tier.is_some()) {
            assert_eq!(def.catalog, Catalog::Core);
        }
    }

    #[test]
    fn log_truncation() {
        let mut state = GameState::new();
        for i in 0..60 {
            state.log_message(&format!("msg {}", i), LogCategory::Info);
        }
        assert_eq!(state.log.len(), 20);
        assert_eq!(state.log.last().unwrap().text, "msg 59");
    }

    #[test]
    fn iq_starts_at_base() {
        let state = GameState::new();
        assert_eq!(state.iq(), 80);
    }

    #[test]
    fn iq_grows_logarithmically() {
        let mut state = GameState::new();
        state.ledger.total_neurons_generated = 1004.0;
        assert_eq!(state.iq(), 125);
    }

    #[test]
    fn random_between_stays_in_range() {
        let mut state = GameState::new();
        for _ in 0..500 {
            let r = state.random_between(3, 7);
            assert!((3..=7).contains(&r));
        }
    }

    #[test]
    fn random_between_full_range_does_not_overflow() {
        let mut state = GameState::new();
        for _ in 0..50 {
            state.random_between(0, u32::MAX);
        }
    }

    #[test]
    fn invalid_tuning_falls_back_to_defaults() {
        let tuning = Tuning {
            max_anxiety: -1.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(tuning);
        assert_eq!(state.tuning, Tuning::default());
        crate::psych::instability::increase_meter(&mut state, 10.0);
        assert!((state.instability.meter - 10.0).abs() < 0.001);
    }

    #[test]
    fn zero_seed_does_not_stall_rng() {
        let mut state = GameState::new();
        state.seed_rng(0);
        assert_ne!(state.next_random(), 0);
    }

    #[test]
    fn available_mind_ops_subtracts_spent() {
        let mut state = GameState::new();
        state.ledger.mind_ops = 300.0;
        state.ledger.mind_ops_spent = 100.0;
        assert!((state.available_mind_ops() - 200.0).abs() < 0.001);
    }
}
