//! Semantic action IDs for Universal Psychology click targets.
//!
//! Registered during render and dispatched back through `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const GENERATE_NEURONS: u16 = 0;
pub const DISMISS_STIMULUS: u16 = 1;
pub const SPIN_POKIES: u16 = 2;
pub const SAVE_NOW: u16 = 3;

// ── Save slots ──────────────────────────────────────────────────
pub const LOAD_SLOT: u16 = 4;
pub const NEXT_SLOT: u16 = 5;
pub const NEW_GAME: u16 = 6;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_BRAIN: u16 = 10;
pub const TAB_UPGRADES: u16 = 11;
pub const TAB_PROLIFERATION: u16 = 12;
pub const TAB_QUIZ: u16 = 13;
pub const TAB_PROJECTS: u16 = 14;

// ── Upgrade purchase (base + index into visible list) ───────────
pub const BUY_CORE_BASE: u16 = 100;
pub const BUY_PROLIF_BASE: u16 = 200;

// ── Supplies ────────────────────────────────────────────────────
pub const BUY_FACTORY: u16 = 300;
pub const BUY_FUEL: u16 = 301;

// ── Quiz answers (base + option index) ──────────────────────────
pub const ANSWER_BASE: u16 = 400;

// ── Projects (base + index into offered list) ───────────────────
pub const PROJECT_BASE: u16 = 500;

// ── Hypothalamus sliders ────────────────────────────────────────
pub const DOPAMINE_UP: u16 = 600;
pub const DOPAMINE_DOWN: u16 = 601;
pub const GABA_UP: u16 = 602;
pub const GABA_DOWN: u16 = 603;
