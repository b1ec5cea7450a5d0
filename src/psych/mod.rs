//! Universal Psychology: an incremental brain-growing game.

pub mod actions;
pub mod instability;
pub mod ledger;
pub mod logic;
pub mod phrases;
pub mod pokies;
pub mod progression;
pub mod projects;
pub mod quiz;
pub mod render;
pub mod save;
pub mod schedule;
pub mod state;
pub mod supplies;
pub mod upgrades;

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

use actions::*;
use phrases::phrase_with;
use state::{Catalog, Feature, GameState, LogCategory, Minigame, Tab};

/// Surface the game core exposes to minigames and other collaborators.
pub trait GameApi {
    fn state(&self) -> &GameState;
    fn state_mut(&mut self) -> &mut GameState;
    /// Tell whoever draws the game that balances changed.
    fn update_displays(&mut self);
    fn log_message(&mut self, text: &str, category: LogCategory);
}

type DisplayListener = Box<dyn FnMut(&GameState)>;

/// Save slots offered to the player, numbered from 1.
pub const SAVE_SLOTS: u32 = 3;

/// Storage work for the host to carry out on the selected slot. Saving
/// goes through `GameState::save_requested` like the autosave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotRequest {
    Load(u32),
    Reset(u32),
}

pub struct PsychGame {
    pub state: GameState,
    listener: Option<DisplayListener>,
    slot: u32,
    slot_request: Option<SlotRequest>,
}

impl PsychGame {
    pub fn new() -> Self {
        Self::with_state(GameState::new())
    }

    /// Wrap an existing state, loading the embedded question bank if it has none.
    pub fn with_state(mut state: GameState) -> Self {
        if state.quiz.bank.is_empty() {
            state.quiz.bank = quiz::embedded_questions();
        }
        Self {
            state,
            listener: None,
            slot: 1,
            slot_request: None,
        }
    }

    /// Start on a given slot. Out-of-range numbers fall back to slot 1.
    pub fn on_slot(mut self, slot: u32) -> Self {
        self.slot = if (1..=SAVE_SLOTS).contains(&slot) { slot } else { 1 };
        self
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Pending load or reset, cleared on read.
    pub fn take_slot_request(&mut self) -> Option<SlotRequest> {
        self.slot_request.take()
    }

    /// Swap in a loaded or fresh state, keeping the slot and listener.
    pub fn replace_state(&mut self, mut state: GameState) {
        if state.quiz.bank.is_empty() {
            state.quiz.bank = quiz::embedded_questions();
        }
        self.state = state;
        self.update_displays();
    }

    /// Install the callback run by `update_displays`.
    pub fn with_listener(mut self, listener: impl FnMut(&GameState) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let action = match event {
            InputEvent::Key(c) => match self.key_action(*c) {
                Some(a) => a,
                None => return false,
            },
            InputEvent::Click(id) => *id,
        };
        let consumed = self.perform(action);
        if consumed {
            self.update_displays();
        }
        consumed
    }

    /// Advance game logic by `delta_ticks` discrete ticks.
    pub fn tick(&mut self, delta_ticks: u32) {
        if delta_ticks == 0 {
            return;
        }
        logic::tick(&mut self.state, delta_ticks);
        self.update_displays();
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, self.slot, f, area, click_state);
    }

    fn key_action(&self, key: char) -> Option<u16> {
        let action = match key {
            'n' | ' ' => GENERATE_NEURONS,
            'x' => DISMISS_STIMULUS,
            's' => SPIN_POKIES,
            'w' => SAVE_NOW,
            'l' => LOAD_SLOT,
            'o' => NEXT_SLOT,
            'R' => NEW_GAME,
            'b' => TAB_BRAIN,
            'u' => TAB_UPGRADES,
            'p' => TAB_PROLIFERATION,
            'q' => TAB_QUIZ,
            'j' => TAB_PROJECTS,
            'f' => BUY_FACTORY,
            'e' => BUY_FUEL,
            '+' => DOPAMINE_UP,
            '-' => DOPAMINE_DOWN,
            '>' => GABA_UP,
            '<' => GABA_DOWN,
            '1'..='9' => {
                let idx = key as u16 - '1' as u16;
                match self.state.tab {
                    Tab::Upgrades => BUY_CORE_BASE + idx,
                    Tab::Proliferation => BUY_PROLIF_BASE + idx,
                    Tab::Quiz => ANSWER_BASE + idx,
                    Tab::Projects => PROJECT_BASE + idx,
                    Tab::Brain => return None,
                }
            }
            _ => return None,
        };
        Some(action)
    }

    fn perform(&mut self, action: u16) -> bool {
        let state = &mut self.state;
        match action {
            GENERATE_NEURONS => report("generate", ledger::generate_manual(state)),
            DISMISS_STIMULUS => {
                instability::dismiss_stimulus(state);
            }
            SPIN_POKIES => {
                if !state.progression.is_unlocked(Feature::Questions) {
                    return false;
                }
                let rolls = [(); 3].map(|_| state.next_random());
                let mut rolls = rolls.into_iter();
                let result = pokies::spin(self, &mut || rolls.next().unwrap_or(0));
                report("pokies", result);
            }
            SAVE_NOW => state.save_requested = true,
            LOAD_SLOT => self.slot_request = Some(SlotRequest::Load(self.slot)),
            NEW_GAME => self.slot_request = Some(SlotRequest::Reset(self.slot)),
            NEXT_SLOT => {
                self.slot = self.slot % SAVE_SLOTS + 1;
                let text = format!("Save slot {} selected.", self.slot);
                state.log_message(&text, LogCategory::Info);
            }
            TAB_BRAIN => return select_tab(state, Tab::Brain),
            TAB_UPGRADES => return select_tab(state, Tab::Upgrades),
            TAB_PROLIFERATION => return select_tab(state, Tab::Proliferation),
            TAB_QUIZ => return select_tab(state, Tab::Quiz),
            TAB_PROJECTS => return select_tab(state, Tab::Projects),
            BUY_FACTORY => {
                if !state.progression.is_unlocked(Feature::FactoryPanel) {
                    return false;
                }
                report("factory", supplies::buy_factory(state));
            }
            BUY_FUEL => {
                if !state.progression.is_unlocked(Feature::NeuroFuel) {
                    return false;
                }
                report("neurofuel", supplies::buy_neurofuel(state));
            }
            DOPAMINE_UP => return logic::adjust_controls(state, 10, 0),
            DOPAMINE_DOWN => return logic::adjust_controls(state, -10, 0),
            GABA_UP => return logic::adjust_controls(state, 0, 10),
            GABA_DOWN => return logic::adjust_controls(state, 0, -10),
            a if (BUY_CORE_BASE..BUY_PROLIF_BASE).contains(&a) => {
                return buy_visible(state, Catalog::Core, (a - BUY_CORE_BASE) as usize);
            }
            a if (BUY_PROLIF_BASE..BUY_FACTORY).contains(&a) => {
                return buy_visible(state, Catalog::Proliferation, (a - BUY_PROLIF_BASE) as usize);
            }
            a if (ANSWER_BASE..PROJECT_BASE).contains(&a) => {
                return quiz::answer(state, (a - ANSWER_BASE) as usize).is_some();
            }
            a if (PROJECT_BASE..DOPAMINE_UP).contains(&a) => {
                let offered = projects::offered(state);
                let Some(project) = offered.get((a - PROJECT_BASE) as usize) else {
                    return false;
                };
                let id = project.id;
                report("project", projects::purchase_project(state, id));
            }
            _ => return false,
        }
        true
    }
}

impl Default for PsychGame {
    fn default() -> Self {
        Self::new()
    }
}

impl GameApi for PsychGame {
    fn state(&self) -> &GameState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn update_displays(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.state);
        }
    }

    fn log_message(&mut self, text: &str, category: LogCategory) {
        self.state.log_message(text, category);
    }
}

/// Whether a tab's panel has been unlocked yet.
pub fn tab_available(state: &GameState, tab: Tab) -> bool {
    let gate = match tab {
        Tab::Brain => return true,
        Tab::Upgrades => Feature::UpgradesPanel,
        Tab::Proliferation => Feature::ProliferationPanel,
        Tab::Quiz => Feature::Questions,
        Tab::Projects => Feature::Projects,
    };
    state.progression.is_unlocked(gate)
}

fn select_tab(state: &mut GameState, tab: Tab) -> bool {
    if !tab_available(state, tab) {
        return false;
    }
    state.tab = tab;
    true
}

fn buy_visible(state: &mut GameState, catalog: Catalog, idx: usize) -> bool {
    let Some(&id) = upgrades::visible_upgrades(state, catalog).get(idx) else {
        return false;
    };
    report("upgrade", upgrades::purchase(state, id));
    true
}

/// Rejections are already narrated to the player; keep a diagnostic trail.
fn report<T, E: Display>(action: &str, result: Result<T, E>) {
    if let Err(e) = result {
        tracing::debug!(action, error = %e, "action rejected");
    }
}

/// Pay out a finished minigame. Credits are taken as reported.
pub fn credit_minigame_reward<A: GameApi + ?Sized>(api: &mut A, minigame: Minigame, amount: f64) {
    api.state_mut().ledger.psychbucks += amount;
    let tier = api.state().progression.current_tier;
    let score = format!("{}", amount);
    let text = phrase_with(
        "minigameFinished",
        tier,
        &[("score", score.as_str()), ("game", minigame.name())],
    );
    api.log_message(&text, LogCategory::Info);
    api.update_displays();
}

#[cfg(test)]
mod tests {
    use super::*;
    use state::UpgradeId;

    fn unlocked_game(tier: u32) -> PsychGame {
        let mut game = PsychGame::new();
        for t in 1..=tier {
            progression::advance_tier(&mut game.state, t);
        }
        game
    }

    #[test]
    fn key_generates_neurons() {
        let mut game = PsychGame::new();
        assert!(game.handle_input(&InputEvent::Key('n')));
        assert!((game.state.ledger.neurons - 1.0).abs() < 0.001);
        assert!((game.state.ledger.neuro_fuel - 9.0).abs() < 0.001);
    }

    #[test]
    fn unknown_key_not_consumed() {
        let mut game = PsychGame::new();
        assert!(!game.handle_input(&InputEvent::Key('z')));
        assert!(!game.handle_input(&InputEvent::Click(9999)));
    }

    #[test]
    fn locked_tabs_cannot_be_selected() {
        let mut game = PsychGame::new();
        assert!(!game.handle_input(&InputEvent::Key('q')));
        assert_eq!(game.state.tab, Tab::Brain);
        game.state.ledger.neurons = 10.0;
        progression::unlock_feature(&mut game.state, Feature::UpgradesPanel);
        assert!(game.handle_input(&InputEvent::Click(TAB_UPGRADES)));
        assert_eq!(game.state.tab, Tab::Upgrades);
    }

    #[test]
    fn number_keys_buy_visible_core_upgrade() {
        let mut game = PsychGame::new();
        game.state.ledger.neurons = 15.0;
        progression::unlock_feature(&mut game.state, Feature::UpgradesPanel);
        game.handle_input(&InputEvent::Key('u'));
        game.handle_input(&InputEvent::Key('1'));
        assert!(game.state.is_applied(UpgradeId::BiggerBrain1));
        assert_eq!(game.state.progression.current_tier, 1);
        assert!((game.state.ledger.neurons - 5.0).abs() < 0.001);
    }

    #[test]
    fn out_of_range_upgrade_click_ignored() {
        let mut game = PsychGame::new();
        assert!(!game.handle_input(&InputEvent::Click(BUY_CORE_BASE + 50)));
    }

    #[test]
    fn answer_via_click() {
        let mut game = unlocked_game(1);
        quiz::ensure_question(&mut game.state);
        let correct = quiz::current_question(&game.state)
            .map(|q| q.correct_answer_index)
            .unwrap();
        assert!(game.handle_input(&InputEvent::Click(ANSWER_BASE + correct as u16)));
        assert_eq!(game.state.quiz.streak_count, 1);
        assert!(game.state.ledger.psychbucks >= 4.0);
    }

    #[test]
    fn factory_button_needs_factory_panel() {
        let mut game = PsychGame::new();
        game.state.ledger.psychbucks = 100.0;
        assert!(!game.handle_input(&InputEvent::Key('f')));
        progression::unlock_feature(&mut game.state, Feature::FactoryPanel);
        assert!(game.handle_input(&InputEvent::Key('f')));
        assert_eq!(game.state.factory_count, 1);
    }

    #[test]
    fn sliders_follow_keys() {
        let mut game = unlocked_game(2);
        game.handle_input(&InputEvent::Key('+'));
        game.handle_input(&InputEvent::Key('+'));
        game.handle_input(&InputEvent::Key('>'));
        assert_eq!(game.state.controls.dopamine, 20);
        assert_eq!(game.state.controls.gaba, 10);
    }

    #[test]
    fn pokies_spin_costs_a_psychbuck() {
        let mut game = unlocked_game(1);
        game.state.ledger.psychbucks = 5.0;
        assert!(game.handle_input(&InputEvent::Key('s')));
        let pb = game.state.ledger.psychbucks;
        let possible = [4.0, 6.0, 9.0, 14.0, 16.0, 19.0, 24.0];
        assert!(possible.iter().any(|p| (pb - p).abs() < 0.001), "got {pb}");
    }

    #[test]
    fn listener_sees_every_change() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let seen = calls.clone();
        let mut game = PsychGame::new()
            .with_listener(move |s: &GameState| seen.borrow_mut().push(s.ledger.neurons));
        game.handle_input(&InputEvent::Key('n'));
        game.tick(0);
        game.tick(1);
        assert_eq!(calls.borrow().len(), 2);
        assert!((calls.borrow()[0] - 1.0).abs() < 0.001);
    }

    #[test]
    fn minigame_reward_is_credited_and_logged() {
        let mut game = unlocked_game(2);
        let before = game.state.ledger.psychbucks;
        credit_minigame_reward(&mut game, Minigame::NeuroSnake, 12.0);
        assert!((game.state.ledger.psychbucks - before - 12.0).abs() < 0.001);
        let last = game.state.log.last().map(|e| e.text.clone()).unwrap();
        assert_eq!(last, "NeuroSnake finished: +12 Psychbucks!");
    }

    #[test]
    fn slot_keys_cycle_and_wrap() {
        let mut game = PsychGame::new();
        assert_eq!(game.slot(), 1);
        game.handle_input(&InputEvent::Key('o'));
        assert_eq!(game.slot(), 2);
        game.handle_input(&InputEvent::Key('o'));
        game.handle_input(&InputEvent::Click(NEXT_SLOT));
        assert_eq!(game.slot(), 1);
        let last = game.state.log.last().map(|e| e.text.clone()).unwrap();
        assert_eq!(last, "Save slot 1 selected.");
    }

    #[test]
    fn load_and_reset_target_selected_slot() {
        let mut game = PsychGame::new().on_slot(2);
        assert!(game.handle_input(&InputEvent::Key('l')));
        assert_eq!(game.take_slot_request(), Some(SlotRequest::Load(2)));
        assert_eq!(game.take_slot_request(), None);
        game.handle_input(&InputEvent::Key('R'));
        assert_eq!(game.take_slot_request(), Some(SlotRequest::Reset(2)));
    }

    #[test]
    fn invalid_start_slot_falls_back_to_first() {
        assert_eq!(PsychGame::new().on_slot(0).slot(), 1);
        assert_eq!(PsychGame::new().on_slot(SAVE_SLOTS + 1).slot(), 1);
        assert_eq!(PsychGame::new().on_slot(SAVE_SLOTS).slot(), SAVE_SLOTS);
    }

    #[test]
    fn replace_state_keeps_slot_and_listener() {
        let calls = Rc::new(RefCell::new(0));
        let seen = calls.clone();
        let mut game = PsychGame::new()
            .on_slot(3)
            .with_listener(move |_: &GameState| *seen.borrow_mut() += 1);
        game.state.ledger.neurons = 500.0;
        game.replace_state(GameState::new());
        assert_eq!(game.slot(), 3);
        assert_eq!(game.state.ledger.neurons, 0.0);
        assert!(!game.state.quiz.bank.is_empty());
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn save_key_raises_flag() {
        let mut game = PsychGame::new();
        game.handle_input(&InputEvent::Key('w'));
        assert!(game.state.save_requested);
    }
}
