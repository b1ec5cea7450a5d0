mod config;
mod error;
mod input;
mod logging;
mod psych;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use config::Tuning;
use error::CollaboratorError;
use input::{ClickState, InputEvent};
use psych::render::format_number;
use psych::state::{GameState, LogCategory};
use psych::{PsychGame, SlotRequest};
use time::GameTime;

/// Slot restored on startup.
const START_SLOT: u32 = 1;
const TICKS_PER_SEC: u32 = 10;

/// Resolve a mouse press to an action using the grid container's on-page rect.
fn dom_click_action(
    mouse_x: u32,
    mouse_y: u32,
    cs: &ClickState,
) -> Result<Option<u16>, CollaboratorError> {
    let document = web_sys::window()
        .ok_or(CollaboratorError::Missing("window"))?
        .document()
        .ok_or(CollaboratorError::Missing("document"))?;
    // DomBackend renders into a <div> directly under <body>.
    let grid = document
        .query_selector("body > div")
        .ok()
        .flatten()
        .ok_or(CollaboratorError::Missing("terminal grid"))?;
    let rect = grid.get_bounding_client_rect();
    Ok(cs.hit_test_pixels(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    ))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

fn page_hidden() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .is_some_and(|d| d.hidden())
}

/// Mirror the headline balance into the tab title.
fn show_balance(state: &GameState) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(&format!(
            "{} Neurons · Universal Psychology",
            format_number(state.ledger.neurons.floor())
        ));
    }
}

#[cfg(target_arch = "wasm32")]
fn load_tuning() -> Tuning {
    psych::save::load_tuning()
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning() -> Tuning {
    Tuning::default()
}

/// Read a slot into `state`. Returns true when a save was found.
#[cfg(target_arch = "wasm32")]
fn restore_slot(state: &mut GameState, slot: u32) -> bool {
    match psych::save::load_game(state, slot) {
        Ok(true) => {
            tracing::info!(slot, "save restored");
            true
        }
        Ok(false) => {
            tracing::info!(slot, "slot is empty");
            false
        }
        Err(e) => {
            tracing::warn!(slot, error = %e, "could not restore save");
            false
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn restore_slot(_state: &mut GameState, _slot: u32) -> bool {
    false
}

#[cfg(target_arch = "wasm32")]
fn persist(state: &GameState, slot: u32) {
    if let Err(e) = psych::save::save_game(state, slot) {
        tracing::warn!(slot, error = %e, "save failed");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn persist(_state: &GameState, _slot: u32) {}

#[cfg(target_arch = "wasm32")]
fn wipe_slot(state: &GameState, slot: u32) {
    if let Err(e) = psych::save::delete_save(state, slot) {
        tracing::warn!(slot, error = %e, "could not delete save");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn wipe_slot(_state: &GameState, _slot: u32) {}

/// Carry out a load or reset the player asked for.
fn apply_slot_request(game: &mut PsychGame, request: SlotRequest) {
    match request {
        SlotRequest::Load(slot) => {
            let mut state = GameState::with_tuning(load_tuning());
            if restore_slot(&mut state, slot) {
                game.replace_state(state);
                game.state.log_message(&format!("Loaded slot {}.", slot), LogCategory::Info);
            } else {
                game.state
                    .log_message(&format!("Nothing to load in slot {}.", slot), LogCategory::Warning);
            }
        }
        SlotRequest::Reset(slot) => {
            wipe_slot(&game.state, slot);
            game.replace_state(GameState::with_tuning(load_tuning()));
            game.state
                .log_message(&format!("New game started in slot {}.", slot), LogCategory::Info);
        }
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init();

    let mut state = GameState::with_tuning(load_tuning());
    restore_slot(&mut state, START_SLOT);
    let game = Rc::new(RefCell::new(
        PsychGame::with_state(state)
            .on_slot(START_SLOT)
            .with_listener(show_balance),
    ));
    let click_state = Rc::new(RefCell::new(ClickState::new()));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                match dom_click_action(mouse_event.x, mouse_event.y, &cs) {
                    Ok(action) => action,
                    Err(e) => {
                        tracing::warn!(error = %e, "click ignored");
                        None
                    }
                }
            };
            if let Some(id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(id));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                game.borrow_mut().handle_input(&InputEvent::Key(c));
            }
        }
    });

    let game_time = RefCell::new(GameTime::new(TICKS_PER_SEC));
    terminal.draw_web(move |f| {
        let ticks = {
            let mut clock = game_time.borrow_mut();
            if page_hidden() {
                clock.reset_anchor();
                0
            } else {
                clock.update(now_ms())
            }
        };

        let mut game = game.borrow_mut();
        game.tick(ticks);
        if let Some(request) = game.take_slot_request() {
            apply_slot_request(&mut game, request);
        }
        if game.state.save_requested {
            game.state.save_requested = false;
            persist(&game.state, game.slot());
        }

        let area = f.area();
        click_state.borrow_mut().begin_frame(area.width, area.height);
        game.render(f, area, &click_state);
    });

    Ok(())
}
