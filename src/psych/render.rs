//! Terminal readout for Universal Psychology.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::instability::{self, Status};
use super::logic::TICKS_PER_STEP;
use super::phrases::phrase;
use super::state::{Catalog, Cost, Feature, GameState, LogCategory, Tab};
use super::{projects, quiz, tab_available, upgrades, SAVE_SLOTS};

const SPARKLINE_CHARS: &[char] = &[' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];

pub fn render(
    state: &GameState,
    slot: u32,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let (main_area, side_log) = if area.width >= 80 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (cols[0], Some(cols[1]))
    } else {
        (area, None)
    };

    let log_rows = if side_log.is_some() { 0 } else { 6 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(log_rows),
        ])
        .split(main_area);

    render_header(state, slot, f, chunks[0], click_state);
    render_tab_bar(state, f, chunks[1], click_state);
    match state.tab {
        Tab::Brain => render_brain(state, slot, f, chunks[2], click_state),
        Tab::Upgrades => render_upgrade_list(state, Catalog::Core, f, chunks[2], click_state),
        Tab::Proliferation => render_proliferation(state, f, chunks[2], click_state),
        Tab::Quiz => render_quiz(state, f, chunks[2], click_state),
        Tab::Projects => render_projects(state, f, chunks[2], click_state),
    }
    render_log(state, f, side_log.unwrap_or(chunks[3]));
}

fn render_header(
    state: &GameState,
    slot: u32,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tier = state.progression.current_tier;
    let ledger = &state.ledger;
    let narrow = is_narrow_layout(area.width);
    let status = instability::status(state);

    let mut cl = ClickableList::new();
    let mut balances = vec![Span::styled(
        format!(" 🧠 {}", format_number(ledger.neurons)),
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )];
    if !narrow {
        balances.push(Span::styled(
            format!(" (+{}/s)", format_number(state.rates.passive_neurons_per_sec)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    balances.extend([
        Span::styled(
            format!("  PB {}", format_number(ledger.psychbucks)),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("  ⛽ {}", format_number(ledger.neuro_fuel)),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    if state.progression.is_unlocked(Feature::Projects) {
        balances.push(Span::styled(
            format!("  ops {}", format_number(state.available_mind_ops())),
            Style::default().fg(Color::Cyan),
        ));
    }
    cl.push(Line::from(balances));

    cl.push(Line::from(vec![
        Span::styled(format!(" IQ {}", state.iq()), Style::default().fg(Color::White)),
        Span::styled(format!("  Lv {}", tier), Style::default().fg(Color::White)),
        Span::styled("  anxiety ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            meter_bar(state.instability.meter, state.tuning.max_anxiety, 10),
            Style::default().fg(status_color(status)),
        ),
        Span::styled(
            format!(" {}", status.label()),
            Style::default().fg(status_color(status)).add_modifier(Modifier::BOLD),
        ),
    ]));

    let click_style = if state.is_attack_active() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    };
    cl.push_clickable(button("N", phrase("addNeurons", tier), click_style), GENERATE_NEURONS);

    let border_color = if state.purchase_flash > 0 {
        Color::White
    } else {
        status_color(status)
    };
    let title = format!(" {} · slot {}/{} ", phrase("yourBrain", tier), slot, SAVE_SLOTS);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_tab_bar(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tier = state.progression.current_tier;
    let tabs = [
        (Tab::Brain, "yourBrain", TAB_BRAIN),
        (Tab::Upgrades, "coreUpgrades", TAB_UPGRADES),
        (Tab::Proliferation, "neuronProliferation", TAB_PROLIFERATION),
        (Tab::Quiz, "testYourKnowledge", TAB_QUIZ),
        (Tab::Projects, "projects", TAB_PROJECTS),
    ];
    let narrow = is_narrow_layout(area.width);

    let mut bar = TabBar::new("│").block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    for (tab, key, action) in tabs {
        if !tab_available(state, tab) {
            continue;
        }
        let label = phrase(key, tier);
        let label = if narrow {
            label.chars().take(6).collect::<String>()
        } else {
            label.to_string()
        };
        let style = if tab == state.tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        bar = bar.tab(label, style, action);
    }
    bar.render(f, area, &mut click_state.borrow_mut());
}

fn render_brain(
    state: &GameState,
    slot: u32,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tier = state.progression.current_tier;
    let inst = &state.instability;
    let mut cl = ClickableList::new();

    let width = (area.width as usize).saturating_sub(14).clamp(6, 40);
    let neurons: Vec<f64> = state.history.iter().map(|(n, _)| *n).collect();
    cl.push(Line::from(vec![
        Span::styled(" neurons ", Style::default().fg(Color::DarkGray)),
        Span::styled(sparkline(&neurons, width), Style::default().fg(Color::Magenta)),
    ]));
    cl.push(Line::from(Span::styled(
        format!(
            " {:.1}% anxiety, {} steps overdriven",
            inst.meter, inst.sustained_high_input_time
        ),
        Style::default().fg(Color::DarkGray),
    )));

    if inst.active_stimuli > 0 {
        let label = format!("Dismiss stimulus ({} left)", inst.active_stimuli);
        cl.push_clickable(
            button("X", &label, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            DISMISS_STIMULUS,
        );
    }

    if state.progression.is_unlocked(Feature::HypothalamusControls) {
        cl.push(Line::from(Span::styled(
            format!(" ┄┄ {} ┄┄", phrase("hypothalamusControls", tier)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        let slider = Style::default().fg(Color::White);
        let dopamine = format!("{} {}", phrase("dopamine", tier), state.controls.dopamine);
        let gaba = format!("{} {}", phrase("gaba", tier), state.controls.gaba);
        cl.push_clickable(button("+", &format!("{} ▲", dopamine), slider), DOPAMINE_UP);
        cl.push_clickable(button("-", &format!("{} ▼", dopamine), slider), DOPAMINE_DOWN);
        cl.push_clickable(button(">", &format!("{} ▲", gaba), slider), GABA_UP);
        cl.push_clickable(button("<", &format!("{} ▼", gaba), slider), GABA_DOWN);
    }

    let running: Vec<String> = state
        .scheduler
        .running()
        .map(|a| {
            let ticks = state.scheduler.ticks_until(a).unwrap_or(0);
            format!("{} ({}s)", a.name(), ticks.div_ceil(TICKS_PER_STEP))
        })
        .collect();
    if !running.is_empty() {
        cl.push(Line::from(Span::styled(
            format!(" running: {}", running.join(", ")),
            Style::default().fg(Color::Green),
        )));
    }

    if state.progression.is_unlocked(Feature::Questions) {
        cl.push_clickable(
            button("S", "Spin the pokies (1 PB)", Style::default().fg(Color::Yellow)),
            SPIN_POKIES,
        );
    }
    let games: Vec<&str> = state
        .progression
        .unlocked_features
        .iter()
        .filter_map(|feat| match feat {
            Feature::Minigame(m) => Some(m.name()),
            _ => None,
        })
        .collect();
    if !games.is_empty() {
        cl.push(Line::from(Span::styled(
            format!(" {}: {}", phrase("neuroGames", tier), games.join(", ")),
            Style::default().fg(Color::Magenta),
        )));
    }
    let dim = Style::default().fg(Color::DarkGray);
    cl.push_clickable(button("W", &format!("Save to slot {}", slot), dim), SAVE_NOW);
    cl.push_clickable(button("L", &format!("Load slot {}", slot), dim), LOAD_SLOT);
    cl.push_clickable(button("O", &format!("Next slot ({}/{})", slot, SAVE_SLOTS), dim), NEXT_SLOT);
    cl.push_clickable(
        button("R", &format!("New game in slot {}", slot), Style::default().fg(Color::Red)),
        NEW_GAME,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" {} ", phrase("yourBrain", tier)));
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_upgrade_list(
    state: &GameState,
    catalog: Catalog,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    push_upgrades(state, catalog, &mut cl, !is_narrow_layout(area.width));
    let title = format!(" {} ", phrase("coreUpgrades", state.progression.current_tier));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title);
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn push_upgrades(state: &GameState, catalog: Catalog, cl: &mut ClickableList, descriptions: bool) {
    let base = match catalog {
        Catalog::Core => BUY_CORE_BASE,
        Catalog::Proliferation => BUY_PROLIF_BASE,
    };
    let visible = upgrades::visible_upgrades(state, catalog);
    if visible.is_empty() {
        cl.push(Line::from(Span::styled(
            " (nothing to buy yet)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, id) in visible.into_iter().enumerate() {
        let def = id.def();
        let (style, suffix) = if state.is_applied(id) {
            (Style::default().fg(Color::DarkGray), "✔".to_string())
        } else if upgrades::is_purchasable(state, id) && state.ledger.can_afford(def.costs) {
            (Style::default().fg(Color::Green), cost_label(def.costs))
        } else {
            (Style::default().fg(Color::White), cost_label(def.costs))
        };
        let key = (i + 1).to_string();
        cl.push_clickable(
            button(&key, &format!("{} · {}", def.name, suffix), style),
            base + i as u16,
        );
        if descriptions {
            cl.push(Line::from(Span::styled(
                format!("     {}", def.description),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
}

fn render_proliferation(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tier = state.progression.current_tier;
    let mut cl = ClickableList::new();

    if state.progression.is_unlocked(Feature::FactoryPanel) {
        cl.push(Line::from(Span::styled(
            format!(
                " {}: {}",
                phrase("proliferationFactories", tier),
                state.factory_count
            ),
            Style::default().fg(Color::White),
        )));
        let label = format!(
            "{} ({} PB)",
            phrase("buyFactory", tier),
            format_number(state.factory_cost)
        );
        cl.push_clickable(button("F", &label, affordable_style(state.ledger.psychbucks, state.factory_cost)), BUY_FACTORY);
    }
    if state.progression.is_unlocked(Feature::NeuroFuel) {
        cl.push(Line::from(Span::styled(
            format!(
                " {}: {}",
                phrase("neurofuel", tier),
                format_number(state.ledger.neuro_fuel)
            ),
            Style::default().fg(Color::Yellow),
        )));
        let label = format!("{} ({} PB)", phrase("buyFood", tier), state.neuro_fuel_cost);
        cl.push_clickable(button("E", &label, affordable_style(state.ledger.psychbucks, state.neuro_fuel_cost)), BUY_FUEL);
    }
    cl.push(Line::from(Span::styled(
        format!(" ┄┄ {} ┄┄", phrase("neuronProliferation", tier)),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    push_upgrades(state, Catalog::Proliferation, &mut cl, !is_narrow_layout(area.width));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" {} ", phrase("neuronProliferation", tier)));
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_quiz(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tier = state.progression.current_tier;
    let mut cl = ClickableList::new();

    match quiz::current_question(state) {
        Some(q) => {
            cl.push(Line::from(Span::styled(
                q.question.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )));
            for (i, option) in q.options.iter().enumerate() {
                let key = (i + 1).to_string();
                cl.push_clickable(button(&key, option, Style::default().fg(Color::Cyan)), ANSWER_BASE + i as u16);
            }
        }
        None => cl.push(Line::from(Span::styled(
            "No question available.",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    if let Some(feedback) = &state.quiz.feedback {
        cl.push(Line::from(Span::styled(
            feedback.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    if state.quiz.streak_count > 0 {
        cl.push(Line::from(Span::styled(
            format!(
                "Streak {} (+{} PB bonus)",
                state.quiz.streak_count, state.quiz.streak_bonus
            ),
            Style::default().fg(Color::Green),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", phrase("testYourKnowledge", tier)));
    let inner_width = area.width.saturating_sub(2);
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0, inner_width);
    let widget = Paragraph::new(cl.into_lines())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_projects(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tier = state.progression.current_tier;
    let available = state.available_mind_ops();
    let mut cl = ClickableList::new();

    cl.push(Line::from(Span::styled(
        format!(" Mind Ops available: {}", format_number(available)),
        Style::default().fg(Color::Cyan),
    )));
    let offered = projects::offered(state);
    if offered.is_empty() {
        cl.push(Line::from(Span::styled(
            " (no projects on offer)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, project) in offered.iter().enumerate() {
        let key = (i + 1).to_string();
        let label = format!("{} · {} ops", project.title, format_number(project.cost));
        cl.push_clickable(button(&key, &label, affordable_style(available, project.cost)), PROJECT_BASE + i as u16);
        cl.push(Line::from(Span::styled(
            format!("     {}", project.description),
            Style::default().fg(Color::DarkGray),
        )));
    }
    for id in &state.purchased_projects {
        cl.push(Line::from(Span::styled(
            format!(" ✔ {}", projects::def(*id).title),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(format!(" {} ", phrase("projects", tier)));
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_log(state: &GameState, f: &mut Frame, area: Rect) {
    if area.height < 3 {
        return;
    }
    let visible = area.height.saturating_sub(2) as usize;
    let start = state.log.len().saturating_sub(visible);
    let lines: Vec<Line> = state.log[start..]
        .iter()
        .map(|entry| {
            let style = match entry.category {
                LogCategory::Info => Style::default().fg(Color::Gray),
                LogCategory::Warning => Style::default().fg(Color::Red),
                LogCategory::Upgrade => Style::default().fg(Color::Green),
                LogCategory::Unlock => Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn button(key: &str, label: &str, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" [{}] ", key),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(label.to_string(), style),
    ])
}

fn affordable_style(balance: f64, cost: f64) -> Style {
    if balance >= cost {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Attack => Color::Red,
        Status::Stimuli | Status::Critical => Color::LightRed,
        Status::Elevated => Color::Yellow,
        Status::Moderate | Status::Normal => Color::Green,
    }
}

fn cost_label(costs: &[Cost]) -> String {
    costs
        .iter()
        .map(|c| format!("{} {}", format_number(c.amount), c.currency))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Short human number: `950`, `12.5`, `12.3K`, `4.56M`.
pub fn format_number(value: f64) -> String {
    let v = if value.is_finite() { value } else { 0.0 };
    if v.abs() >= 1_000_000.0 {
        format!("{:.2}M", v / 1_000_000.0)
    } else if v.abs() >= 10_000.0 {
        format!("{:.1}K", v / 1_000.0)
    } else if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Horizontal fill bar, `width` cells wide.
fn meter_bar(value: f64, max: f64, width: usize) -> String {
    let frac = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = ((frac * width as f64).round() as usize).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Last `width` samples scaled between their min and max.
fn sparkline(samples: &[f64], width: usize) -> String {
    let tail = &samples[samples.len().saturating_sub(width)..];
    let lo = tail.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = tail.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let top = SPARKLINE_CHARS.len() - 1;
    tail.iter()
        .map(|v| {
            if hi > lo {
                SPARKLINE_CHARS[(((v - lo) / (hi - lo)) * top as f64).round() as usize]
            } else {
                SPARKLINE_CHARS[1]
            }
        })
        .collect()
}
