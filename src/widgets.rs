//! Clickable building blocks that render and register targets together.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

/// One-line tab strip. Click targets follow the rendered label widths.
pub struct TabBar<'a> {
    tabs: Vec<(String, Style, u16)>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push((label.into(), style, action_id));
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let sep_width = Line::from(self.separator).width() as u16;
        let mut spans = Vec::new();
        let mut widths = Vec::new();
        for (i, (label, style, action_id)) in self.tabs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, Style::default().fg(Color::DarkGray)));
            }
            let padded = format!(" {} ", label);
            widths.push((Line::from(padded.as_str()).width() as u16, action_id));
            spans.push(Span::styled(padded, style));
        }

        let inner = self.block.as_ref().map_or(area, |b| b.inner(area));
        let mut paragraph = Paragraph::new(Line::from(spans));
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        f.render_widget(paragraph, area);

        // Full outer height so a tap on the border still lands.
        cs.register_tab_targets(&widths, sep_width, inner.x, area.y, inner.width, area.height.max(1));
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines for a paragraph, some of them bound to actions.
///
/// Targets are attached to line indices, so inserting a line above a button
/// moves its target with it.
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register targets for every clickable line visible in `area`.
    ///
    /// `top_offset`/`bottom_offset` are the rows taken by borders, `scroll`
    /// is in visual rows. With `inner_width == 0` each line is one row;
    /// otherwise lines are word-wrapped the way `Paragraph` wraps them and
    /// stay clickable on every row they cover.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        let mut starts = Vec::with_capacity(self.lines.len());
        let mut heights = Vec::with_capacity(self.lines.len());
        let mut cumulative = 0u16;
        for line in &self.lines {
            let h = if inner_width == 0 {
                1
            } else {
                Paragraph::new(line.clone())
                    .wrap(Wrap { trim: false })
                    .line_count(inner_width)
                    .max(1) as u16
            };
            starts.push(cumulative);
            heights.push(h);
            cumulative += h;
        }

        for &(line_idx, action_id) in &self.actions {
            let li = line_idx as usize;
            for vr in starts[li]..starts[li] + heights[li] {
                if vr < scroll {
                    continue;
                }
                let row = content_y + (vr - scroll);
                if row >= content_end {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_follow_line_positions() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("Neurons: 12"));
        cl.push_clickable(Line::from(" [N] Add Neurons"), 0);
        cl.push(Line::from(""));
        cl.push_clickable(Line::from(" [E] Buy Food"), 301);
        assert_eq!(cl.len(), 4);

        let area = Rect::new(0, 5, 40, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);
        assert_eq!(cs.hit_test(3, 7), Some(0));
        assert_eq!(cs.hit_test(3, 9), Some(301));
        assert_eq!(cs.hit_test(3, 6), None);
        assert_eq!(cs.hit_test(3, 8), None);
    }

    #[test]
    fn scrolled_lines_have_no_targets() {
        let mut cl = ClickableList::new();
        for i in 0..4u16 {
            cl.push_clickable(Line::from(format!("option {}", i)), 400 + i);
        }
        let area = Rect::new(0, 10, 40, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 1, 2, 0);
        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(0, 10), Some(402));
        assert_eq!(cs.hit_test(0, 11), Some(403));
    }

    #[test]
    fn clipped_by_bottom_border() {
        let mut cl = ClickableList::new();
        for i in 0..10u16 {
            cl.push_clickable(Line::from("upgrade"), 100 + i);
        }
        let area = Rect::new(0, 0, 40, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);
        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(0, 3), Some(102));
        assert_eq!(cs.hit_test(0, 4), None);
    }

    #[test]
    fn wrapped_question_pushes_options_down() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("Who rang a bell for dogs?"));
        cl.push_clickable(Line::from("Pavlov"), 400);
        let area = Rect::new(0, 0, 12, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 0, 0, 10);
        // 25 columns wrap to 3 rows at width 10
        assert_eq!(cs.hit_test(1, 3), Some(400));
        assert_eq!(cs.hit_test(1, 2), None);
    }

    #[test]
    fn wrapped_button_clickable_on_each_row() {
        let mut cl = ClickableList::new();
        cl.push_clickable(Line::from("x".repeat(25)), 7);
        let area = Rect::new(0, 0, 12, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 0, 0, 10);
        assert_eq!(cs.hit_test(0, 0), Some(7));
        assert_eq!(cs.hit_test(0, 2), Some(7));
        assert_eq!(cs.hit_test(0, 3), None);
    }

    #[test]
    fn empty_line_counts_as_one_row() {
        let mut cl = ClickableList::new();
        cl.push(Line::from(""));
        cl.push_clickable(Line::from("go"), 3);
        let area = Rect::new(0, 0, 12, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 0, 0, 10);
        assert_eq!(cs.hit_test(0, 1), Some(3));
    }

    #[test]
    fn into_lines_keeps_order() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("a"));
        cl.push_clickable(Line::from("b"), 1);
        let lines = cl.into_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].width(), 1);
    }
}
