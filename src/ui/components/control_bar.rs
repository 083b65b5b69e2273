use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Widget};

use crate::keyboard::display::{CONTROL_ROW, ControlKey, control_label};
use crate::keyboard::state::KeyboardState;
use crate::ui::theme::Theme;

/// Mode, language, caps and editing buttons below the grid. Buttons wrap
/// onto further lines when the terminal is narrow.
pub struct ControlBar<'a> {
    pub state: &'a KeyboardState,
    pub focused: Option<usize>,
    pub theme: &'a Theme,
}

impl<'a> ControlBar<'a> {
    pub fn new(state: &'a KeyboardState, focused: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            state,
            focused,
            theme,
        }
    }
}

fn button_width(key: ControlKey, symbols_active: bool) -> u16 {
    Span::raw(control_label(key, symbols_active)).width() as u16 + 2
}

/// Screen cell of every control button that fits, in `CONTROL_ROW` order.
pub fn control_rects(inner: Rect, symbols_active: bool) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(CONTROL_ROW.len());
    let mut x = inner.x;
    let mut y = inner.y;
    for &key in CONTROL_ROW {
        let width = button_width(key, symbols_active);
        if x > inner.x && x + width > inner.right() {
            x = inner.x;
            y += 1;
        }
        if y >= inner.bottom() {
            break;
        }
        rects.push(Rect::new(x, y, width.min(inner.width), 1));
        x += width + 1;
    }
    rects
}

/// Lines the control row needs at `width` columns, border excluded.
pub fn control_lines(width: u16, symbols_active: bool) -> u16 {
    let unbounded = Rect::new(0, 0, width, u16::MAX);
    control_rects(unbounded, symbols_active)
        .last()
        .map_or(1, |rect| rect.y + 1)
}

/// Index into `CONTROL_ROW` of the button at (x, y).
pub fn control_at(inner: Rect, symbols_active: bool, x: u16, y: u16) -> Option<usize> {
    control_rects(inner, symbols_active)
        .iter()
        .position(|rect| rect.contains(Position::new(x, y)))
}

impl Widget for ControlBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let symbols_active = self.state.is_symbol_mode();
        for (idx, rect) in control_rects(inner, symbols_active).into_iter().enumerate() {
            let key = CONTROL_ROW[idx];
            let active = match key {
                ControlKey::Language(language) => language == self.state.language(),
                ControlKey::Mode(mode) => mode == self.state.mode(),
                ControlKey::SymbolsToggle => symbols_active,
                ControlKey::Caps => self.state.case_invert(),
                _ => false,
            };

            let style = if self.focused == Some(idx) {
                Style::default()
                    .fg(colors.key_focused_fg())
                    .bg(colors.key_focused_bg())
                    .add_modifier(Modifier::BOLD)
            } else if key == ControlKey::Caps && active {
                Style::default().fg(colors.bg()).bg(colors.caps_pending())
            } else if active {
                Style::default().fg(colors.bg()).bg(colors.key_active())
            } else {
                Style::default().fg(colors.key_fg()).bg(colors.key_bg())
            };

            let label = format!(" {} ", control_label(key, symbols_active));
            buf.set_stringn(rect.x, rect.y, &label, rect.width as usize, style);
        }
    }
}
