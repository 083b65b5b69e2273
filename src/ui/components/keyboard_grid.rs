use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::keyboard::display::{language_label, mode_label};
use crate::keyboard::layout::Layout;
use crate::keyboard::state::KeyboardState;
use crate::ui::theme::Theme;

const MIN_KEY_WIDTH: u16 = 3;
const MAX_KEY_WIDTH: u16 = 7;

/// The character keys of the active layout, one terminal line per row,
/// each row centered.
pub struct KeyboardGrid<'a> {
    pub state: &'a KeyboardState,
    pub focused: Option<(usize, usize)>,
    pub theme: &'a Theme,
}

impl<'a> KeyboardGrid<'a> {
    pub fn new(state: &'a KeyboardState, focused: Option<(usize, usize)>, theme: &'a Theme) -> Self {
        Self {
            state,
            focused,
            theme,
        }
    }
}

/// Area inside the grid's border.
pub fn grid_inner(area: Rect) -> Rect {
    Block::bordered().inner(area)
}

fn key_width(inner: Rect, layout: Layout) -> u16 {
    let widest = layout.shape().into_iter().max().unwrap_or(0) as u16;
    if widest == 0 {
        return 0;
    }
    (inner.width / widest).clamp(MIN_KEY_WIDTH, MAX_KEY_WIDTH)
}

/// Screen cell of a key, or `None` if it does not fit in `inner`.
pub fn key_rect(inner: Rect, layout: Layout, row: usize, col: usize) -> Option<Rect> {
    let cols = layout.rows().get(row)?.len() as u16;
    if col as u16 >= cols {
        return None;
    }
    let width = key_width(inner, layout);
    let offset = inner.width.saturating_sub(cols * width) / 2;
    let x = inner.x + offset + col as u16 * width;
    let y = inner.y + row as u16;
    if y >= inner.bottom() || x + width > inner.right() {
        return None;
    }
    Some(Rect::new(x, y, width, 1))
}

/// The (row, col) of the key drawn at screen position (x, y).
pub fn key_at(inner: Rect, layout: Layout, x: u16, y: u16) -> Option<(usize, usize)> {
    if y < inner.y {
        return None;
    }
    let row = (y - inner.y) as usize;
    let cells = layout.rows().get(row)?;
    (0..cells.len())
        .find(|&col| {
            key_rect(inner, layout, row, col)
                .is_some_and(|rect| rect.contains(Position::new(x, y)))
        })
        .map(|col| (row, col))
}

impl Widget for KeyboardGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.state.case_invert() {
            colors.caps_pending()
        } else {
            colors.border()
        };

        let title = format!(
            " {} · {} ",
            language_label(self.state.language()),
            mode_label(self.state.mode())
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = self.state.current_layout();
        for (row_idx, row) in layout.rows().iter().enumerate() {
            for (col_idx, glyph) in row.iter().enumerate() {
                let Some(rect) = key_rect(inner, layout, row_idx, col_idx) else {
                    continue;
                };

                let style = if self.focused == Some((row_idx, col_idx)) {
                    Style::default()
                        .fg(colors.key_focused_fg())
                        .bg(colors.key_focused_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.key_fg()).bg(colors.key_bg())
                };

                // Last column stays blank as a gap between keys.
                let label_width = rect.width.saturating_sub(1) as usize;
                let face = self.state.key_face(glyph);
                let label = format!("{face:^label_width$}");
                buf.set_stringn(rect.x, rect.y, &label, label_width, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::layout::{Language, LayoutTable, Mode};

    fn cell_text(buf: &Buffer, rect: Rect) -> String {
        (rect.x..rect.right())
            .map(|x| buf[(x, rect.y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_key_at_inverts_key_rect() {
        let inner = Rect::new(1, 1, 78, 5);
        let layout = LayoutTable::layout(Language::Urdu, Mode::Lowercase);
        for (row, cells) in layout.rows().iter().enumerate() {
            for col in 0..cells.len() {
                let rect = key_rect(inner, layout, row, col).unwrap();
                assert_eq!(key_at(inner, layout, rect.x, rect.y), Some((row, col)));
                assert_eq!(
                    key_at(inner, layout, rect.right() - 1, rect.y),
                    Some((row, col))
                );
            }
        }
    }

    #[test]
    fn test_key_at_outside_grid() {
        let inner = Rect::new(1, 1, 78, 5);
        let layout = LayoutTable::layout(Language::English, Mode::Lowercase);
        assert_eq!(key_at(inner, layout, 0, 0), None);
        assert_eq!(key_at(inner, layout, 1, 1), None);
        assert_eq!(key_at(inner, layout, 40, 40), None);
    }

    #[test]
    fn test_render_shows_key_faces_with_pending_caps() {
        let mut state = KeyboardState::new();
        state.toggle_one_shot_case_invert();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 7);
        let mut buf = Buffer::empty(area);
        KeyboardGrid::new(&state, Some((0, 0)), &theme).render(area, &mut buf);

        let layout = state.current_layout();
        let rect = key_rect(grid_inner(area), layout, 0, 0).unwrap();
        assert!(cell_text(&buf, rect).contains('Q'));
    }
}
