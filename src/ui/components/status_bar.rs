use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::keyboard::display::{language_label, mode_label};
use crate::keyboard::state::KeyboardState;
use crate::session::status::StatusMessage;
use crate::ui::theme::Theme;

/// One line: active language and mode on the left, the current status
/// message (if any) after them.
pub struct StatusBar<'a> {
    pub state: &'a KeyboardState,
    pub message: Option<&'a StatusMessage>,
    pub theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a KeyboardState, message: Option<&'a StatusMessage>, theme: &'a Theme) -> Self {
        Self {
            state,
            message,
            theme,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let base = Style::default().fg(colors.header_fg()).bg(colors.header_bg());

        let mut spans = vec![
            Span::styled(
                format!(" {} ", mode_label(self.state.mode())),
                base.add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("· {} ", language_label(self.state.language())), base),
        ];
        if self.state.case_invert() {
            spans.push(Span::styled(
                " Caps ",
                Style::default().fg(colors.bg()).bg(colors.caps_pending()),
            ));
        }
        if let Some(message) = self.message {
            spans.push(Span::styled("  ", base));
            spans.push(Span::styled(
                message.text.clone(),
                base.fg(colors.severity(message.severity)),
            ));
        }

        Paragraph::new(Line::from(spans))
            .style(base)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_line(state: &KeyboardState, message: Option<&StatusMessage>) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(state, message, &theme).render(area, &mut buf);
        (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_shows_mode_and_message() {
        let state = KeyboardState::new();
        let message = StatusMessage::success("Copied to clipboard!");
        let line = render_line(&state, Some(&message));
        assert!(line.contains("Lowercase Mode"));
        assert!(line.contains("English"));
        assert!(line.contains("Copied to clipboard!"));
        assert!(!line.contains("Caps"));
    }

    #[test]
    fn test_shows_pending_caps() {
        let mut state = KeyboardState::new();
        state.toggle_one_shot_case_invert();
        assert!(render_line(&state, None).contains("Caps"));
    }
}
