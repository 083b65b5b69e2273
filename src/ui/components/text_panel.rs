use icu_segmenter::GraphemeClusterSegmenter;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::text::buffer::TextBuffer;
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

/// The text typed so far, with the caret and selection drawn in.
pub struct TextPanel<'a> {
    pub buffer: &'a TextBuffer,
    pub theme: &'a Theme,
}

impl<'a> TextPanel<'a> {
    pub fn new(buffer: &'a TextBuffer, theme: &'a Theme) -> Self {
        Self { buffer, theme }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let normal = Style::default().fg(colors.fg());
        let cursor = Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg());
        let selected = Style::default().fg(colors.fg()).bg(colors.text_selection_bg());

        let caret = self.buffer.cursor();
        let selection = self.buffer.selection();
        let text = self.buffer.read();
        let breaks: Vec<usize> = GraphemeClusterSegmenter::new().segment_str(text).collect();
        let mut lines = Vec::new();
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut char_pos = 0;

        // One span per grapheme cluster, so combining marks stay with
        // their base. Caret and selection are char positions.
        for pair in breaks.windows(2) {
            let cluster = &text[pair[0]..pair[1]];
            if cluster.is_empty() {
                continue;
            }
            let chars = char_pos..char_pos + cluster.chars().count();
            char_pos = chars.end;

            if cluster == "\n" || cluster == "\r\n" {
                if selection.is_none() && chars.contains(&caret) {
                    spans.push(Span::styled(" ", cursor));
                }
                lines.push(Line::from(std::mem::take(&mut spans)));
                continue;
            }
            let style = match &selection {
                Some(range) if range.start < chars.end && chars.start < range.end => selected,
                None if chars.contains(&caret) => cursor,
                _ => normal,
            };
            spans.push(Span::styled(cluster.to_string(), style));
        }
        if selection.is_none() && caret == self.buffer.len() {
            spans.push(Span::styled(" ", cursor));
        }
        lines.push(Line::from(spans));
        lines
    }
}

impl Widget for TextPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Text ")
            .title_bottom(format!(" Characters: {} ", self.buffer.len()))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);

        // Keep the caret's line on screen.
        let before_caret: String = self.buffer.read().chars().take(self.buffer.cursor()).collect();
        let caret_line = wrapped_line_count(&before_caret, inner.width as usize).saturating_sub(1);
        let scroll = caret_line.saturating_sub(inner.height.saturating_sub(1) as usize) as u16;

        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(block)
            .render(area, buf);
    }
}
