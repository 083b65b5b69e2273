use std::ops::Range;

use icu_segmenter::GraphemeClusterSegmenter;

use crate::text::clipboard::Clipboard;

/// Editable text with a caret and an optional selection.
///
/// Positions are char indices (0 = before the first char). A selection is
/// `[selection_start, selection_end)`; when both are equal there is only a
/// caret.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selection_start: usize,
    selection_end: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.write(text);
        buffer
    }

    pub fn read(&self) -> &str {
        &self.text
    }

    /// Replace the whole buffer; the caret moves to the end.
    pub fn write(&mut self, text: &str) {
        self.text = text.to_string();
        let end = self.len();
        self.selection_start = end;
        self.selection_end = end;
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.selection_start
    }

    pub fn set_cursor(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        self.selection_start = pos;
        self.selection_end = pos;
    }

    /// Select `[start, end)`. Bounds are clamped and may be given in either
    /// order.
    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len));
        self.selection_start = start.min(end);
        self.selection_end = start.max(end);
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        (self.selection_start != self.selection_end)
            .then_some(self.selection_start..self.selection_end)
    }

    pub fn selected_text(&self) -> &str {
        let start = self.char_to_byte(self.selection_start);
        let end = self.char_to_byte(self.selection_end);
        &self.text[start..end]
    }

    /// Replace the selection (or insert at the caret) with `text`. The whole
    /// string is one insertion, so multi-codepoint glyphs stay together.
    pub fn insert(&mut self, text: &str) {
        let start = self.char_to_byte(self.selection_start);
        let end = self.char_to_byte(self.selection_end);
        self.text.replace_range(start..end, text);
        self.set_cursor(self.selection_start + text.chars().count());
    }

    /// Delete the selection, or the grapheme cluster before the caret.
    /// Returns false when there was nothing to delete.
    pub fn delete_backward(&mut self) -> bool {
        if self.selection().is_some() {
            let start = self.char_to_byte(self.selection_start);
            let end = self.char_to_byte(self.selection_end);
            self.text.replace_range(start..end, "");
            self.set_cursor(self.selection_start);
            return true;
        }

        if self.selection_start == 0 {
            return false;
        }

        let end = self.char_to_byte(self.selection_start);
        let start = previous_grapheme_boundary(&self.text[..end]);
        let removed = self.text[start..end].chars().count();
        self.text.replace_range(start..end, "");
        self.set_cursor(self.selection_start - removed);
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.selection_start = 0;
        self.selection_end = 0;
    }

    /// Best effort; reports whether any clipboard backend accepted the text.
    pub fn copy_to_clipboard(&self, clipboard: &mut Clipboard) -> bool {
        clipboard.copy(&self.text)
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}

/// Byte offset where the last grapheme cluster of `text` starts.
fn previous_grapheme_boundary(text: &str) -> usize {
    let segmenter = GraphemeClusterSegmenter::new();
    let mut breaks: Vec<usize> = segmenter.segment_str(text).collect();
    // The final breakpoint is the end of the string.
    breaks.pop();
    breaks.pop().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_insert_delete_clear() {
        let mut buffer = TextBuffer::new();
        buffer.write("hello");
        assert_eq!(buffer.read(), "hello");

        buffer.insert("!");
        assert_eq!(buffer.read(), "hello!");
        assert_eq!(buffer.len(), 6);

        assert!(buffer.delete_backward());
        assert_eq!(buffer.read(), "hello");
        assert_eq!(buffer.len(), 5);

        buffer.clear();
        assert_eq!(buffer.read(), "");
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut buffer = TextBuffer::from_text("abcde");
        buffer.select(1, 3);
        assert_eq!(buffer.selected_text(), "bc");

        buffer.insert("X");
        assert_eq!(buffer.read(), "aXde");
        assert_eq!(buffer.cursor(), 2);
        assert_eq!(buffer.selection(), None);
    }

    #[test]
    fn test_delete_at_start_is_noop() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.set_cursor(0);
        assert!(!buffer.delete_backward());
        assert_eq!(buffer.read(), "abc");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_delete_removes_exactly_the_selection() {
        let mut buffer = TextBuffer::from_text("abcdef");
        buffer.select(4, 1);
        assert!(buffer.delete_backward());
        assert_eq!(buffer.read(), "aef");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_delete_in_middle() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.set_cursor(2);
        buffer.delete_backward();
        assert_eq!(buffer.read(), "ac");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_multi_codepoint_insert_moves_past_whole_glyph() {
        let mut buffer = TextBuffer::from_text("ب");
        buffer.insert("لا");
        assert_eq!(buffer.read(), "بلا");
        assert_eq!(buffer.cursor(), 3);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_delete_removes_whole_grapheme_cluster() {
        let mut buffer = TextBuffer::from_text("ae\u{301}");
        assert!(buffer.delete_backward());
        assert_eq!(buffer.read(), "a");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_set_cursor_and_select_clamp() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.set_cursor(99);
        assert_eq!(buffer.cursor(), 3);
        buffer.select(2, 99);
        assert_eq!(buffer.selection(), Some(2..3));
    }

    #[test]
    fn test_insert_at_caret_inside_multibyte_text() {
        let mut buffer = TextBuffer::from_text("اردو");
        buffer.set_cursor(1);
        buffer.insert("ب");
        assert_eq!(buffer.read(), "ابردو");
        assert_eq!(buffer.cursor(), 2);
    }
}
