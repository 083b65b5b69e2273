use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Text area, keyboard grid and control row stacked top to bottom, with a
/// one-line header and footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub text: Rect,
    pub keyboard: Rect,
    pub controls: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// `keyboard_rows` is the row count of the active layout; the grid
    /// gets one line per row plus its border.
    pub fn new(area: Rect, keyboard_rows: u16, control_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(keyboard_rows + 2),
                Constraint::Length(control_lines + 2),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: vertical[0],
            text: vertical[1],
            keyboard: vertical[2],
            controls: vertical[3],
            footer: vertical[4],
        }
    }
}

/// Screen lines needed to show `text` in a box `width` columns wide.
pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    text.split('\n')
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum()
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_stack_without_overlap() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 30), 5, 1);
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.keyboard.height, 7);
        assert_eq!(layout.controls.height, 3);
        assert_eq!(layout.footer.y, 29);
        assert_eq!(layout.text.y, 1);
        assert_eq!(layout.keyboard.y, layout.text.y + layout.text.height);
    }

    #[test]
    fn test_wrapped_line_count_counts_newlines() {
        assert_eq!(wrapped_line_count("", 10), 1);
        assert_eq!(wrapped_line_count("abc\n", 10), 2);
        assert_eq!(wrapped_line_count("abcdefghijk", 10), 2);
        assert_eq!(wrapped_line_count("abc", 0), 0);
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[F2] Language", "[F3] Symbols", "[Esc] Quit"], 30);
        assert_eq!(lines, vec![" [F2] Language  [F3] Symbols", " [Esc] Quit"]);
    }
}
