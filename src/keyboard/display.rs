//! Labels shown on the keyboard outside of the character grid: mode and
//! language names, and the control row under the grid.

use crate::keyboard::layout::{Language, Mode};

/// Keys with a fixed action rather than a glyph from the layout table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialKey {
    Backspace,
    Enter,
    Space,
}

impl SpecialKey {
    /// Text inserted by the key, if it inserts anything.
    pub fn text(self) -> Option<&'static str> {
        match self {
            SpecialKey::Backspace => None,
            SpecialKey::Enter => Some("\n"),
            SpecialKey::Space => Some(" "),
        }
    }
}

/// One button of the control row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKey {
    Language(Language),
    Mode(Mode),
    /// Enter symbols or return to the remembered letter case.
    SymbolsToggle,
    Caps,
    Special(SpecialKey),
    Copy,
    Clear,
}

/// Left to right.
pub const CONTROL_ROW: &[ControlKey] = &[
    ControlKey::Language(Language::English),
    ControlKey::Language(Language::Urdu),
    ControlKey::Mode(Mode::Lowercase),
    ControlKey::Mode(Mode::Uppercase),
    ControlKey::SymbolsToggle,
    ControlKey::Caps,
    ControlKey::Special(SpecialKey::Space),
    ControlKey::Special(SpecialKey::Backspace),
    ControlKey::Special(SpecialKey::Enter),
    ControlKey::Copy,
    ControlKey::Clear,
];

pub fn control_label(key: ControlKey, symbols_active: bool) -> &'static str {
    match key {
        ControlKey::Language(language) => language_label(language),
        ControlKey::Mode(Mode::Lowercase) => "abc",
        ControlKey::Mode(Mode::Uppercase) => "ABC",
        ControlKey::Mode(Mode::Symbols) => "?123",
        ControlKey::SymbolsToggle if symbols_active => "ABC⇄",
        ControlKey::SymbolsToggle => "?123",
        ControlKey::Caps => "Caps",
        ControlKey::Special(special) => special_label(special),
        ControlKey::Copy => "Copy",
        ControlKey::Clear => "Clear",
    }
}

pub fn special_label(key: SpecialKey) -> &'static str {
    match key {
        SpecialKey::Backspace => "⌫",
        SpecialKey::Enter => "Enter",
        SpecialKey::Space => "Space",
    }
}

/// Language name written in that language.
pub fn language_label(language: Language) -> &'static str {
    match language {
        Language::English => "English",
        Language::Urdu => "اردو",
    }
}

pub fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Lowercase => "Lowercase Mode",
        Mode::Uppercase => "Uppercase Mode",
        Mode::Symbols => "Symbols & Numbers Mode",
    }
}

/// Visible stand-ins for whitespace when echoing inserted text in the
/// status line. Returns `""` for printable glyphs.
pub fn glyph_display_name(glyph: &str) -> &'static str {
    match glyph {
        " " => "Space",
        "\n" => "Enter",
        "\t" => "Tab",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_labels() {
        assert_eq!(mode_label(Mode::Lowercase), "Lowercase Mode");
        assert_eq!(mode_label(Mode::Uppercase), "Uppercase Mode");
        assert_eq!(mode_label(Mode::Symbols), "Symbols & Numbers Mode");
    }

    #[test]
    fn test_special_key_text() {
        assert_eq!(SpecialKey::Space.text(), Some(" "));
        assert_eq!(SpecialKey::Enter.text(), Some("\n"));
        assert_eq!(SpecialKey::Backspace.text(), None);
    }

    #[test]
    fn test_symbols_toggle_label_follows_mode() {
        assert_eq!(control_label(ControlKey::SymbolsToggle, false), "?123");
        assert_eq!(control_label(ControlKey::SymbolsToggle, true), "ABC⇄");
    }

    #[test]
    fn test_control_row_has_every_language() {
        for &language in Language::ALL {
            assert!(CONTROL_ROW.contains(&ControlKey::Language(language)));
        }
    }

    #[test]
    fn test_glyph_display_name() {
        assert_eq!(glyph_display_name(" "), "Space");
        assert_eq!(glyph_display_name("\n"), "Enter");
        assert_eq!(glyph_display_name("q"), "");
    }
}
