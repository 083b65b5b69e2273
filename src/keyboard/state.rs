use std::borrow::Cow;

use serde::Serialize;

use crate::error::KeyboardError;
use crate::keyboard::events::KeyboardEvent;
use crate::keyboard::layout::{Language, Layout, LayoutTable, Mode};

/// Active language, mode and the pending one-shot case invert ("Caps").
///
/// Transitions return the event they caused, or `None` when the call left
/// the state as it was. Callers forward events to their subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardState {
    language: Language,
    mode: Mode,
    /// Last lowercase/uppercase mode, restored when leaving symbols.
    letter_mode: Mode,
    case_invert: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutMetadata {
    pub languages: Vec<Language>,
    pub modes: Vec<Mode>,
    pub current_language: Language,
    pub current_mode: Mode,
    pub is_symbol_mode: bool,
    pub is_uppercase_mode: bool,
    pub case_invert: bool,
    pub current_layout_size: usize,
}

#[derive(Serialize)]
struct LayoutExport {
    language: Language,
    mode: Mode,
    layout: Layout,
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::with_language(LayoutTable::DEFAULT_LANGUAGE)
    }
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: Language) -> Self {
        Self {
            language,
            mode: LayoutTable::DEFAULT_MODE,
            letter_mode: LayoutTable::DEFAULT_MODE,
            case_invert: false,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn letter_mode(&self) -> Mode {
        self.letter_mode
    }

    pub fn case_invert(&self) -> bool {
        self.case_invert
    }

    pub fn is_symbol_mode(&self) -> bool {
        self.mode == Mode::Symbols
    }

    pub fn is_uppercase_mode(&self) -> bool {
        self.mode == Mode::Uppercase
    }

    /// Independent of the case invert flag.
    pub fn current_layout(&self) -> Layout {
        LayoutTable::layout(self.language, self.mode)
    }

    pub fn flatten(&self) -> Vec<&'static str> {
        self.current_layout().flatten()
    }

    pub fn character_at(&self, flat_index: usize) -> Option<&'static str> {
        self.current_layout().character_at(flat_index)
    }

    pub fn position_of(&self, glyph: &str) -> Option<(usize, usize)> {
        self.current_layout().position_of(glyph)
    }

    /// Mode is kept; in symbols mode the shared symbols layout stays visible.
    pub fn switch_language(&mut self, language: Language) -> Option<KeyboardEvent> {
        if self.language == language {
            return None;
        }
        let from = self.language;
        self.language = language;
        tracing::debug!(%from, to = %language, "language switched");
        Some(KeyboardEvent::LanguageChanged { from, to: language })
    }

    pub fn switch_language_code(
        &mut self,
        code: &str,
    ) -> Result<Option<KeyboardEvent>, KeyboardError> {
        match code.parse::<Language>() {
            Ok(language) => Ok(self.switch_language(language)),
            Err(err) => {
                tracing::warn!(code, "rejected language switch: {err}");
                Err(err)
            }
        }
    }

    pub fn switch_mode(&mut self, mode: Mode) -> Option<KeyboardEvent> {
        if self.mode == mode {
            return None;
        }
        let from = self.mode;
        if mode.is_letter_case() {
            self.letter_mode = mode;
        } else {
            // Case has no meaning for symbols.
            self.case_invert = false;
        }
        self.mode = mode;
        tracing::debug!(%from, to = %mode, "mode switched");
        Some(KeyboardEvent::ModeChanged { from, to: mode })
    }

    pub fn switch_mode_code(&mut self, code: &str) -> Result<Option<KeyboardEvent>, KeyboardError> {
        match code.parse::<Mode>() {
            Ok(mode) => Ok(self.switch_mode(mode)),
            Err(err) => {
                tracing::warn!(code, "rejected mode switch: {err}");
                Err(err)
            }
        }
    }

    /// Enter symbols, or leave it back to the remembered letter mode.
    pub fn toggle_symbols(&mut self) -> KeyboardEvent {
        let target = if self.is_symbol_mode() {
            self.letter_mode
        } else {
            Mode::Symbols
        };
        let from = self.mode;
        self.switch_mode(target)
            .unwrap_or(KeyboardEvent::ModeChanged { from, to: target })
    }

    pub fn toggle_one_shot_case_invert(&mut self) -> Option<KeyboardEvent> {
        if self.is_symbol_mode() || self.case_invert {
            return None;
        }
        self.case_invert = true;
        Some(KeyboardEvent::CaseInvertChanged(true))
    }

    /// Apply a pending case invert to `glyph`. Only single cased letters
    /// consume it; anything else passes through and leaves it pending.
    pub fn consume_one_shot_case_invert(&mut self, glyph: &str) -> String {
        if !self.case_invert {
            return glyph.to_string();
        }
        match self.inverted(glyph) {
            Some(inverted) => {
                self.case_invert = false;
                inverted
            }
            None => glyph.to_string(),
        }
    }

    /// Glyph drawn on a key: the table glyph, or its inverted form while a
    /// case invert is pending.
    pub fn key_face<'a>(&self, glyph: &'a str) -> Cow<'a, str> {
        if self.case_invert
            && let Some(inverted) = self.inverted(glyph)
        {
            return Cow::Owned(inverted);
        }
        Cow::Borrowed(glyph)
    }

    fn inverted(&self, glyph: &str) -> Option<String> {
        let mut chars = glyph.chars();
        let ch = chars.next()?;
        if chars.next().is_some() || !is_cased_letter(ch) {
            return None;
        }
        // Inversion is relative to the active mode, not to the glyph.
        match self.mode {
            Mode::Lowercase => Some(ch.to_uppercase().collect()),
            Mode::Uppercase => Some(ch.to_lowercase().collect()),
            Mode::Symbols => None,
        }
    }

    pub fn reset(&mut self) -> KeyboardEvent {
        *self = Self::default();
        KeyboardEvent::Reset
    }

    pub fn metadata(&self) -> LayoutMetadata {
        LayoutMetadata {
            languages: LayoutTable::languages().to_vec(),
            modes: LayoutTable::modes().to_vec(),
            current_language: self.language,
            current_mode: self.mode,
            is_symbol_mode: self.is_symbol_mode(),
            is_uppercase_mode: self.is_uppercase_mode(),
            case_invert: self.case_invert,
            current_layout_size: self.current_layout().len(),
        }
    }

    pub fn export_layout(&self) -> serde_json::Result<String> {
        serde_json::to_string(&LayoutExport {
            language: self.language,
            mode: self.mode,
            layout: self.current_layout(),
        })
    }
}

fn is_cased_letter(ch: char) -> bool {
    ch.is_alphabetic() && (ch.is_lowercase() || ch.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = KeyboardState::new();
        assert_eq!(state.language(), Language::English);
        assert_eq!(state.mode(), Mode::Lowercase);
        assert!(!state.case_invert());
        assert_eq!(state.current_layout().character_at(0), Some("q"));
    }

    #[test]
    fn test_one_shot_invert_applies_once() {
        let mut state = KeyboardState::new();
        assert_eq!(
            state.toggle_one_shot_case_invert(),
            Some(KeyboardEvent::CaseInvertChanged(true))
        );
        assert_eq!(state.consume_one_shot_case_invert("q"), "Q");
        assert!(!state.case_invert());
        assert_eq!(state.consume_one_shot_case_invert("w"), "w");
    }

    #[test]
    fn test_one_shot_invert_in_uppercase_lowers() {
        let mut state = KeyboardState::new();
        state.switch_mode(Mode::Uppercase);
        state.toggle_one_shot_case_invert();
        assert_eq!(state.consume_one_shot_case_invert("Q"), "q");
        assert_eq!(state.consume_one_shot_case_invert("W"), "W");
    }

    #[test]
    fn test_one_shot_invert_is_relative_to_mode_not_glyph() {
        let mut state = KeyboardState::new();
        state.toggle_one_shot_case_invert();
        // Lowercase mode inverts to uppercase even for an uppercase glyph.
        assert_eq!(state.consume_one_shot_case_invert("A"), "A");
        assert!(!state.case_invert());
    }

    #[test]
    fn test_non_letters_leave_invert_pending() {
        let mut state = KeyboardState::new();
        state.toggle_one_shot_case_invert();
        assert_eq!(state.consume_one_shot_case_invert("1"), "1");
        assert_eq!(state.consume_one_shot_case_invert("ب"), "ب");
        assert_eq!(state.consume_one_shot_case_invert("لا"), "لا");
        assert!(state.case_invert());
        assert_eq!(state.consume_one_shot_case_invert("e"), "E");
    }

    #[test]
    fn test_toggle_invert_twice_stays_on() {
        let mut state = KeyboardState::new();
        state.toggle_one_shot_case_invert();
        assert_eq!(state.toggle_one_shot_case_invert(), None);
        assert!(state.case_invert());
    }

    #[test]
    fn test_toggle_invert_ignored_in_symbols() {
        let mut state = KeyboardState::new();
        state.switch_mode(Mode::Symbols);
        assert_eq!(state.toggle_one_shot_case_invert(), None);
        assert!(!state.case_invert());
    }

    #[test]
    fn test_entering_symbols_clears_pending_invert() {
        let mut state = KeyboardState::new();
        state.toggle_one_shot_case_invert();
        state.switch_mode(Mode::Symbols);
        assert!(!state.case_invert());
    }

    #[test]
    fn test_invalid_codes_leave_state_unchanged() {
        let mut state = KeyboardState::new();
        state.switch_mode(Mode::Uppercase);
        state.toggle_one_shot_case_invert();
        let before = state.clone();

        assert_eq!(
            state.switch_language_code("french"),
            Err(KeyboardError::UnsupportedLanguage("french".to_string()))
        );
        assert!(state.switch_language_code("symbols").is_err());
        assert_eq!(
            state.switch_mode_code("bold"),
            Err(KeyboardError::UnsupportedMode("bold".to_string()))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_switch_mode_symbols_is_idempotent() {
        let mut once = KeyboardState::new();
        once.switch_mode(Mode::Symbols);

        let mut twice = KeyboardState::new();
        twice.switch_mode(Mode::Symbols);
        assert_eq!(twice.switch_mode(Mode::Symbols), None);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_language_switch_in_symbols_keeps_symbols_layout() {
        let mut state = KeyboardState::new();
        state.switch_mode(Mode::Symbols);
        let symbols = state.current_layout();

        let event = state.switch_language(Language::Urdu);
        assert_eq!(
            event,
            Some(KeyboardEvent::LanguageChanged {
                from: Language::English,
                to: Language::Urdu
            })
        );
        assert_eq!(state.mode(), Mode::Symbols);
        assert_eq!(state.current_layout(), symbols);

        state.toggle_symbols();
        assert_eq!(
            state.current_layout(),
            LayoutTable::layout(Language::Urdu, Mode::Lowercase)
        );
    }

    #[test]
    fn test_language_switch_preserves_mode_and_invert() {
        let mut state = KeyboardState::new();
        state.switch_mode(Mode::Uppercase);
        state.toggle_one_shot_case_invert();
        state.switch_language_code("urdu").unwrap();
        assert_eq!(state.mode(), Mode::Uppercase);
        assert!(state.case_invert());
        assert_eq!(state.switch_language(Language::Urdu), None);
    }

    #[test]
    fn test_toggle_symbols_restores_letter_mode() {
        let mut state = KeyboardState::new();
        state.switch_mode(Mode::Uppercase);
        state.toggle_symbols();
        assert_eq!(state.mode(), Mode::Symbols);
        assert_eq!(state.letter_mode(), Mode::Uppercase);

        let event = state.toggle_symbols();
        assert_eq!(
            event,
            KeyboardEvent::ModeChanged {
                from: Mode::Symbols,
                to: Mode::Uppercase
            }
        );
        assert_eq!(state.mode(), Mode::Uppercase);
    }

    #[test]
    fn test_explicit_mode_overrides_remembered_case() {
        let mut state = KeyboardState::new();
        state.switch_mode(Mode::Uppercase);
        state.switch_mode(Mode::Symbols);
        state.switch_mode(Mode::Lowercase);
        assert_eq!(state.mode(), Mode::Lowercase);
        assert_eq!(state.letter_mode(), Mode::Lowercase);
    }

    #[test]
    fn test_current_layout_ignores_invert() {
        let mut state = KeyboardState::new();
        let before = state.current_layout();
        state.toggle_one_shot_case_invert();
        assert_eq!(state.current_layout(), before);
        assert_eq!(state.key_face("q"), "Q");
        assert_eq!(state.key_face(";"), ";");
    }

    #[test]
    fn test_position_queries_use_active_layout() {
        let mut state = KeyboardState::new();
        assert_eq!(state.position_of("a"), Some((1, 0)));
        state.switch_mode(Mode::Symbols);
        assert_eq!(state.position_of("a"), None);
        assert_eq!(state.position_of("@"), Some((1, 1)));
        assert_eq!(state.character_at(0), Some("1"));
        assert_eq!(state.flatten().len(), 50);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = KeyboardState::with_language(Language::Urdu);
        state.switch_mode(Mode::Symbols);
        assert_eq!(state.reset(), KeyboardEvent::Reset);
        assert_eq!(state, KeyboardState::new());
    }

    #[test]
    fn test_metadata_and_export() {
        let mut state = KeyboardState::new();
        state.switch_mode(Mode::Uppercase);
        let meta = state.metadata();
        assert_eq!(meta.languages.len(), 2);
        assert_eq!(meta.modes.len(), 3);
        assert!(meta.is_uppercase_mode);
        assert_eq!(meta.current_layout_size, 26);

        let json: serde_json::Value = serde_json::from_str(&state.export_layout().unwrap()).unwrap();
        assert_eq!(json["language"], "english");
        assert_eq!(json["mode"], "uppercase");
        assert_eq!(json["layout"][0][0], "Q");
    }
}
