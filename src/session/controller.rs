use crate::keyboard::display::{ControlKey, SpecialKey};
use crate::keyboard::events::{KeyboardEvent, SubscriptionId, Subscribers};
use crate::keyboard::layout::{Language, Layout, Mode};
use crate::keyboard::state::KeyboardState;
use crate::session::status::StatusMessage;
use crate::store::preference::LanguagePreference;
use crate::text::buffer::TextBuffer;
use crate::text::clipboard::Clipboard;

/// Everything one keyboard session needs, owned in one place: the state
/// machine, the text being edited, the language preference and the
/// clipboard. The UI drives it through these methods and learns about
/// changes through `on_change` and `on_status`.
pub struct KeyboardSession {
    state: KeyboardState,
    buffer: TextBuffer,
    preference: LanguagePreference,
    clipboard: Clipboard,
    changes: Subscribers<KeyboardEvent>,
    statuses: Subscribers<StatusMessage>,
}

impl KeyboardSession {
    /// Starts in the saved language, or the preference default.
    pub fn new(preference: LanguagePreference, clipboard: Clipboard) -> Self {
        let language = preference.load();
        tracing::info!(%language, "keyboard session started");
        Self {
            state: KeyboardState::with_language(language),
            buffer: TextBuffer::new(),
            preference,
            clipboard,
            changes: Subscribers::new(),
            statuses: Subscribers::new(),
        }
    }

    pub fn on_change<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&KeyboardEvent) + 'static,
    {
        self.changes.subscribe(handler)
    }

    pub fn on_status<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&StatusMessage) + 'static,
    {
        self.statuses.subscribe(handler)
    }

    pub fn unsubscribe_change(&mut self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }

    pub fn unsubscribe_status(&mut self, id: SubscriptionId) -> bool {
        self.statuses.unsubscribe(id)
    }

    fn notify(&mut self, event: KeyboardEvent) {
        self.changes.emit(&event);
    }

    fn report(&mut self, message: StatusMessage) {
        self.statuses.emit(&message);
    }

    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn layout(&self) -> Layout {
        self.state.current_layout()
    }

    pub fn active_language(&self) -> Language {
        self.state.language()
    }

    pub fn active_mode(&self) -> Mode {
        self.state.mode()
    }

    /// Returns false, with no state change, for unsupported codes.
    pub fn switch_language(&mut self, code: &str) -> bool {
        match self.state.switch_language_code(code) {
            Ok(event) => {
                self.language_switched(event);
                true
            }
            Err(err) => {
                self.report(StatusMessage::error(err.to_string()));
                false
            }
        }
    }

    pub fn select_language(&mut self, language: Language) {
        let event = self.state.switch_language(language);
        self.language_switched(event);
    }

    /// A successful change is persisted as the language preference.
    fn language_switched(&mut self, event: Option<KeyboardEvent>) {
        if let Some(event) = event {
            if !self.preference.save(self.state.language()) {
                self.report(StatusMessage::warning("Language preference not saved"));
            }
            self.notify(event);
        }
    }

    /// Returns false, with no state change, for unsupported codes.
    pub fn switch_mode(&mut self, code: &str) -> bool {
        let had_invert = self.state.case_invert();
        match self.state.switch_mode_code(code) {
            Ok(event) => {
                self.mode_switched(had_invert, event);
                true
            }
            Err(err) => {
                self.report(StatusMessage::error(err.to_string()));
                false
            }
        }
    }

    pub fn select_mode(&mut self, mode: Mode) {
        let had_invert = self.state.case_invert();
        let event = self.state.switch_mode(mode);
        self.mode_switched(had_invert, event);
    }

    fn mode_switched(&mut self, had_invert: bool, event: Option<KeyboardEvent>) {
        if let Some(event) = event {
            self.notify(event);
            if had_invert && !self.state.case_invert() {
                self.notify(KeyboardEvent::CaseInvertChanged(false));
            }
        }
    }

    pub fn toggle_symbols(&mut self) {
        let had_invert = self.state.case_invert();
        let event = self.state.toggle_symbols();
        self.mode_switched(had_invert, Some(event));
    }

    /// Returns whether a case invert is pending afterwards.
    pub fn toggle_one_shot_case_invert(&mut self) -> bool {
        if let Some(event) = self.state.toggle_one_shot_case_invert() {
            self.notify(event);
        }
        self.state.case_invert()
    }

    pub fn consume_one_shot_case_invert(&mut self, glyph: &str) -> String {
        let had_invert = self.state.case_invert();
        let output = self.state.consume_one_shot_case_invert(glyph);
        if had_invert && !self.state.case_invert() {
            self.notify(KeyboardEvent::CaseInvertChanged(false));
        }
        output
    }

    /// Insert `glyph` as-is, replacing any selection.
    pub fn insert_character(&mut self, glyph: &str) {
        self.buffer.insert(glyph);
        self.notify(KeyboardEvent::TextChanged {
            length: self.buffer.len(),
        });
    }

    /// A click on a grid key: apply a pending case invert, then insert.
    pub fn press_key(&mut self, glyph: &str) {
        let text = self.consume_one_shot_case_invert(glyph);
        self.insert_character(&text);
    }

    pub fn press_special(&mut self, key: SpecialKey) {
        match key.text() {
            Some(text) => self.insert_character(text),
            None => {
                self.delete_backward();
            }
        }
    }

    pub fn delete_backward(&mut self) -> bool {
        let changed = self.buffer.delete_backward();
        if changed {
            self.notify(KeyboardEvent::TextChanged {
                length: self.buffer.len(),
            });
        }
        changed
    }

    pub fn clear_text(&mut self) {
        self.buffer.clear();
        self.notify(KeyboardEvent::TextChanged { length: 0 });
        self.report(StatusMessage::info("Text cleared"));
    }

    pub fn copy_to_clipboard(&mut self) -> bool {
        if self.buffer.is_empty() {
            self.report(StatusMessage::info("Nothing to copy"));
            return false;
        }
        let copied = self.buffer.copy_to_clipboard(&mut self.clipboard);
        if copied {
            self.report(StatusMessage::success("Copied to clipboard!"));
        } else {
            self.report(StatusMessage::error("Could not copy to clipboard"));
        }
        copied
    }

    pub fn text(&self) -> &str {
        self.buffer.read()
    }

    pub fn text_length(&self) -> usize {
        self.buffer.len()
    }

    /// Replace the whole text, e.g. when restoring a previous session.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.write(text);
        self.notify(KeyboardEvent::TextChanged {
            length: self.buffer.len(),
        });
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.buffer.set_cursor(pos);
    }

    pub fn select(&mut self, start: usize, end: usize) {
        self.buffer.select(start, end);
    }

    /// Back to english/lowercase. The saved preference is left alone.
    pub fn reset(&mut self) {
        let event = self.state.reset();
        self.notify(event);
    }

    pub fn clear_language_preference(&mut self) -> bool {
        let cleared = self.preference.clear();
        if cleared {
            self.report(StatusMessage::info("Language preference cleared"));
        } else {
            self.report(StatusMessage::warning("Language preference not cleared"));
        }
        cleared
    }

    /// Run the action behind a control-row button.
    pub fn activate(&mut self, control: ControlKey) {
        match control {
            ControlKey::Language(language) => self.select_language(language),
            ControlKey::Mode(mode) => self.select_mode(mode),
            ControlKey::SymbolsToggle => self.toggle_symbols(),
            ControlKey::Caps => {
                if !self.toggle_one_shot_case_invert() && self.state.is_symbol_mode() {
                    self.report(StatusMessage::info("Caps has no effect on symbols"));
                }
            }
            ControlKey::Special(key) => self.press_special(key),
            ControlKey::Copy => {
                self.copy_to_clipboard();
            }
            ControlKey::Clear => self.clear_text(),
        }
    }
}
