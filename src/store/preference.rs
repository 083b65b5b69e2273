use crate::keyboard::layout::Language;
use crate::store::json_store::PreferenceStore;

pub const PREFERENCE_KEY: &str = "keyboard_language";

/// The persisted keyboard language. Every operation is best effort: storage
/// problems are logged and never reach the caller as errors.
pub struct LanguagePreference {
    store: Box<dyn PreferenceStore>,
    default: Language,
}

impl LanguagePreference {
    pub fn new(store: Box<dyn PreferenceStore>, default: Language) -> Self {
        Self { store, default }
    }

    pub fn default_language(&self) -> Language {
        self.default
    }

    /// Saved language, or the default when nothing usable is stored.
    pub fn load(&self) -> Language {
        match self.store.get(PREFERENCE_KEY) {
            Ok(Some(code)) => code.parse::<Language>().unwrap_or_else(|err| {
                tracing::warn!("ignoring saved language preference: {err}");
                self.default
            }),
            Ok(None) => self.default,
            Err(err) => {
                tracing::warn!("failed to load language preference: {err:#}");
                self.default
            }
        }
    }

    pub fn save(&self, language: Language) -> bool {
        match self.store.set(PREFERENCE_KEY, language.code()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%language, "failed to save language preference: {err:#}");
                false
            }
        }
    }

    pub fn clear(&self) -> bool {
        match self.store.remove(PREFERENCE_KEY) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("failed to clear language preference: {err:#}");
                false
            }
        }
    }
}
