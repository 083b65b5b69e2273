use thiserror::Error;

/// A rejected keyboard transition. State is never changed when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyboardError {
    #[error("unsupported language: {0:?} (available: english, urdu)")]
    UnsupportedLanguage(String),
    #[error("unsupported mode: {0:?} (available: lowercase, uppercase, symbols)")]
    UnsupportedMode(String),
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write clipboard sequence: {0}")]
    Io(#[from] std::io::Error),
    #[error("nothing to copy")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_error_messages_name_the_code() {
        let err = KeyboardError::UnsupportedLanguage("klingon".to_string());
        assert!(err.to_string().contains("\"klingon\""));
        let err = KeyboardError::UnsupportedMode("italic".to_string());
        assert!(err.to_string().contains("symbols"));
    }
}
