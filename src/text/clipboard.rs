use std::io::{self, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::ClipboardError;

pub trait ClipboardBackend {
    fn name(&self) -> &'static str;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard via arboard. Fails on headless sessions.
///
/// The handle is kept open after the first copy: on X11 the copied text
/// disappears once its owner is dropped.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        let result = match self.inner.as_mut() {
            Some(clipboard) => clipboard.set_text(text.to_string()),
            None => return Err(ClipboardError::Unavailable("not initialised".to_string())),
        };
        result.map_err(|e| {
            self.inner = None;
            ClipboardError::Unavailable(e.to_string())
        })
    }
}

/// Asks the terminal emulator to set the clipboard with an OSC 52 escape
/// sequence. Works over SSH, but nothing confirms the terminal honoured it.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClipboardBackend for Osc52Clipboard<W> {
    fn name(&self) -> &'static str {
        "osc52"
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let payload = STANDARD.encode(text.as_bytes());
        write!(self.out, "\x1b]52;c;{payload}\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Backends tried in order until one accepts the text.
pub struct Clipboard {
    backends: Vec<Box<dyn ClipboardBackend>>,
}

impl Clipboard {
    /// System clipboard first, terminal escape sequence as the fallback.
    pub fn system() -> Self {
        Self::with_backends(vec![
            Box::new(SystemClipboard::default()),
            Box::new(Osc52Clipboard::stdout()),
        ])
    }

    pub fn with_backends(backends: Vec<Box<dyn ClipboardBackend>>) -> Self {
        Self { backends }
    }

    pub fn copy(&mut self, text: &str) -> bool {
        if text.is_empty() {
            tracing::debug!("{}", ClipboardError::Empty);
            return false;
        }
        for backend in &mut self.backends {
            match backend.set_text(text) {
                Ok(()) => {
                    tracing::debug!(backend = backend.name(), chars = text.chars().count(), "copied");
                    return true;
                }
                Err(err) => {
                    tracing::warn!(backend = backend.name(), "clipboard backend failed: {err}");
                }
            }
        }
        false
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Records what it was given, or fails every time.
    pub struct FakeClipboard {
        pub name: &'static str,
        pub fail: bool,
        pub received: Rc<RefCell<Vec<String>>>,
    }

    impl FakeClipboard {
        pub fn new(name: &'static str, fail: bool) -> (Self, Rc<RefCell<Vec<String>>>) {
            let received = Rc::new(RefCell::new(Vec::new()));
            let fake = Self {
                name,
                fail,
                received: Rc::clone(&received),
            };
            (fake, received)
        }
    }

    impl ClipboardBackend for FakeClipboard {
        fn name(&self) -> &'static str {
            self.name
        }

        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable("no display".to_string()));
            }
            self.received.borrow_mut().push(text.to_string());
            Ok(())
        }
    }
}
