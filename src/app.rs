use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::widgets::Block;

use crate::config::Config;
use crate::keyboard::display::{CONTROL_ROW, ControlKey, glyph_display_name};
use crate::keyboard::layout::Language;
use crate::session::controller::KeyboardSession;
use crate::session::status::{StatusLine, StatusMessage};
use crate::store::json_store::{JsonStore, MemoryStore, PreferenceStore};
use crate::store::preference::LanguagePreference;
use crate::text::clipboard::Clipboard;
use crate::ui::components::control_bar::{control_at, control_lines};
use crate::ui::components::keyboard_grid::{grid_inner, key_at};
use crate::ui::layout::AppLayout;
use crate::ui::theme::Theme;

/// Which on-screen key the arrow keys have selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Key { row: usize, col: usize },
    Control(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusMove {
    Up,
    Down,
    Left,
    Right,
}

pub struct App {
    pub session: KeyboardSession,
    pub config: Config,
    pub theme: &'static Theme,
    pub focus: Focus,
    pub status: StatusLine,
    pub should_quit: bool,
    /// Terminal area of the last draw, for mouse hit-testing.
    pub viewport: Rect,
    inbox: Rc<RefCell<Vec<StatusMessage>>>,
    layout_changed: Rc<Cell<bool>>,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, mut session: KeyboardSession) -> Self {
        let inbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&inbox);
        session.on_status(move |message: &StatusMessage| sink.borrow_mut().push(message.clone()));

        let layout_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&layout_changed);
        session.on_change(move |event| {
            tracing::debug!(?event, "keyboard changed");
            if event.affects_layout() {
                flag.set(true);
            }
        });

        Self {
            session,
            status: StatusLine::new(config.status_duration()),
            config,
            theme,
            focus: Focus::Key { row: 0, col: 0 },
            should_quit: false,
            viewport: Rect::default(),
            inbox,
            layout_changed,
        }
    }

    /// Session backed by the preference file under the configured data dir
    /// and the system clipboard.
    pub fn from_config(config: Config, theme: &'static Theme) -> Self {
        let session = KeyboardSession::new(Self::language_preference(&config), Clipboard::system());
        Self::new(config, theme, session)
    }

    /// The preference file under the configured data dir, or an in-memory
    /// store when that directory cannot be created.
    pub fn language_preference(config: &Config) -> LanguagePreference {
        let store: Box<dyn PreferenceStore> = match JsonStore::with_base_dir(config.data_dir()) {
            Ok(store) => Box::new(store),
            Err(err) => {
                tracing::warn!("preferences unavailable, not persisting: {err:#}");
                Box::new(MemoryStore::new())
            }
        };
        LanguagePreference::new(store, config.language())
    }

    pub fn layout(&self) -> AppLayout {
        let rows = self.session.layout().row_count() as u16;
        let symbols = self.session.state().is_symbol_mode();
        let lines = control_lines(self.viewport.width.saturating_sub(2), symbols);
        AppLayout::new(self.viewport, rows, lines)
    }

    /// Pick up status messages and layout changes the session reported
    /// since the last call.
    pub fn sync(&mut self, now: Instant) {
        for message in self.inbox.borrow_mut().drain(..) {
            self.status.show(message, now);
        }
        if self.layout_changed.replace(false) {
            self.clamp_focus();
        }
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.status.tick(now)
    }

    fn row_len(&self, row: usize) -> usize {
        self.session.layout().rows().get(row).map_or(0, |cells| cells.len())
    }

    fn clamp_focus(&mut self) {
        if let Focus::Key { row, col } = self.focus {
            let rows = self.session.layout().row_count();
            let row = row.min(rows.saturating_sub(1));
            let col = col.min(self.row_len(row).saturating_sub(1));
            self.focus = Focus::Key { row, col };
        }
    }

    pub fn move_focus(&mut self, direction: FocusMove) {
        let rows = self.session.layout().row_count();
        let controls = CONTROL_ROW.len();
        self.focus = match (self.focus, direction) {
            (Focus::Key { row, col }, FocusMove::Left) => {
                let len = self.row_len(row);
                Focus::Key {
                    row,
                    col: (col + len - 1) % len,
                }
            }
            (Focus::Key { row, col }, FocusMove::Right) => Focus::Key {
                row,
                col: (col + 1) % self.row_len(row),
            },
            (Focus::Key { row, col }, FocusMove::Up) if row > 0 => Focus::Key {
                row: row - 1,
                col: col.min(self.row_len(row - 1) - 1),
            },
            (Focus::Key { row, col }, FocusMove::Down) if row + 1 < rows => Focus::Key {
                row: row + 1,
                col: col.min(self.row_len(row + 1) - 1),
            },
            (Focus::Key { row, col }, FocusMove::Down) => {
                Focus::Control((col * controls / self.row_len(row)).min(controls - 1))
            }
            (Focus::Control(idx), FocusMove::Left) => Focus::Control((idx + controls - 1) % controls),
            (Focus::Control(idx), FocusMove::Right) => Focus::Control((idx + 1) % controls),
            (Focus::Control(idx), FocusMove::Up) => {
                let row = rows - 1;
                let len = self.row_len(row);
                Focus::Key {
                    row,
                    col: (idx * len / controls).min(len - 1),
                }
            }
            (focus, _) => focus,
        };
    }

    pub fn activate_focused(&mut self) {
        match self.focus {
            Focus::Key { row, col } => self.press_grid_key(row, col),
            Focus::Control(idx) => {
                if let Some(&control) = CONTROL_ROW.get(idx) {
                    self.session.activate(control);
                }
            }
        }
    }

    fn press_grid_key(&mut self, row: usize, col: usize) {
        if let Some(glyph) = self.session.layout().get(row, col) {
            tracing::debug!(glyph, name = glyph_display_name(glyph), "key pressed");
            self.session.press_key(glyph);
        }
    }

    /// Activate whatever key is drawn at (x, y). Returns false for clicks
    /// that miss every key.
    pub fn click(&mut self, x: u16, y: u16) -> bool {
        let layout = self.layout();
        if let Some((row, col)) = key_at(grid_inner(layout.keyboard), self.session.layout(), x, y) {
            self.focus = Focus::Key { row, col };
            self.press_grid_key(row, col);
            return true;
        }

        let symbols = self.session.state().is_symbol_mode();
        let controls = Block::bordered().inner(layout.controls);
        if let Some(idx) = control_at(controls, symbols, x, y) {
            self.focus = Focus::Control(idx);
            self.session.activate(CONTROL_ROW[idx]);
            return true;
        }
        false
    }

    /// Cycle to the next supported language.
    pub fn next_language(&mut self) {
        let current = self.session.active_language();
        let idx = Language::ALL.iter().position(|&l| l == current).unwrap_or(0);
        let next = Language::ALL[(idx + 1) % Language::ALL.len()];
        self.session.activate(ControlKey::Language(next));
    }
}
