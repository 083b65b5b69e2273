use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, MouseEvent, MouseEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Resize,
}

/// Reads terminal input on a helper thread. A `Tick` is sent whenever no
/// input arrives within `tick_rate`, so status messages can expire.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                let next = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => Some(AppEvent::Key(key)),
                        // Moves and drags would flood the channel.
                        Ok(Event::Mouse(mouse))
                            if matches!(mouse.kind, MouseEventKind::Down(_)) =>
                        {
                            Some(AppEvent::Mouse(mouse))
                        }
                        Ok(Event::Resize(_, _)) => Some(AppEvent::Resize),
                        _ => None,
                    }
                } else {
                    Some(AppEvent::Tick)
                };

                if let Some(next) = next
                    && tx.send(next).is_err()
                {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
