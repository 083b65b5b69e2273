use crate::keyboard::layout::{Language, Mode};

/// Emitted after a state change so observers (renderer, persistence) can
/// react without the state machine knowing about them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyboardEvent {
    LanguageChanged { from: Language, to: Language },
    ModeChanged { from: Mode, to: Mode },
    CaseInvertChanged(bool),
    TextChanged { length: usize },
    Reset,
}

impl KeyboardEvent {
    /// True when the key grid has to be redrawn with a different layout or
    /// different key faces.
    pub fn affects_layout(&self) -> bool {
        !matches!(self, KeyboardEvent::TextChanged { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Handler<E> = Box<dyn FnMut(&E)>;

pub struct Subscribers<E> {
    next_id: usize,
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    /// Handlers run in subscription order.
    pub fn emit(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_subscribers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subs: Subscribers<KeyboardEvent> = Subscribers::new();

        let first = Rc::clone(&seen);
        subs.subscribe(move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&seen);
        subs.subscribe(move |_| second.borrow_mut().push("second"));

        subs.emit(&KeyboardEvent::Reset);
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut subs: Subscribers<KeyboardEvent> = Subscribers::new();
        let counter = Rc::clone(&count);
        let id = subs.subscribe(move |_| *counter.borrow_mut() += 1);

        subs.emit(&KeyboardEvent::CaseInvertChanged(true));
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.emit(&KeyboardEvent::CaseInvertChanged(false));

        assert_eq!(*count.borrow(), 1);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_text_changes_do_not_affect_layout() {
        assert!(!KeyboardEvent::TextChanged { length: 3 }.affects_layout());
        assert!(
            KeyboardEvent::ModeChanged {
                from: Mode::Lowercase,
                to: Mode::Symbols
            }
            .affects_layout()
        );
    }
}
