// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cursor and direction change notifications.
//!
//! Listeners are shared handles (`Rc<dyn CursorObserver>` or
//! `Rc<dyn DirectionObserver>`). Identity is the handle's allocation, so
//! registering a clone of an already registered `Rc` is rejected while two
//! separately allocated closures with identical bodies are distinct.

use crate::error::{ObserverKind, PlaybackError, Result};
use crate::timeline::{Direction, Duration};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives every reconciled or skipped cursor value
pub trait CursorObserver {
    /// Called with the new cursor position
    fn on_cursor_changed(&self, cursor: Duration);
}

/// Receives every actual change of playback direction
pub trait DirectionObserver {
    /// Called with the new direction
    fn on_direction_changed(&self, direction: Direction);
}

impl<F: Fn(Duration)> CursorObserver for F {
    fn on_cursor_changed(&self, cursor: Duration) {
        self(cursor);
    }
}

impl<F: Fn(Direction)> DirectionObserver for F {
    fn on_direction_changed(&self, direction: Direction) {
        self(direction);
    }
}

/// Identity of a registered listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ObserverKey(usize);

impl ObserverKey {
    fn of<L: ?Sized>(listener: &Rc<L>) -> Self {
        Self(Rc::as_ptr(listener).cast::<()>() as usize)
    }
}

/// One insertion-ordered set of listeners
struct Listeners<L: ?Sized> {
    kind: ObserverKind,
    entries: RefCell<IndexMap<ObserverKey, Rc<L>>>,
}

impl<L: ?Sized> Listeners<L> {
    fn new(kind: ObserverKind) -> Self {
        Self {
            kind,
            entries: RefCell::new(IndexMap::new()),
        }
    }

    fn register(&self, listener: Rc<L>) -> Result<()> {
        let key = ObserverKey::of(&listener);
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(&key) {
            return Err(PlaybackError::DuplicateRegistration(self.kind));
        }
        entries.insert(key, listener);
        Ok(())
    }

    fn unregister(&self, listener: &Rc<L>) -> bool {
        self.entries
            .borrow_mut()
            .shift_remove(&ObserverKey::of(listener))
            .is_some()
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Listeners at the start of a dispatch pass.
    ///
    /// The borrow is released before any listener runs, so listeners may
    /// register or unregister without affecting the pass in progress.
    fn snapshot(&self) -> Vec<Rc<L>> {
        self.entries.borrow().values().cloned().collect()
    }
}

/// Fan-out of cursor and direction changes to registered listeners
pub struct NotificationDispatcher {
    cursor: Listeners<dyn CursorObserver>,
    direction: Listeners<dyn DirectionObserver>,
}

impl NotificationDispatcher {
    /// Create a dispatcher with no listeners
    pub fn new() -> Self {
        Self {
            cursor: Listeners::new(ObserverKind::Cursor),
            direction: Listeners::new(ObserverKind::Direction),
        }
    }

    /// Add a cursor listener
    ///
    /// Fails with [`PlaybackError::DuplicateRegistration`] if this handle is
    /// already registered for cursor notifications.
    pub fn register_cursor_observer(&self, observer: Rc<dyn CursorObserver>) -> Result<()> {
        self.cursor.register(observer)
    }

    /// Add a direction listener
    ///
    /// Fails with [`PlaybackError::DuplicateRegistration`] if this handle is
    /// already registered for direction notifications.
    pub fn register_direction_observer(&self, observer: Rc<dyn DirectionObserver>) -> Result<()> {
        self.direction.register(observer)
    }

    /// Remove a cursor listener, returning whether it was registered
    pub fn unregister_cursor_observer(&self, observer: &Rc<dyn CursorObserver>) -> bool {
        self.cursor.unregister(observer)
    }

    /// Remove a direction listener, returning whether it was registered
    pub fn unregister_direction_observer(&self, observer: &Rc<dyn DirectionObserver>) -> bool {
        self.direction.unregister(observer)
    }

    /// Number of cursor listeners
    pub fn cursor_observer_count(&self) -> usize {
        self.cursor.len()
    }

    /// Number of direction listeners
    pub fn direction_observer_count(&self) -> usize {
        self.direction.len()
    }

    /// Invoke every cursor listener in registration order
    pub fn notify_cursor_changed(&self, cursor: Duration) {
        for observer in self.cursor.snapshot() {
            observer.on_cursor_changed(cursor);
        }
    }

    /// Invoke every direction listener in registration order
    pub fn notify_direction_changed(&self, direction: Direction) {
        for observer in self.direction.snapshot() {
            observer.on_direction_changed(direction);
        }
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: 'static>() -> (Rc<RefCell<Vec<T>>>, Rc<RefCell<Vec<T>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (log.clone(), log)
    }

    #[test]
    fn test_duplicate_registration() {
        let dispatcher = NotificationDispatcher::new();
        let (log, sink) = recorder();
        let observer: Rc<dyn CursorObserver> = Rc::new(move |c: Duration| sink.borrow_mut().push(c));

        dispatcher.register_cursor_observer(observer.clone()).unwrap();
        let err = dispatcher.register_cursor_observer(observer).unwrap_err();
        assert_eq!(err, PlaybackError::DuplicateRegistration(ObserverKind::Cursor));

        dispatcher.notify_cursor_changed(4.0);
        assert_eq!(*log.borrow(), vec![4.0]);
    }

    #[test]
    fn test_sets_are_independent() {
        let dispatcher = NotificationDispatcher::new();
        let cursor_obs: Rc<dyn CursorObserver> = Rc::new(|_: Duration| {});
        let direction_obs: Rc<dyn DirectionObserver> = Rc::new(|_: Direction| {});

        dispatcher.register_cursor_observer(cursor_obs).unwrap();
        dispatcher.register_direction_observer(direction_obs.clone()).unwrap();
        assert_eq!(dispatcher.cursor_observer_count(), 1);
        assert_eq!(dispatcher.direction_observer_count(), 1);

        let err = dispatcher.register_direction_observer(direction_obs).unwrap_err();
        assert_eq!(err, PlaybackError::DuplicateRegistration(ObserverKind::Direction));
    }

    #[test]
    fn test_registration_order() {
        let dispatcher = NotificationDispatcher::new();
        let (log, _) = recorder::<&'static str>();

        for name in ["a", "b", "c"] {
            let log = log.clone();
            dispatcher
                .register_direction_observer(Rc::new(move |_: Direction| log.borrow_mut().push(name)))
                .unwrap();
        }

        dispatcher.notify_direction_changed(Direction::Forwards);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unregister() {
        let dispatcher = NotificationDispatcher::new();
        let (log, sink) = recorder();
        let observer: Rc<dyn CursorObserver> = Rc::new(move |c: Duration| sink.borrow_mut().push(c));

        dispatcher.register_cursor_observer(observer.clone()).unwrap();
        assert!(dispatcher.unregister_cursor_observer(&observer));
        assert!(!dispatcher.unregister_cursor_observer(&observer));

        dispatcher.notify_cursor_changed(1.0);
        assert!(log.borrow().is_empty());

        // Can come back after removal
        dispatcher.register_cursor_observer(observer).unwrap();
        dispatcher.notify_cursor_changed(2.0);
        assert_eq!(*log.borrow(), vec![2.0]);
    }

    #[test]
    fn test_register_during_dispatch() {
        let dispatcher = Rc::new(NotificationDispatcher::new());
        let (log, _) = recorder::<&'static str>();

        let late_log = log.clone();
        let late: Rc<dyn CursorObserver> = Rc::new(move |_: Duration| late_log.borrow_mut().push("late"));

        let registering_dispatcher = Rc::downgrade(&dispatcher);
        let first_log = log.clone();
        dispatcher
            .register_cursor_observer(Rc::new(move |_: Duration| {
                first_log.borrow_mut().push("first");
                if let Some(d) = registering_dispatcher.upgrade() {
                    let _ = d.register_cursor_observer(late.clone());
                }
            }))
            .unwrap();

        dispatcher.notify_cursor_changed(0.0);
        assert_eq!(*log.borrow(), vec!["first"]);

        dispatcher.notify_cursor_changed(1.0);
        assert_eq!(*log.borrow(), vec!["first", "first", "late"]);
    }
}
