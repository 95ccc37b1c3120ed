//! Per-node listener registry
//!
//! Listeners are compared by identity (the shared callback allocation), so
//! a cloned [`Listener`] handle refers to the same registration.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{Event, EventType, NodeStore};

type Callback = dyn Fn(&mut NodeStore, &mut Event) -> anyhow::Result<()>;

/// Shared event callback handle
#[derive(Clone)]
pub struct Listener(Rc<Callback>);

impl Listener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut NodeStore, &mut Event) -> anyhow::Result<()> + 'static,
    {
        Self(Rc::new(callback))
    }

    pub(crate) fn call(&self, store: &mut NodeStore, event: &mut Event) -> anyhow::Result<()> {
        (self.0)(store, event)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Listener {}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({:p})", self.addr())
    }
}

#[derive(Debug, Clone)]
struct Registration {
    listener: Listener,
    capture: bool,
}

#[derive(Debug, Default)]
pub struct ListenerStore {
    by_type: HashMap<EventType, Vec<Registration>>,
}

impl ListenerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a registration; an identical (listener, capture) pair is a no-op.
    pub fn add(&mut self, event_type: EventType, listener: Listener, capture: bool) -> bool {
        let list = self.by_type.entry(event_type).or_default();
        if list.iter().any(|r| r.listener == listener && r.capture == capture) {
            return false;
        }
        list.push(Registration { listener, capture });
        true
    }

    /// Remove the first exact (listener, capture) match.
    pub fn remove(&mut self, event_type: &EventType, listener: &Listener, capture: bool) -> bool {
        let Some(list) = self.by_type.get_mut(event_type) else {
            return false;
        };
        let Some(pos) = list
            .iter()
            .position(|r| r.listener == *listener && r.capture == capture)
        else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.by_type.remove(event_type);
        }
        true
    }

    /// Copy of the current registrations, in registration order
    pub fn snapshot(&self, event_type: &EventType) -> Vec<(Listener, bool)> {
        self.by_type
            .get(event_type)
            .map(|list| list.iter().map(|r| (r.listener.clone(), r.capture)).collect())
            .unwrap_or_default()
    }

    pub fn count(&self, event_type: &EventType) -> usize {
        self.by_type.get(event_type).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Listener {
        Listener::new(|_, _| Ok(()))
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut store = ListenerStore::new();
        let l = noop();
        assert!(store.add(EventType::Click, l.clone(), false));
        assert!(!store.add(EventType::Click, l.clone(), false));
        assert_eq!(store.count(&EventType::Click), 1);
    }

    #[test]
    fn test_capture_and_bubble_are_distinct() {
        let mut store = ListenerStore::new();
        let l = noop();
        assert!(store.add(EventType::Click, l.clone(), false));
        assert!(store.add(EventType::Click, l.clone(), true));
        assert_eq!(store.count(&EventType::Click), 2);

        assert!(store.remove(&EventType::Click, &l, true));
        let snap = store.snapshot(&EventType::Click);
        assert_eq!(snap.len(), 1);
        assert!(!snap[0].1);
    }

    #[test]
    fn test_distinct_closures_are_distinct() {
        let mut store = ListenerStore::new();
        assert!(store.add(EventType::Click, noop(), false));
        assert!(store.add(EventType::Click, noop(), false));
        assert_eq!(store.count(&EventType::Click), 2);
    }

    #[test]
    fn test_remove_missing() {
        let mut store = ListenerStore::new();
        assert!(!store.remove(&EventType::Click, &noop(), false));
        store.add(EventType::Click, noop(), false);
        assert!(!store.remove(&EventType::KeyDown, &noop(), false));
    }
}
