//! Event dispatch
//!
//! Capture → target → bubble over a path fixed at the start of the call.
//! Listener lists are copied per node before invocation, so listeners that
//! add or remove registrations only affect later dispatches.

use crate::{DomError, DomResult, Event, EventPhase, NodeId, NodeStore};

/// Event dispatcher trait
pub trait EventDispatcher {
    /// Dispatch `event` at `target`. Returns `false` if a listener called
    /// `prevent_default` on a cancelable event.
    fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> DomResult<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Capture,
    Target,
    Bubble,
}

impl EventDispatcher for NodeStore {
    fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> DomResult<bool> {
        if !self.contains_node(target) {
            return Err(DomError::UnknownNode(target));
        }

        event.target = Some(target);
        event.propagation_stopped = false;
        event.immediate_stopped = false;

        // Root first
        let mut path = self.ancestors(target);
        path.reverse();

        'dispatch: {
            event.phase = EventPhase::Capturing;
            for &node in &path {
                invoke(self, node, event, Pass::Capture);
                if event.propagation_stopped {
                    break 'dispatch;
                }
            }

            event.phase = EventPhase::AtTarget;
            invoke(self, target, event, Pass::Target);
            if event.propagation_stopped || !event.bubbles {
                break 'dispatch;
            }

            event.phase = EventPhase::Bubbling;
            for &node in path.iter().rev() {
                invoke(self, node, event, Pass::Bubble);
                if event.propagation_stopped {
                    break 'dispatch;
                }
            }
        }

        event.current_target = None;
        event.phase = EventPhase::None;
        event.immediate_stopped = false;
        Ok(!event.default_prevented)
    }
}

fn invoke(store: &mut NodeStore, node: NodeId, event: &mut Event, pass: Pass) {
    let listeners = store.listener_snapshot(node, &event.event_type);
    if listeners.is_empty() {
        return;
    }

    event.current_target = Some(node);
    for (listener, capture) in listeners {
        let wanted = match pass {
            Pass::Capture => capture,
            Pass::Target => true,
            Pass::Bubble => !capture,
        };
        if !wanted {
            continue;
        }

        if let Err(err) = listener.call(store, event) {
            tracing::warn!(
                node = %node,
                event = event.event_type.name(),
                error = %err,
                "event listener failed"
            );
        }
        if event.immediate_stopped {
            break;
        }
    }
    event.immediate_stopped = false;
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::{EventType, Listener, Tag};

    type Log = Rc<RefCell<Vec<String>>>;

    fn recorder(log: &Log, label: &str) -> Listener {
        let log = log.clone();
        let label = label.to_string();
        Listener::new(move |_, ev| {
            log.borrow_mut().push(format!("{label}:{:?}", ev.phase()));
            Ok(())
        })
    }

    fn tree() -> (NodeStore, NodeId, NodeId) {
        let mut store = NodeStore::new();
        let a = store.create_element(Tag::Div);
        let b = store.create_element(Tag::Span);
        store.append_child(NodeId::ROOT, a).unwrap();
        store.append_child(a, b).unwrap();
        (store, a, b)
    }

    #[test]
    fn test_phase_order() {
        let (mut store, a, b) = tree();
        let log: Log = Rc::default();
        store.add_event_listener(NodeId::ROOT, EventType::Click, &recorder(&log, "root-bubble"), false).unwrap();
        store.add_event_listener(a, EventType::Click, &recorder(&log, "a-capture"), true).unwrap();
        store.add_event_listener(b, EventType::Click, &recorder(&log, "b-capture"), true).unwrap();
        store.add_event_listener(b, EventType::Click, &recorder(&log, "b-bubble"), false).unwrap();

        let mut ev = Event::new(EventType::Click);
        assert!(store.dispatch_event(b, &mut ev).unwrap());

        assert_eq!(
            *log.borrow(),
            vec![
                "a-capture:Capturing",
                "b-capture:AtTarget",
                "b-bubble:AtTarget",
                "root-bubble:Bubbling",
            ]
        );
        assert_eq!(ev.phase(), EventPhase::None);
        assert!(ev.current_target().is_none());
        assert_eq!(ev.target(), Some(b));
    }

    #[test]
    fn test_non_bubbling_skips_bubble_phase() {
        let (mut store, a, b) = tree();
        let log: Log = Rc::default();
        store.add_event_listener(a, EventType::Focus, &recorder(&log, "a"), false).unwrap();
        store.add_event_listener(b, EventType::Focus, &recorder(&log, "b"), false).unwrap();

        let mut ev = Event::new(EventType::Focus);
        store.dispatch_event(b, &mut ev).unwrap();
        assert_eq!(*log.borrow(), vec!["b:AtTarget"]);
    }

    #[test]
    fn test_stop_propagation_in_capture() {
        let (mut store, a, b) = tree();
        let log: Log = Rc::default();
        store
            .add_event_listener(a, EventType::Click, &Listener::new(|_, ev| {
                ev.stop_propagation();
                Ok(())
            }), true)
            .unwrap();
        store.add_event_listener(b, EventType::Click, &recorder(&log, "b"), false).unwrap();
        store.add_event_listener(NodeId::ROOT, EventType::Click, &recorder(&log, "root"), false).unwrap();

        let mut ev = Event::new(EventType::Click);
        store.dispatch_event(b, &mut ev).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_immediate_stop_only_affects_current_node() {
        let (mut store, a, b) = tree();
        let log: Log = Rc::default();
        store
            .add_event_listener(b, EventType::Click, &Listener::new(|_, ev| {
                ev.stop_immediate_propagation();
                Ok(())
            }), false)
            .unwrap();
        store.add_event_listener(b, EventType::Click, &recorder(&log, "b2"), false).unwrap();
        store.add_event_listener(a, EventType::Click, &recorder(&log, "a"), false).unwrap();

        let mut ev = Event::new(EventType::Click);
        store.dispatch_event(b, &mut ev).unwrap();
        assert_eq!(*log.borrow(), vec!["a:Bubbling"]);
    }

    #[test]
    fn test_listener_error_does_not_abort() {
        let (mut store, _, b) = tree();
        let log: Log = Rc::default();
        store
            .add_event_listener(b, EventType::Click, &Listener::new(|_, _| anyhow::bail!("boom")), false)
            .unwrap();
        store.add_event_listener(b, EventType::Click, &recorder(&log, "after"), false).unwrap();

        let mut ev = Event::new(EventType::Click);
        assert!(store.dispatch_event(b, &mut ev).unwrap());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_prevent_default_result() {
        let (mut store, a, b) = tree();
        store
            .add_event_listener(a, EventType::Click, &Listener::new(|_, ev| {
                ev.prevent_default();
                Ok(())
            }), false)
            .unwrap();

        let mut ev = Event::new(EventType::Click);
        assert!(!store.dispatch_event(b, &mut ev).unwrap());
    }

    #[test]
    fn test_added_listener_not_run_in_same_pass() {
        let (mut store, _, b) = tree();
        let log: Log = Rc::default();
        let late = recorder(&log, "late");
        store
            .add_event_listener(b, EventType::Click, &Listener::new(move |store, ev| {
                let target = ev.current_target().unwrap();
                store.add_event_listener(target, EventType::Click, &late, false)?;
                Ok(())
            }), false)
            .unwrap();

        let mut ev = Event::new(EventType::Click);
        store.dispatch_event(b, &mut ev).unwrap();
        assert!(log.borrow().is_empty());

        let mut ev = Event::new(EventType::Click);
        store.dispatch_event(b, &mut ev).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_unknown_target() {
        let mut store = NodeStore::new();
        let mut ev = Event::new(EventType::Click);
        assert_eq!(
            store.dispatch_event(NodeId(99), &mut ev),
            Err(DomError::UnknownNode(NodeId(99)))
        );
    }
}
