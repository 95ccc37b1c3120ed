//! Dirty queue
//!
//! Deduplicated, insertion-ordered set of nodes awaiting reconciliation.

use std::collections::HashSet;

use crate::NodeId;

#[derive(Debug, Default)]
pub struct DirtyQueue {
    order: Vec<NodeId>,
    members: HashSet<NodeId>,
}

impl DirtyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a node. Returns `false` if it was already queued.
    pub fn enqueue(&mut self, id: NodeId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Take every queued node in first-insertion order, leaving the queue empty.
    pub fn drain_all(&mut self) -> Vec<NodeId> {
        self.members.clear();
        std::mem::take(&mut self.order)
    }

    /// Queued nodes in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_dedup_keeps_first_position() {
        let mut q = DirtyQueue::new();
        assert!(q.enqueue(NodeId(3)));
        assert!(q.enqueue(NodeId(1)));
        assert!(!q.enqueue(NodeId(3)));
        assert_eq!(q.drain_all(), vec![NodeId(3), NodeId(1)]);
    }

    #[test]
    fn test_second_drain_is_empty() {
        let mut q = DirtyQueue::new();
        q.enqueue(NodeId(1));
        assert_eq!(q.drain_all().len(), 1);
        assert!(q.drain_all().is_empty());
        assert!(!q.contains(NodeId(1)));
    }

    #[test]
    fn test_requeue_after_drain() {
        let mut q = DirtyQueue::new();
        q.enqueue(NodeId(2));
        q.drain_all();
        assert!(q.enqueue(NodeId(2)));
        assert_eq!(q.len(), 1);
    }
}
