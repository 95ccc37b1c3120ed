//! Node slot pool
//!
//! Arena of [`VirtualNode`] slots with a LIFO free list. Releasing a node
//! resets its slot and pushes the index; the next rent reuses the most
//! recently released slot before growing the arena.

use crate::{DomError, DomResult, NodeId, Tag, VirtualNode};

/// Index of a slot in the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotIndex(pub(crate) usize);

impl SlotIndex {
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Pool statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub reused: usize,
    pub allocated: usize,
    pub released: usize,
}

impl PoolStats {
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reused + self.allocated;
        if total == 0 {
            0.0
        } else {
            self.reused as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub struct NodePool {
    slots: Vec<VirtualNode>,
    free: Vec<SlotIndex>,
    stats: PoolStats,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the most recently released slot, or allocate a fresh one.
    pub fn rent(&mut self, id: NodeId, tag: Tag) -> SlotIndex {
        if let Some(slot) = self.free.pop() {
            let node = &mut self.slots[slot.0];
            node.pooled = false;
            node.id = id;
            node.tag = tag;
            self.stats.reused += 1;
            tracing::trace!(slot = slot.0, %id, "reusing pooled slot");
            return slot;
        }

        self.slots.push(VirtualNode::new(id, tag));
        self.stats.allocated += 1;
        SlotIndex(self.slots.len() - 1)
    }

    /// Return a detached node's slot to the pool.
    ///
    /// Fails while the node still has a parent; releasing an already pooled
    /// slot does nothing.
    pub fn release(&mut self, slot: SlotIndex) -> DomResult<()> {
        let node = self.slots.get_mut(slot.0).ok_or(DomError::InvalidSlot(slot.0))?;
        if node.pooled {
            return Ok(());
        }
        if node.parent.is_some() {
            return Err(DomError::StillAttached(node.id));
        }

        node.reset();
        node.pooled = true;
        self.free.push(slot);
        self.stats.released += 1;
        Ok(())
    }

    #[inline]
    pub fn get(&self, slot: SlotIndex) -> Option<&VirtualNode> {
        self.slots.get(slot.0)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut VirtualNode> {
        self.slots.get_mut(slot.0)
    }

    /// Number of slots waiting for reuse
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Total arena size, pooled slots included
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }
}
