//! Node store
//!
//! Owns the node arena, the id registry and the dirty queue. Every tree
//! mutation goes through here so that dirty flags stay in sync with the
//! queue the reconciler drains.

use std::collections::HashMap;

use crate::{
    DirtyFlags, DirtyQueue, DomError, DomResult, EventType, Listener, NodeId, NodePool,
    PseudoState, SlotIndex, StyleMap, Tag, VirtualNode, parse_inline_style,
};

#[derive(Debug)]
pub struct NodeStore {
    pool: NodePool,
    registry: HashMap<NodeId, SlotIndex>,
    next_id: u32,
    dirty: DirtyQueue,
    /// Ids created since the last `take_created`
    created: Vec<NodeId>,
    /// Ids released since the last `take_released`
    released: Vec<NodeId>,
}

impl NodeStore {
    /// Create a store holding only the root `div` (id 0).
    pub fn new() -> Self {
        let mut pool = NodePool::new();
        let root = pool.rent(NodeId::ROOT, Tag::Div);
        let mut registry = HashMap::new();
        registry.insert(NodeId::ROOT, root);

        Self {
            pool,
            registry,
            next_id: 1,
            dirty: DirtyQueue::new(),
            created: Vec::new(),
            released: Vec::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    // ------------------------------------------------------------------
    // Creation / lookup
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let slot = self.pool.rent(id, tag);
        self.registry.insert(id, slot);
        self.created.push(id);
        id
    }

    pub fn create_text_node(&mut self, text: impl Into<String>) -> NodeId {
        let id = self.create_element(Tag::Text);
        if let Ok(node) = self.node_mut(id) {
            node.text = Some(text.into());
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&VirtualNode> {
        self.registry.get(&id).and_then(|slot| self.pool.get(*slot))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.registry.contains_key(&id)
    }

    /// Arena slot currently backing `id`
    pub fn slot_of(&self, id: NodeId) -> Option<SlotIndex> {
        self.registry.get(&id).copied()
    }

    /// Number of registered nodes, root included
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    fn node(&self, id: NodeId) -> DomResult<&VirtualNode> {
        self.get(id).ok_or(DomError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> DomResult<&mut VirtualNode> {
        let slot = *self.registry.get(&id).ok_or(DomError::UnknownNode(id))?;
        self.pool.get_mut(slot).ok_or(DomError::UnknownNode(id))
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insertable(parent, child)?;
        self.detach(child)?;

        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);

        self.mark_dirty(parent, DirtyFlags::TREE)?;
        self.mark_dirty(child, DirtyFlags::TREE)
    }

    /// Detach `child` from `parent`. Only the parent is marked dirty.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let pos = self
            .node(parent)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(DomError::NotAChild { parent, child })?;

        self.node_mut(parent)?.children.remove(pos);
        if let Ok(node) = self.node_mut(child) {
            node.parent = None;
        }

        self.mark_dirty(parent, DirtyFlags::TREE)
    }

    /// Insert `new_child` before `reference`; a `None` reference appends.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        let Some(reference) = reference else {
            return self.append_child(parent, new_child);
        };

        if !self.node(parent)?.children.contains(&reference) {
            return Err(DomError::NotAChild { parent, child: reference });
        }
        self.check_insertable(parent, new_child)?;

        if new_child != reference {
            self.detach(new_child)?;
            let parent_node = self.node_mut(parent)?;
            let idx = parent_node
                .children
                .iter()
                .position(|c| *c == reference)
                .ok_or(DomError::NotAChild { parent, child: reference })?;
            parent_node.children.insert(idx, new_child);
            self.node_mut(new_child)?.parent = Some(parent);
        }

        self.mark_dirty(parent, DirtyFlags::TREE)?;
        self.mark_dirty(new_child, DirtyFlags::TREE)
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if parent == child {
            return Err(DomError::SelfAppend(child));
        }
        if child == NodeId::ROOT || self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> DomResult<()> {
        let Some(old_parent) = self.node(child)?.parent else {
            return Ok(());
        };
        if let Ok(parent) = self.node_mut(old_parent) {
            parent.children.retain(|c| *c != child);
        }
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    /// Return a detached node to the pool and drop its id from the registry.
    ///
    /// Children of the released node are orphaned (their parent link is
    /// cleared) but stay registered. Releasing an id that was already
    /// released is a no-op.
    pub fn release(&mut self, id: NodeId) -> DomResult<()> {
        if id == NodeId::ROOT {
            return Err(DomError::RootRelease);
        }
        let Some(&slot) = self.registry.get(&id) else {
            return if id.0 < self.next_id {
                Ok(())
            } else {
                Err(DomError::UnknownNode(id))
            };
        };

        let children = self.node(id)?.children.clone();
        self.pool.release(slot)?;
        self.registry.remove(&id);
        self.released.push(id);

        for child in children {
            if let Ok(node) = self.node_mut(child) {
                node.parent = None;
            }
        }
        tracing::trace!(%id, slot = slot.get(), "node released to pool");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Content mutation
    // ------------------------------------------------------------------

    /// Set an attribute. Setting `style` replaces the inline declarations.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let node = self.node_mut(id)?;
        if name == "style" {
            node.inline_style = parse_inline_style(value);
        }
        node.attributes.insert(name.to_string(), value.to_string());
        self.mark_dirty(id, DirtyFlags::ATTRIBUTES | DirtyFlags::STYLE)
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        let node = self.node_mut(id)?;
        if node.attributes.remove(name).is_none() {
            return Ok(false);
        }
        if name == "style" {
            node.inline_style.clear();
        }
        self.mark_dirty(id, DirtyFlags::ATTRIBUTES | DirtyFlags::STYLE)?;
        Ok(true)
    }

    pub fn set_inline_style(&mut self, id: NodeId, property: &str, value: &str) -> DomResult<()> {
        self.node_mut(id)?
            .inline_style
            .set(property.to_ascii_lowercase(), value);
        self.mark_dirty(id, DirtyFlags::STYLE)
    }

    pub fn remove_inline_style(&mut self, id: NodeId, property: &str) -> DomResult<bool> {
        let removed = self
            .node_mut(id)?
            .inline_style
            .remove(&property.to_ascii_lowercase())
            .is_some();
        if removed {
            self.mark_dirty(id, DirtyFlags::STYLE)?;
        }
        Ok(removed)
    }

    pub fn set_text(&mut self, id: NodeId, text: Option<String>) -> DomResult<()> {
        self.node_mut(id)?.text = text;
        self.mark_dirty(id, DirtyFlags::TEXT)
    }

    /// Toggle hover/focus state. Marks the node style-dirty only on change.
    pub fn set_pseudo_state(&mut self, id: NodeId, state: PseudoState, enabled: bool) -> DomResult<()> {
        let node = self.node_mut(id)?;
        let before = node.pseudo;
        node.pseudo.set(state, enabled);
        if node.pseudo != before {
            self.mark_dirty(id, DirtyFlags::STYLE)?;
        }
        Ok(())
    }

    /// Store the resolved style. Does not touch dirty state.
    pub fn set_computed_style(&mut self, id: NodeId, style: StyleMap) -> DomResult<()> {
        self.node_mut(id)?.computed_style = Some(style);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    pub fn mark_dirty(&mut self, id: NodeId, flags: DirtyFlags) -> DomResult<()> {
        self.node_mut(id)?.dirty |= flags;
        self.dirty.enqueue(id);
        Ok(())
    }

    pub fn drain_dirty(&mut self) -> Vec<NodeId> {
        self.dirty.drain_all()
    }

    /// Clear a node's dirty flags. Unknown ids are ignored.
    pub fn clear_dirty(&mut self, id: NodeId) {
        if let Ok(node) = self.node_mut(id) {
            node.dirty = DirtyFlags::empty();
        }
    }

    pub fn dirty_queue(&self) -> &DirtyQueue {
        &self.dirty
    }

    // ------------------------------------------------------------------
    // Lifecycle log
    // ------------------------------------------------------------------

    /// Ids created since the last call, in creation order.
    ///
    /// Lets an owner that wraps the store catch up on nodes created through
    /// a bare `&mut NodeStore`, such as from an event listener.
    pub fn take_created(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.created)
    }

    /// Ids released since the last call, in release order
    pub fn take_released(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.released)
    }

    // ------------------------------------------------------------------
    // Tree queries
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Position of `id` within its parent's children
    pub fn sibling_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Whether `ancestor` is a strict ancestor of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Inclusive containment
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.is_ancestor(ancestor, node)
    }

    /// `start` and all its descendants in pre-order
    pub fn pre_order(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains_node(start) {
            return out;
        }
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Descendants of `id` in pre-order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = self.pre_order(id);
        if !out.is_empty() {
            out.remove(0);
        }
        out
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Register a listener. Returns `false` if the same (listener, capture)
    /// pair is already registered for this type.
    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event_type: EventType,
        listener: &Listener,
        capture: bool,
    ) -> DomResult<bool> {
        let node = self.node_mut(id)?;
        Ok(node
            .listeners
            .get_or_insert_with(Box::default)
            .add(event_type, listener.clone(), capture))
    }

    pub fn remove_event_listener(
        &mut self,
        id: NodeId,
        event_type: &EventType,
        listener: &Listener,
        capture: bool,
    ) -> DomResult<bool> {
        let node = self.node_mut(id)?;
        Ok(node
            .listeners
            .as_mut()
            .is_some_and(|store| store.remove(event_type, listener, capture)))
    }

    pub(crate) fn listener_snapshot(&self, id: NodeId, event_type: &EventType) -> Vec<(Listener, bool)> {
        self.get(id)
            .and_then(|n| n.listeners.as_deref())
            .map(|store| store.snapshot(event_type))
            .unwrap_or_default()
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(store: &mut NodeStore) -> (NodeId, NodeId) {
        let a = store.create_element(Tag::Div);
        let b = store.create_element(Tag::Span);
        store.append_child(NodeId::ROOT, a).unwrap();
        store.append_child(a, b).unwrap();
        for id in store.drain_dirty() {
            store.clear_dirty(id);
        }
        (a, b)
    }

    #[test]
    fn test_root_exists() {
        let store = NodeStore::new();
        let root = store.get(NodeId::ROOT).unwrap();
        assert_eq!(root.tag(), Tag::Div);
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_ids_monotonic() {
        let mut store = NodeStore::new();
        let a = store.create_element(Tag::Div);
        let b = store.create_text_node("x");
        assert_eq!(a, NodeId(1));
        assert_eq!(b, NodeId(2));
        assert_eq!(store.get(b).unwrap().text(), Some("x"));
    }

    #[test]
    fn test_append_marks_both() {
        let mut store = NodeStore::new();
        let a = store.create_element(Tag::Div);
        store.append_child(NodeId::ROOT, a).unwrap();

        assert!(store.get(a).unwrap().dirty_flags().contains(DirtyFlags::TREE));
        assert!(store.get(NodeId::ROOT).unwrap().dirty_flags().contains(DirtyFlags::TREE));
        assert_eq!(store.drain_dirty(), vec![NodeId::ROOT, a]);
    }

    #[test]
    fn test_append_moves_between_parents() {
        let mut store = NodeStore::new();
        let (a, b) = chain(&mut store);
        store.append_child(NodeId::ROOT, b).unwrap();

        assert!(store.children(a).is_empty());
        assert_eq!(store.children(NodeId::ROOT), &[a, b]);
        assert_eq!(store.parent(b), Some(NodeId::ROOT));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut store = NodeStore::new();
        let (a, b) = chain(&mut store);

        assert_eq!(store.append_child(a, a), Err(DomError::SelfAppend(a)));
        assert_eq!(
            store.append_child(b, a),
            Err(DomError::HierarchyRequest { parent: b, child: a })
        );
        assert_eq!(store.parent(a), Some(NodeId::ROOT));
        assert_eq!(store.children(b), &[] as &[NodeId]);
        assert!(store.dirty_queue().is_empty());
    }

    #[test]
    fn test_remove_marks_parent_only() {
        let mut store = NodeStore::new();
        let (a, b) = chain(&mut store);
        store.remove_child(a, b).unwrap();

        assert!(store.parent(b).is_none());
        assert_eq!(store.drain_dirty(), vec![a]);
        assert!(store.get(b).unwrap().dirty_flags().is_empty());
    }

    #[test]
    fn test_remove_non_child_fails() {
        let mut store = NodeStore::new();
        let (a, b) = chain(&mut store);
        assert_eq!(
            store.remove_child(NodeId::ROOT, b),
            Err(DomError::NotAChild { parent: NodeId::ROOT, child: b })
        );
        assert_eq!(store.parent(b), Some(a));
    }

    #[test]
    fn test_insert_before() {
        let mut store = NodeStore::new();
        let (a, _) = chain(&mut store);
        let c = store.create_element(Tag::P);
        store.insert_before(NodeId::ROOT, c, Some(a)).unwrap();
        assert_eq!(store.children(NodeId::ROOT), &[c, a]);
        assert_eq!(store.sibling_index(a), Some(1));
        assert_eq!(store.drain_dirty(), vec![NodeId::ROOT, c]);
    }

    #[test]
    fn test_insert_before_none_appends() {
        let mut store = NodeStore::new();
        let (a, _) = chain(&mut store);
        let c = store.create_element(Tag::P);
        store.insert_before(NodeId::ROOT, c, None).unwrap();
        assert_eq!(store.children(NodeId::ROOT), &[a, c]);
    }

    #[test]
    fn test_insert_before_missing_reference() {
        let mut store = NodeStore::new();
        let (_, b) = chain(&mut store);
        let c = store.create_element(Tag::P);
        assert!(matches!(
            store.insert_before(NodeId::ROOT, c, Some(b)),
            Err(DomError::NotAChild { .. })
        ));
        assert!(store.parent(c).is_none());
    }

    #[test]
    fn test_insert_before_reorders_within_parent() {
        let mut store = NodeStore::new();
        let x = store.create_element(Tag::Div);
        let y = store.create_element(Tag::Div);
        let z = store.create_element(Tag::Div);
        for n in [x, y, z] {
            store.append_child(NodeId::ROOT, n).unwrap();
        }
        store.insert_before(NodeId::ROOT, z, Some(x)).unwrap();
        assert_eq!(store.children(NodeId::ROOT), &[z, x, y]);
    }

    #[test]
    fn test_release_requires_detach() {
        let mut store = NodeStore::new();
        let (a, b) = chain(&mut store);
        assert_eq!(store.release(b), Err(DomError::StillAttached(b)));
        assert!(store.contains_node(b));

        store.remove_child(a, b).unwrap();
        store.release(b).unwrap();
        assert!(!store.contains_node(b));
        // Second release is a no-op
        store.release(b).unwrap();
        assert_eq!(store.release(NodeId::ROOT), Err(DomError::RootRelease));
    }

    #[test]
    fn test_release_then_create_reuses_slot() {
        let mut store = NodeStore::new();
        let a = store.create_element(Tag::Span);
        store.set_attribute(a, "class", "old").unwrap();
        let slot = store.slot_of(a).unwrap();
        store.release(a).unwrap();

        let b = store.create_element(Tag::Img);
        assert_ne!(a, b);
        assert_eq!(store.slot_of(b), Some(slot));
        let node = store.get(b).unwrap();
        assert_eq!(node.tag(), Tag::Img);
        assert!(node.attributes().is_empty());
        assert!(node.dirty_flags().is_empty());
    }

    #[test]
    fn test_release_orphans_children() {
        let mut store = NodeStore::new();
        let (a, b) = chain(&mut store);
        store.remove_child(NodeId::ROOT, a).unwrap();
        store.release(a).unwrap();
        assert!(store.parent(b).is_none());
    }

    #[test]
    fn test_style_attribute_sets_inline() {
        let mut store = NodeStore::new();
        let a = store.create_element(Tag::Div);
        store.set_attribute(a, "style", "color: red; width: 4px").unwrap();
        let node = store.get(a).unwrap();
        assert_eq!(node.inline_style().get("color"), Some("red"));
        assert!(node.dirty_flags().contains(DirtyFlags::STYLE | DirtyFlags::ATTRIBUTES));

        assert!(store.remove_attribute(a, "style").unwrap());
        assert!(store.get(a).unwrap().inline_style().is_empty());
        assert!(!store.remove_attribute(a, "style").unwrap());
    }

    #[test]
    fn test_pseudo_state_marks_only_on_change() {
        let mut store = NodeStore::new();
        let a = store.create_element(Tag::Div);
        store.set_pseudo_state(a, PseudoState::HOVER, false).unwrap();
        assert!(store.dirty_queue().is_empty());
        store.set_pseudo_state(a, PseudoState::HOVER, true).unwrap();
        assert!(store.dirty_queue().contains(a));
    }

    #[test]
    fn test_lifecycle_log() {
        let mut store = NodeStore::new();
        let a = store.create_element(Tag::Div);
        let b = store.create_text_node("x");
        assert_eq!(store.take_created(), vec![a, b]);
        assert!(store.take_created().is_empty());

        store.release(a).unwrap();
        store.release(a).unwrap();
        assert_eq!(store.take_released(), vec![a]);
        assert!(store.take_released().is_empty());
    }

    #[test]
    fn test_pre_order() {
        let mut store = NodeStore::new();
        let (a, b) = chain(&mut store);
        let c = store.create_element(Tag::P);
        store.append_child(NodeId::ROOT, c).unwrap();
        assert_eq!(store.pre_order(NodeId::ROOT), vec![NodeId::ROOT, a, b, c]);
        assert_eq!(store.ancestors(b), vec![a, NodeId::ROOT]);
        assert_eq!(store.descendants(NodeId::ROOT), vec![a, b, c]);
        assert!(store.descendants(b).is_empty());
    }
}
