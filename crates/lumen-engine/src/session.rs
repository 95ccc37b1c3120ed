//! Session - the per-document aggregate
//!
//! Owns the node store, the style engine, the reconciler and an optional
//! layout adapter. Tree mutations go through the session so the adapter's
//! topology stays in step with the store.

use lumen_css::{StyleEngine, Stylesheet};
use lumen_dom::{
    DirtyFlags, DomError, Event, EventDispatcher, EventType, Listener, NodeId, NodeStore,
    PseudoState, Tag, VirtualNode,
};
use lumen_layout::{LayoutAdapter, LayoutError};
use lumen_render::RenderCommandBuffer;

use crate::{Config, EngineError, Reconciler};

/// One document's worth of pipeline state
pub struct Session {
    config: Config,
    store: NodeStore,
    styles: StyleEngine,
    reconciler: Reconciler,
    layout: Option<Box<dyn LayoutAdapter>>,
}

impl Session {
    /// Create a new session with the given configuration
    pub fn new(config: Config) -> Self {
        tracing::debug!(?config, "session created");
        Self {
            config,
            store: NodeStore::new(),
            styles: StyleEngine::new(),
            reconciler: Reconciler::new(),
            layout: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn styles(&self) -> &StyleEngine {
        &self.styles
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn root(&self) -> NodeId {
        self.store.root()
    }

    // ------------------------------------------------------------------
    // Layout adapter
    // ------------------------------------------------------------------

    /// Attach (or replace) the layout adapter, returning the previous one.
    ///
    /// If backfilling fails the new adapter is dropped and the previous one
    /// stays attached.
    pub fn set_layout_adapter(
        &mut self,
        adapter: Box<dyn LayoutAdapter>,
    ) -> Result<Option<Box<dyn LayoutAdapter>>, EngineError> {
        let previous = self.layout.replace(adapter);
        if self.config.backfill_on_attach {
            if let Err(err) = self.backfill_layout() {
                self.layout = previous;
                return Err(err);
            }
        }
        self.reconciler.forget_layouts();
        Ok(previous)
    }

    pub fn take_layout_adapter(&mut self) -> Option<Box<dyn LayoutAdapter>> {
        self.reconciler.forget_layouts();
        self.layout.take()
    }

    pub fn layout_adapter(&self) -> Option<&dyn LayoutAdapter> {
        self.layout.as_deref()
    }

    pub fn has_layout_adapter(&self) -> bool {
        self.layout.is_some()
    }

    /// Mirror every node reachable from the root into the adapter. Returns
    /// the number of nodes mirrored; zero without an adapter.
    pub fn backfill_layout(&mut self) -> Result<usize, EngineError> {
        let Some(adapter) = self.layout.as_deref_mut() else {
            return Ok(0);
        };
        let order = self.store.pre_order(self.store.root());
        for &id in &order {
            adapter.create_node(id)?;
        }
        for &id in &order {
            for (index, &child) in self.store.children(id).iter().enumerate() {
                adapter.insert_child(id, child, index)?;
            }
        }
        tracing::debug!(nodes = order.len(), "layout backfilled");
        Ok(order.len())
    }

    /// Run `f` against the adapter, creating layout nodes for `ids` first.
    /// Failures are logged; the store mutation has already happened.
    fn mirror(&mut self, ids: &[NodeId], f: impl FnOnce(&mut dyn LayoutAdapter) -> Result<(), LayoutError>) {
        let Some(adapter) = self.layout.as_deref_mut() else {
            return;
        };
        let result = ids
            .iter()
            .try_for_each(|&id| adapter.create_node(id))
            .and_then(|()| f(adapter));
        if let Err(err) = result {
            tracing::warn!(error = %err, "layout mirror failed");
        }
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        let id = self.store.create_element(tag);
        self.after_create(id);
        id
    }

    pub fn create_text_node(&mut self, text: impl Into<String>) -> NodeId {
        let id = self.store.create_text_node(text);
        self.after_create(id);
        id
    }

    fn after_create(&mut self, id: NodeId) {
        self.absorb_store_changes();
        tracing::trace!(node = %id, "node created");
    }

    /// Catch up on changes made through a bare `&mut NodeStore`, as event
    /// listeners do. New nodes are marked created and mirrored, released
    /// nodes are announced destroyed and dropped from the adapter, and the
    /// children of tree-dirty nodes are re-mirrored.
    fn absorb_store_changes(&mut self) {
        let created = self.store.take_created();
        for &id in &created {
            if !self.store.contains_node(id) {
                continue;
            }
            if self.config.auto_mark_created {
                self.reconciler.mark_created(id);
            }
            self.mirror(&[id], |_| Ok(()));
        }

        for id in self.store.take_released() {
            // Created and released between two catch-ups: never announced
            if !created.contains(&id) {
                self.reconciler.mark_destroyed(id);
            }
            if let Some(adapter) = self.layout.as_deref_mut() {
                if let Err(err) = adapter.destroy_node(id) {
                    tracing::warn!(node = %id, error = %err, "failed to drop layout node");
                }
            }
        }

        self.mirror_dirty_topology();
    }

    /// Make the adapter's child lists match the store for every queued
    /// node carrying the tree flag
    fn mirror_dirty_topology(&mut self) {
        let Some(adapter) = self.layout.as_deref_mut() else {
            return;
        };
        let store = &self.store;
        for id in store.dirty_queue().iter() {
            let Some(node) = store.get(id) else { continue };
            if !node.dirty_flags().contains(DirtyFlags::TREE) {
                continue;
            }
            let children = node.children();
            let result = std::iter::once(id)
                .chain(children.iter().copied())
                .try_for_each(|n| adapter.create_node(n))
                .and_then(|()| adapter.set_children(id, children));
            if let Err(err) = result {
                tracing::warn!(node = %id, error = %err, "layout mirror failed");
            }
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), EngineError> {
        self.store.append_child(parent, child)?;
        self.mirror(&[parent, child], |l| l.append_child(parent, child));
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), EngineError> {
        self.store.remove_child(parent, child)?;
        self.mirror(&[], |l| {
            if l.has_node(parent) && l.has_node(child) {
                l.remove_child(parent, child)
            } else {
                Ok(())
            }
        });
        Ok(())
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> Result<(), EngineError> {
        self.store.insert_before(parent, new_child, ref_child)?;
        let index = self
            .store
            .sibling_index(new_child)
            .ok_or(EngineError::MissingFromParent(new_child))?;
        self.mirror(&[parent, new_child], |l| l.insert_child(parent, new_child, index));
        Ok(())
    }

    pub fn get_node(&self, id: NodeId) -> Option<&VirtualNode> {
        self.store.get(id)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), EngineError> {
        Ok(self.store.set_attribute(id, name, value)?)
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, EngineError> {
        Ok(self.store.remove_attribute(id, name)?)
    }

    pub fn set_inline_style(&mut self, id: NodeId, property: &str, value: &str) -> Result<(), EngineError> {
        Ok(self.store.set_inline_style(id, property, value)?)
    }

    pub fn remove_inline_style(&mut self, id: NodeId, property: &str) -> Result<bool, EngineError> {
        Ok(self.store.remove_inline_style(id, property)?)
    }

    pub fn set_text(&mut self, id: NodeId, text: Option<String>) -> Result<(), EngineError> {
        Ok(self.store.set_text(id, text)?)
    }

    pub fn set_pseudo_state(&mut self, id: NodeId, state: PseudoState, enabled: bool) -> Result<(), EngineError> {
        Ok(self.store.set_pseudo_state(id, state, enabled)?)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn mark_created(&mut self, id: NodeId) {
        self.reconciler.mark_created(id);
    }

    pub fn mark_destroyed(&mut self, id: NodeId) {
        self.reconciler.mark_destroyed(id);
    }

    /// Detach `id`, announce Destroy for it and every descendant, drop their
    /// layout nodes and return their slots to the pool.
    pub fn destroy_subtree(&mut self, id: NodeId) -> Result<usize, EngineError> {
        if id == self.store.root() {
            return Err(DomError::RootRelease.into());
        }
        if !self.store.contains_node(id) {
            return Err(DomError::UnknownNode(id).into());
        }
        if let Some(parent) = self.store.parent(id) {
            self.remove_child(parent, id)?;
        }

        // Parents before children: releasing a node orphans its children,
        // which makes them releasable in turn.
        let subtree = self.store.pre_order(id);
        for &node in &subtree {
            self.store.release(node)?;
        }
        self.absorb_store_changes();
        tracing::debug!(root = %id, nodes = subtree.len(), "subtree destroyed");
        Ok(subtree.len())
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    /// Add author CSS. Existing nodes pick it up on the next non-empty tick.
    pub fn add_css(&mut self, css: &str) -> Result<usize, EngineError> {
        Ok(self.styles.add_css(css)?)
    }

    pub fn add_stylesheet(&mut self, sheet: Stylesheet) {
        self.styles.add_stylesheet(sheet);
    }

    pub fn add_rule<'a>(&mut self, selector: &str, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.styles.add_rule(selector, pairs);
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event_type: EventType,
        listener: &Listener,
        capture: bool,
    ) -> Result<bool, EngineError> {
        Ok(self.store.add_event_listener(id, event_type, listener, capture)?)
    }

    pub fn remove_event_listener(
        &mut self,
        id: NodeId,
        event_type: &EventType,
        listener: &Listener,
        capture: bool,
    ) -> Result<bool, EngineError> {
        Ok(self.store.remove_event_listener(id, event_type, listener, capture)?)
    }

    // ------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------

    pub fn tick(&mut self) -> RenderCommandBuffer {
        self.absorb_store_changes();
        let layout: Option<&mut dyn LayoutAdapter> = match &mut self.layout {
            Some(adapter) => Some(adapter.as_mut()),
            None => None,
        };
        let viewport = (self.config.viewport_width, self.config.viewport_height);
        self.reconciler
            .tick(&mut self.store, &mut self.styles, layout, viewport)
    }

    /// Tick and encode with the binary wire format
    pub fn tick_binary(&mut self) -> Result<Vec<u8>, EngineError> {
        Ok(self.tick().to_bytes()?)
    }

    /// Tick and encode as JSON
    pub fn tick_json(&mut self) -> Result<String, EngineError> {
        Ok(self.tick().to_json()?)
    }

    /// End the session, dropping layout nodes before the store goes away
    pub fn teardown(mut self) {
        if let Some(mut adapter) = self.layout.take() {
            for id in self.store.pre_order(self.store.root()) {
                if let Err(err) = adapter.destroy_node(id) {
                    tracing::warn!(node = %id, error = %err, "failed to drop layout node");
                }
            }
        }
        let stats = self.store.pool().stats();
        tracing::debug!(
            nodes = self.store.len(),
            reused = stats.reused,
            allocated = stats.allocated,
            ticks = self.reconciler.ticks(),
            "session torn down"
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("nodes", &self.store.len())
            .field("layout", &self.layout.is_some())
            .finish()
    }
}

impl EventDispatcher for Session {
    /// Dispatch through the store, then pick up whatever the listeners
    /// created, released or moved
    fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> Result<bool, DomError> {
        let result = self.store.dispatch_event(target, event);
        self.absorb_store_changes();
        result
    }
}
