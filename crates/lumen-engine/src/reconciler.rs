//! Reconciliation
//!
//! Turns the dirty queue into a [`RenderCommandBuffer`] by diffing each
//! drained node against what was last sent to the backend. Failures are
//! isolated: a broken style pass or layout pass is logged and the tick goes
//! on; a node whose commands cannot be built is skipped for this tick.

use std::collections::{HashMap, HashSet};

use lumen_css::StyleEngine;
use lumen_dom::{DirtyFlags, NodeId, NodeStore, StyleMap};
use lumen_layout::{LayoutAdapter, LayoutRect};
use lumen_render::{RenderCommand, RenderCommandBuffer};

use crate::EngineError;

/// Entries of `next` that are new or changed relative to `prev`.
/// Removed keys are not reported.
pub fn diff_styles(prev: Option<&StyleMap>, next: &StyleMap) -> StyleMap {
    next.iter()
        .filter(|(k, v)| prev.and_then(|p| p.get(*k)) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Per-node state last sent to the backend
#[derive(Debug, Default)]
pub struct Reconciler {
    prev_styles: HashMap<NodeId, StyleMap>,
    prev_text: HashMap<NodeId, Option<String>>,
    prev_layout: HashMap<NodeId, LayoutRect>,
    pending_created: HashSet<NodeId>,
    pending_destroyed: Vec<NodeId>,
    ticks: u64,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next time `id` is drained it is announced with Create
    pub fn mark_created(&mut self, id: NodeId) {
        self.pending_created.insert(id);
    }

    /// Forget everything cached for `id`. A Destroy command is queued unless
    /// the node was never announced.
    pub fn mark_destroyed(&mut self, id: NodeId) {
        self.prev_styles.remove(&id);
        self.prev_text.remove(&id);
        self.prev_layout.remove(&id);
        if self.pending_created.remove(&id) {
            return;
        }
        if !self.pending_destroyed.contains(&id) {
            self.pending_destroyed.push(id);
        }
    }

    pub fn is_pending_create(&self, id: NodeId) -> bool {
        self.pending_created.contains(&id)
    }

    pub fn pending_destroy_count(&self) -> usize {
        self.pending_destroyed.len()
    }

    /// Drop cached layouts so the next tick re-sends them
    pub fn forget_layouts(&mut self) {
        self.prev_layout.clear();
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one reconciliation pass
    pub fn tick(
        &mut self,
        store: &mut NodeStore,
        styles: &mut StyleEngine,
        mut layout: Option<&mut dyn LayoutAdapter>,
        viewport: (Option<f32>, Option<f32>),
    ) -> RenderCommandBuffer {
        let mut buffer = RenderCommandBuffer::new();
        let drained = store.drain_dirty();
        if drained.is_empty() && self.pending_destroyed.is_empty() {
            return buffer;
        }
        self.ticks += 1;

        for id in self.pending_destroyed.drain(..) {
            buffer.push(RenderCommand::destroy(id));
        }
        // Only destroys queued: nothing to resolve or lay out
        if drained.is_empty() {
            tracing::debug!(tick = self.ticks, commands = buffer.len(), "tick flushed destroys");
            return buffer;
        }

        if let Err(err) = styles.resolve(store) {
            tracing::error!(error = %err, "style resolution failed");
        }

        if let Some(adapter) = layout.as_deref_mut() {
            if let Err(err) = run_layout(store, adapter, viewport) {
                tracing::error!(error = %err, "layout computation failed");
            }
        }

        let mut failed = 0usize;
        for &id in &drained {
            match self.emit_node(store, layout.as_deref(), id) {
                Ok(commands) => buffer.extend(commands),
                Err(err) => {
                    failed += 1;
                    tracing::warn!(node = %id, error = %err, "dropping commands for node");
                }
            }
            store.clear_dirty(id);
        }

        tracing::debug!(
            tick = self.ticks,
            drained = drained.len(),
            commands = buffer.len(),
            failed,
            "tick complete"
        );
        buffer
    }

    /// Commands for one drained node. Caches are only updated once every
    /// command for the node has been built.
    fn emit_node(
        &mut self,
        store: &NodeStore,
        layout: Option<&dyn LayoutAdapter>,
        id: NodeId,
    ) -> Result<Vec<RenderCommand>, EngineError> {
        let Some(node) = store.get(id) else {
            tracing::debug!(node = %id, "skipping released node");
            return Ok(Vec::new());
        };

        let flags = node.dirty_flags();
        let created = self.pending_created.contains(&id);
        let parent = node.parent();
        let sibling_index = match parent {
            Some(_) => Some(store.sibling_index(id).ok_or(EngineError::MissingFromParent(id))?),
            None => None,
        };

        let mut commands = Vec::new();
        if created {
            commands.push(RenderCommand::create(id, node.tag(), parent, sibling_index));
        } else if flags.contains(DirtyFlags::TREE) {
            if let (Some(parent), Some(index)) = (parent, sibling_index) {
                commands.push(RenderCommand::reparent(id, parent, index));
            }
        }

        let mut next_style = None;
        if created || flags.contains(DirtyFlags::STYLE) {
            let current = node.computed_style().cloned().unwrap_or_default();
            let changed = diff_styles(self.prev_styles.get(&id), &current);
            if !changed.is_empty() {
                commands.push(RenderCommand::update_style(id, changed));
            }
            next_style = Some(current);
        }

        let mut next_text = None;
        if created || flags.contains(DirtyFlags::TEXT) {
            let current = node.text().map(str::to_string);
            let prev = self.prev_text.get(&id).cloned().flatten();
            if current != prev {
                commands.push(RenderCommand::update_text(id, current.clone()));
            }
            next_text = Some(current);
        }

        let mut next_layout = None;
        if let Some(rect) = layout.and_then(|l| l.get_layout(id)) {
            if self.prev_layout.get(&id) != Some(&rect) {
                commands.push(RenderCommand::update_layout(id, rect));
            }
            next_layout = Some(rect);
        }

        for command in &commands {
            command.check_wire()?;
        }

        if created {
            self.pending_created.remove(&id);
        }
        if let Some(style) = next_style {
            self.prev_styles.insert(id, style);
        }
        if let Some(text) = next_text {
            self.prev_text.insert(id, text);
        }
        if let Some(rect) = next_layout {
            self.prev_layout.insert(id, rect);
        }
        Ok(commands)
    }
}

/// Push computed styles into the adapter and lay out from the root
fn run_layout(
    store: &NodeStore,
    adapter: &mut dyn LayoutAdapter,
    (width, height): (Option<f32>, Option<f32>),
) -> Result<(), EngineError> {
    let root = store.root();
    if !adapter.has_node(root) {
        return Ok(());
    }
    for id in store.pre_order(root) {
        if !adapter.has_node(id) {
            continue;
        }
        if let Some(style) = store.get(id).and_then(|n| n.computed_style()) {
            if let Err(err) = adapter.sync_styles(id, style) {
                tracing::warn!(node = %id, error = %err, "failed to sync layout style");
            }
        }
    }
    adapter.compute_layout(root, width, height)?;
    Ok(())
}
