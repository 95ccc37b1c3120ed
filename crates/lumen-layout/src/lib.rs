//! Lumen Layout
//!
//! The layout adapter contract and a flexbox implementation on top of taffy.
//! Adapters mirror the node tree keyed by [`NodeId`]; they never own it.

mod taffy_adapter;
pub mod values;

use lumen_dom::{NodeId, StyleMap};
use serde::{Deserialize, Serialize};

pub use taffy_adapter::TaffyLayoutAdapter;

/// Border box of a node, relative to its parent's origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Layout error
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("node {0} has no layout node")]
    UnknownNode(NodeId),
    #[error("layout engine error: {0}")]
    Engine(#[from] taffy::TaffyError),
}

/// Layout engine contract.
///
/// Topology calls mirror the node store; styles are pushed as computed
/// style maps. Values the engine cannot parse are skipped and the previous
/// value kept.
pub trait LayoutAdapter {
    /// Create a layout node for `id`; existing nodes are left alone
    fn create_node(&mut self, id: NodeId) -> Result<(), LayoutError>;

    /// Drop the layout node for `id`, if any
    fn destroy_node(&mut self, id: NodeId) -> Result<(), LayoutError>;

    fn has_node(&self, id: NodeId) -> bool;

    fn sync_styles(&mut self, id: NodeId, style: &StyleMap) -> Result<(), LayoutError>;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError>;

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError>;

    /// Insert `child` at `index` among `parent`'s children, detaching it
    /// from any previous parent first
    fn insert_child(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), LayoutError>;

    /// Replace `parent`'s children with `children`, in order. Children are
    /// detached from previous parents; former children become roots.
    fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), LayoutError>;

    /// Lay out the subtree under `root`. `None` means unconstrained.
    fn compute_layout(&mut self, root: NodeId, width: Option<f32>, height: Option<f32>) -> Result<(), LayoutError>;

    fn get_layout(&self, id: NodeId) -> Option<LayoutRect>;
}
