//! Lumen DOM - virtual node store
//!
//! Arena-backed node tree with an id registry, a LIFO slot pool, a dirty
//! queue feeding the reconciler, and capture/target/bubble event dispatch.

mod tag;
mod node;
mod pool;
mod dirty;
mod store;
mod operations;
mod style_attr;
pub mod events;
mod listeners;
mod dispatch;

use std::collections::BTreeMap;

pub use tag::Tag;
pub use node::{VirtualNode, DirtyFlags, PseudoState};
pub use pool::{NodePool, PoolStats, SlotIndex};
pub use dirty::DirtyQueue;
pub use store::NodeStore;
pub use operations::{DomError, DomResult};
pub use style_attr::{parse_inline_style, InlineStyle};
pub use events::{Event, EventPhase, EventType};
pub use listeners::{Listener, ListenerStore};
pub use dispatch::EventDispatcher;

/// Resolved or declared style properties, ordered by property name.
pub type StyleMap = BTreeMap<String, String>;

/// Node identifier.
///
/// Ids are handed out monotonically by [`NodeStore`] and are distinct from
/// the arena slot a node occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Wire representation (signed 32-bit)
    #[inline]
    pub fn as_wire(self) -> i32 {
        self.0 as i32
    }

    #[inline]
    pub fn from_wire(raw: i32) -> Self {
        NodeId(raw as u32)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
