//! DOM operation errors
//!
//! Structural failures (cycles, self-append, stale reference nodes) and pool
//! misuse. A failed operation leaves the tree untouched.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0} is not registered")]
    UnknownNode(NodeId),

    #[error("cannot append node {0} to itself")]
    SelfAppend(NodeId),

    #[error("hierarchy request error: {child} is an ancestor of {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("node {0} is still attached to a parent")]
    StillAttached(NodeId),

    #[error("the root node cannot be released")]
    RootRelease,

    #[error("slot {0} is outside the node arena")]
    InvalidSlot(usize),
}

impl DomError {
    /// Whether this is a tree-shape error (as opposed to pool misuse or a
    /// stale id).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::SelfAppend(_) | Self::HierarchyRequest { .. } | Self::NotAChild { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DomError::HierarchyRequest { parent: NodeId(2), child: NodeId(1) };
        assert_eq!(err.to_string(), "hierarchy request error: #1 is an ancestor of #2");
        assert!(err.is_structural());
        assert!(!DomError::RootRelease.is_structural());
    }
}
