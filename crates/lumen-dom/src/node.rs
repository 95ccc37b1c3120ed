//! Virtual node
//!
//! A node lives in an arena slot owned by [`NodePool`](crate::NodePool).
//! Parent links are plain ids used for relation lookup and cycle checks;
//! the `children` list is the owning edge.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::{InlineStyle, ListenerStore, NodeId, StyleMap, Tag};

bitflags! {
    /// Aspects of a node that changed since the last tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        const TREE = 1 << 0;
        const STYLE = 1 << 1;
        const ATTRIBUTES = 1 << 2;
        const TEXT = 1 << 3;
    }
}

bitflags! {
    /// Interaction state consulted by `:hover` / `:focus` selectors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PseudoState: u8 {
        const HOVER = 1 << 0;
        const FOCUS = 1 << 1;
    }
}

#[derive(Debug, Default)]
pub struct VirtualNode {
    pub(crate) id: NodeId,
    pub(crate) tag: Tag,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: HashMap<String, String>,
    pub(crate) inline_style: InlineStyle,
    pub(crate) text: Option<String>,
    pub(crate) computed_style: Option<StyleMap>,
    pub(crate) pseudo: PseudoState,
    pub(crate) dirty: DirtyFlags,
    pub(crate) pooled: bool,
    /// Allocated on first `add_event_listener`
    pub(crate) listeners: Option<Box<ListenerStore>>,
}

impl VirtualNode {
    pub(crate) fn new(id: NodeId, tag: Tag) -> Self {
        Self {
            id,
            tag,
            ..Default::default()
        }
    }

    /// Clear every mutable field. The id is left as-is until the slot is
    /// rented again.
    pub(crate) fn reset(&mut self) {
        self.tag = Tag::Div;
        self.parent = None;
        self.children.clear();
        self.attributes.clear();
        self.inline_style.clear();
        self.text = None;
        self.computed_style = None;
        self.pseudo = PseudoState::empty();
        self.dirty = DirtyFlags::empty();
        self.listeners = None;
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Element id attribute
    pub fn element_id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Whitespace-separated entries of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn inline_style(&self) -> &InlineStyle {
        &self.inline_style
    }

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[inline]
    pub fn computed_style(&self) -> Option<&StyleMap> {
        self.computed_style.as_ref()
    }

    #[inline]
    pub fn pseudo_state(&self) -> PseudoState {
        self.pseudo
    }

    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    #[inline]
    pub fn is_pooled(&self) -> bool {
        self.pooled
    }

    pub fn listeners(&self) -> Option<&ListenerStore> {
        self.listeners.as_deref()
    }
}
