//! Taffy-backed layout adapter
//!
//! Properties are applied through a setter table keyed by property name and
//! built once. Properties missing from a style map are reset to their CSS
//! initial value so removed declarations stop affecting layout.

use std::collections::HashMap;
use std::sync::LazyLock;

use lumen_css::PropertyId;
use lumen_dom::{NodeId, StyleMap};
use taffy::{AvailableSpace, Size, Style, TaffyTree, TraversePartialTree};

use crate::values;
use crate::{LayoutAdapter, LayoutError, LayoutRect};

/// Applies one CSS value; returns false if the value was not understood
type Setter = fn(&mut Style, &str) -> bool;

fn set<T>(slot: &mut T, parsed: Option<T>) -> bool {
    match parsed {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

/// (property, initial value, setter)
const SETTERS: &[(PropertyId, &str, Setter)] = &[
    (PropertyId::Display, "block", |s, v| set(&mut s.display, values::display(v))),
    (PropertyId::Position, "static", |s, v| set(&mut s.position, values::position(v))),
    (PropertyId::Overflow, "visible", |s, v| match values::overflow(v) {
        Some(o) => {
            s.overflow.x = o;
            s.overflow.y = o;
            true
        }
        None => false,
    }),
    (PropertyId::Top, "auto", |s, v| set(&mut s.inset.top, values::length_percentage_auto(v))),
    (PropertyId::Right, "auto", |s, v| set(&mut s.inset.right, values::length_percentage_auto(v))),
    (PropertyId::Bottom, "auto", |s, v| set(&mut s.inset.bottom, values::length_percentage_auto(v))),
    (PropertyId::Left, "auto", |s, v| set(&mut s.inset.left, values::length_percentage_auto(v))),
    (PropertyId::Width, "auto", |s, v| set(&mut s.size.width, values::dimension(v))),
    (PropertyId::Height, "auto", |s, v| set(&mut s.size.height, values::dimension(v))),
    (PropertyId::MinWidth, "auto", |s, v| set(&mut s.min_size.width, values::dimension(v))),
    (PropertyId::MinHeight, "auto", |s, v| set(&mut s.min_size.height, values::dimension(v))),
    (PropertyId::MaxWidth, "auto", |s, v| set(&mut s.max_size.width, values::dimension(v))),
    (PropertyId::MaxHeight, "auto", |s, v| set(&mut s.max_size.height, values::dimension(v))),
    (PropertyId::MarginTop, "0", |s, v| set(&mut s.margin.top, values::length_percentage_auto(v))),
    (PropertyId::MarginRight, "0", |s, v| set(&mut s.margin.right, values::length_percentage_auto(v))),
    (PropertyId::MarginBottom, "0", |s, v| set(&mut s.margin.bottom, values::length_percentage_auto(v))),
    (PropertyId::MarginLeft, "0", |s, v| set(&mut s.margin.left, values::length_percentage_auto(v))),
    (PropertyId::PaddingTop, "0", |s, v| set(&mut s.padding.top, values::length_percentage(v))),
    (PropertyId::PaddingRight, "0", |s, v| set(&mut s.padding.right, values::length_percentage(v))),
    (PropertyId::PaddingBottom, "0", |s, v| set(&mut s.padding.bottom, values::length_percentage(v))),
    (PropertyId::PaddingLeft, "0", |s, v| set(&mut s.padding.left, values::length_percentage(v))),
    (PropertyId::BorderWidth, "0", |s, v| match values::length_percentage(v) {
        Some(w) => {
            s.border.top = w;
            s.border.right = w;
            s.border.bottom = w;
            s.border.left = w;
            true
        }
        None => false,
    }),
    (PropertyId::FlexDirection, "row", |s, v| set(&mut s.flex_direction, values::flex_direction(v))),
    (PropertyId::FlexWrap, "nowrap", |s, v| set(&mut s.flex_wrap, values::flex_wrap(v))),
    (PropertyId::FlexGrow, "0", |s, v| set(&mut s.flex_grow, values::parse_number(v))),
    (PropertyId::FlexShrink, "1", |s, v| set(&mut s.flex_shrink, values::parse_number(v))),
    (PropertyId::FlexBasis, "auto", |s, v| set(&mut s.flex_basis, values::dimension(v))),
    (PropertyId::JustifyContent, "normal", |s, v| set(&mut s.justify_content, values::justify_content(v))),
    (PropertyId::AlignItems, "normal", |s, v| set(&mut s.align_items, values::align_items(v))),
    (PropertyId::AlignSelf, "auto", |s, v| set(&mut s.align_self, values::align_self(v))),
    (PropertyId::AlignContent, "normal", |s, v| set(&mut s.align_content, values::align_content(v))),
    (PropertyId::RowGap, "0", |s, v| set(&mut s.gap.height, values::length_percentage(v))),
    (PropertyId::ColumnGap, "0", |s, v| set(&mut s.gap.width, values::length_percentage(v))),
];

static SETTER_TABLE: LazyLock<HashMap<&'static str, (&'static str, Setter)>> = LazyLock::new(|| {
    SETTERS
        .iter()
        .map(|(id, initial, setter)| (id.name(), (*initial, *setter)))
        .collect()
});

/// Flexbox layout through taffy
pub struct TaffyLayoutAdapter {
    tree: TaffyTree<()>,
    nodes: HashMap<NodeId, taffy::NodeId>,
}

impl TaffyLayoutAdapter {
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
            nodes: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current engine style, mostly for inspection in tests
    pub fn style(&self, id: NodeId) -> Option<&Style> {
        let node = *self.nodes.get(&id)?;
        self.tree.style(node).ok()
    }

    fn lookup(&self, id: NodeId) -> Result<taffy::NodeId, LayoutError> {
        self.nodes.get(&id).copied().ok_or(LayoutError::UnknownNode(id))
    }

    fn detach(&mut self, child: taffy::NodeId) -> Result<(), LayoutError> {
        if let Some(old_parent) = self.tree.parent(child) {
            self.tree.remove_child(old_parent, child)?;
        }
        Ok(())
    }
}

impl Default for TaffyLayoutAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaffyLayoutAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaffyLayoutAdapter")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl LayoutAdapter for TaffyLayoutAdapter {
    fn create_node(&mut self, id: NodeId) -> Result<(), LayoutError> {
        if self.nodes.contains_key(&id) {
            return Ok(());
        }
        let style = Style {
            display: taffy::Display::Block,
            ..Style::default()
        };
        let node = self.tree.new_leaf(style)?;
        self.nodes.insert(id, node);
        Ok(())
    }

    fn destroy_node(&mut self, id: NodeId) -> Result<(), LayoutError> {
        if let Some(node) = self.nodes.remove(&id) {
            self.detach(node)?;
            self.tree.remove(node)?;
        }
        Ok(())
    }

    fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn sync_styles(&mut self, id: NodeId, style: &StyleMap) -> Result<(), LayoutError> {
        let node = self.lookup(id)?;
        let mut next = self.tree.style(node)?.clone();

        for (name, (initial, setter)) in SETTER_TABLE.iter() {
            let value = style.get(*name).map(String::as_str).unwrap_or(initial);
            if !setter(&mut next, value) {
                tracing::warn!(node = %id, property = *name, value, "ignoring unsupported layout value");
            }
        }

        self.tree.set_style(node, next)?;
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        let parent_node = self.lookup(parent)?;
        let child_node = self.lookup(child)?;
        self.detach(child_node)?;
        self.tree.add_child(parent_node, child_node)?;
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        let parent_node = self.lookup(parent)?;
        let child_node = self.lookup(child)?;
        if self.tree.parent(child_node) == Some(parent_node) {
            self.tree.remove_child(parent_node, child_node)?;
        }
        Ok(())
    }

    fn insert_child(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), LayoutError> {
        let parent_node = self.lookup(parent)?;
        let child_node = self.lookup(child)?;
        self.detach(child_node)?;
        let index = index.min(self.tree.child_count(parent_node));
        self.tree.insert_child_at_index(parent_node, index, child_node)?;
        Ok(())
    }

    fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), LayoutError> {
        let parent_node = self.lookup(parent)?;
        let mut engine_children = Vec::with_capacity(children.len());
        for &child in children {
            let child_node = self.lookup(child)?;
            if self.tree.parent(child_node).is_some_and(|p| p != parent_node) {
                self.detach(child_node)?;
            }
            engine_children.push(child_node);
        }
        self.tree.set_children(parent_node, &engine_children)?;
        Ok(())
    }

    fn compute_layout(&mut self, root: NodeId, width: Option<f32>, height: Option<f32>) -> Result<(), LayoutError> {
        let root_node = self.lookup(root)?;
        let space = |dim: Option<f32>| dim.map_or(AvailableSpace::MaxContent, AvailableSpace::Definite);
        self.tree.compute_layout(
            root_node,
            Size {
                width: space(width),
                height: space(height),
            },
        )?;
        Ok(())
    }

    fn get_layout(&self, id: NodeId) -> Option<LayoutRect> {
        let node = *self.nodes.get(&id)?;
        let layout = self.tree.layout(node).ok()?;
        Some(LayoutRect {
            x: layout.location.x,
            y: layout.location.y,
            width: layout.size.width,
            height: layout.size.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taffy::Dimension;

    fn style(pairs: &[(&str, &str)]) -> StyleMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_every_layout_property_has_a_setter() {
        for id in PropertyId::all().filter(|p| p.affects_layout()) {
            let text_only = matches!(
                id,
                PropertyId::FontSize
                    | PropertyId::FontWeight
                    | PropertyId::LineHeight
                    | PropertyId::LetterSpacing
                    | PropertyId::WordSpacing
                    | PropertyId::WhiteSpace
                    | PropertyId::Direction
            );
            assert!(text_only || SETTER_TABLE.contains_key(id.name()), "{:?}", id);
        }
    }

    #[test]
    fn test_unparsable_value_keeps_previous() {
        let mut adapter = TaffyLayoutAdapter::new();
        let id = NodeId(1);
        adapter.create_node(id).unwrap();
        adapter.sync_styles(id, &style(&[("width", "40px")])).unwrap();
        adapter.sync_styles(id, &style(&[("width", "3em")])).unwrap();
        assert_eq!(adapter.style(id).unwrap().size.width, Dimension::Length(40.0));

        // Missing property resets to its initial value
        adapter.sync_styles(id, &style(&[])).unwrap();
        assert_eq!(adapter.style(id).unwrap().size.width, Dimension::Auto);
    }

    #[test]
    fn test_reparent_detaches_from_old_parent() {
        let mut adapter = TaffyLayoutAdapter::new();
        for i in 0..3 {
            adapter.create_node(NodeId(i)).unwrap();
        }
        adapter.append_child(NodeId(0), NodeId(2)).unwrap();
        adapter.append_child(NodeId(1), NodeId(2)).unwrap();
        let a = adapter.lookup(NodeId(0)).unwrap();
        let b = adapter.lookup(NodeId(1)).unwrap();
        assert_eq!(adapter.tree.child_count(a), 0);
        assert_eq!(adapter.tree.child_count(b), 1);
    }

    #[test]
    fn test_set_children_replaces_and_moves() {
        let mut adapter = TaffyLayoutAdapter::new();
        for i in 0..4 {
            adapter.create_node(NodeId(i)).unwrap();
        }
        adapter.append_child(NodeId(0), NodeId(1)).unwrap();
        adapter.append_child(NodeId(0), NodeId(2)).unwrap();
        adapter.append_child(NodeId(3), NodeId(2)).unwrap();

        adapter.set_children(NodeId(0), &[NodeId(2), NodeId(3)]).unwrap();
        let root = adapter.lookup(NodeId(0)).unwrap();
        let moved = adapter.lookup(NodeId(2)).unwrap();
        let dropped = adapter.lookup(NodeId(1)).unwrap();
        assert_eq!(adapter.tree.children(root).unwrap(), vec![moved, adapter.lookup(NodeId(3)).unwrap()]);
        assert_eq!(adapter.tree.parent(moved), Some(root));
        assert_eq!(adapter.tree.parent(dropped), None);
    }

    #[test]
    fn test_unknown_node() {
        let mut adapter = TaffyLayoutAdapter::new();
        assert!(matches!(
            adapter.sync_styles(NodeId(7), &StyleMap::new()),
            Err(LayoutError::UnknownNode(NodeId(7)))
        ));
        assert!(adapter.get_layout(NodeId(7)).is_none());
        adapter.destroy_node(NodeId(7)).unwrap();
    }
}
