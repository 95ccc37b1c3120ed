//! Style Cascade
//!
//! Computes the declared values for one node by:
//! 1. Matching each rule's selector list against the node
//! 2. Sorting matches by specificity, then source order
//! 3. Applying declarations in that order, inline styles last

use lumen_dom::{NodeId, NodeStore, VirtualNode};

use crate::{expand_declaration, CssRule, Declarations, Specificity};

/// Cascade resolver
#[derive(Debug, Default, Clone, Copy)]
pub struct CascadeResolver;

impl CascadeResolver {
    pub fn new() -> Self {
        Self
    }

    /// Rules matching `node`, in ascending cascade order
    pub fn matching_rules<'a>(
        &self,
        rules: &'a [CssRule],
        store: &NodeStore,
        node: NodeId,
    ) -> Vec<(&'a CssRule, Specificity)> {
        let mut matches: Vec<(&CssRule, Specificity)> = rules
            .iter()
            .filter_map(|rule| {
                let list = rule.selector_list().ok()?;
                list.match_specificity(store, node).map(|s| (rule, s))
            })
            .collect();

        matches.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.source_order.cmp(&b.0.source_order)));
        matches
    }

    /// Cascaded declarations for `node`
    pub fn cascade(&self, rules: &[CssRule], store: &NodeStore, node: NodeId) -> Declarations {
        let mut declared = Declarations::new();
        for (rule, _) in self.matching_rules(rules, store, node) {
            for (property, value) in &rule.declarations {
                declared.insert(*property, value.clone());
            }
        }

        if let Some(vnode) = store.get(node) {
            apply_inline(vnode, &mut declared);
        }
        declared
    }
}

fn apply_inline(node: &VirtualNode, declared: &mut Declarations) {
    // Declaration order: a later shorthand overrides an earlier longhand
    for (name, value) in node.inline_style().iter() {
        declared.extend(expand_declaration(name, value));
    }
}
