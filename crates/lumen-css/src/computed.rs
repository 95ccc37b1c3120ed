//! Computed style resolution
//!
//! [`ComputedStyleResolver`] walks the whole tree pre-order so every node
//! sees its parent's final style. [`StyleEngine`] owns the rule set,
//! including rules contributed by `<style>` nodes.

use std::collections::HashMap;

use lumen_dom::{NodeId, NodeStore, StyleMap, Tag};

use crate::{apply_inheritance, CascadeResolver, CssError, CssParser, CssRule, Declarations, Stylesheet};

/// Whole-tree resolver
#[derive(Debug, Default, Clone, Copy)]
pub struct ComputedStyleResolver {
    cascade: CascadeResolver,
}

impl ComputedStyleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the style of one node given its parent's computed style
    pub fn compute(&self, rules: &[CssRule], store: &NodeStore, node: NodeId, parent: Option<&StyleMap>) -> StyleMap {
        let declared = match store.get(node) {
            Some(n) if !n.tag().is_text() => self.cascade.cascade(rules, store, node),
            _ => Declarations::new(),
        };
        apply_inheritance(declared, parent)
    }

    /// Resolve and store computed styles for every node reachable from the
    /// root. Returns the number of nodes resolved.
    pub fn resolve_tree(&self, rules: &[CssRule], store: &mut NodeStore) -> Result<usize, CssError> {
        let order = store.pre_order(store.root());
        for &id in &order {
            let parent_style = store
                .parent(id)
                .and_then(|p| store.get(p))
                .and_then(|p| p.computed_style())
                .cloned();
            let style = self.compute(rules, store, id, parent_style.as_ref());
            store.set_computed_style(id, style)?;
        }
        Ok(order.len())
    }
}

#[derive(Debug, Clone)]
struct StyleElementSheet {
    text: String,
    rules: Vec<CssRule>,
}

/// Rule set plus resolver
#[derive(Debug, Default)]
pub struct StyleEngine {
    author_rules: Vec<CssRule>,
    style_elements: HashMap<NodeId, StyleElementSheet>,
    /// Author and `<style>` rules merged in source order
    active: Vec<CssRule>,
    next_order: usize,
    resolver: ComputedStyleResolver,
}

impl StyleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-parsed stylesheet, renumbering its rules after
    /// everything added so far
    pub fn add_stylesheet(&mut self, sheet: Stylesheet) {
        for mut rule in sheet.rules {
            rule.source_order = self.bump_order();
            self.author_rules.push(rule);
        }
        self.rebuild_active();
    }

    /// Parse and append CSS text; returns the number of rules added
    pub fn add_css(&mut self, css: &str) -> Result<usize, CssError> {
        let sheet = CssParser::with_source_order(self.next_order).parse(css)?;
        let added = sheet.len();
        self.next_order += added;
        self.author_rules.extend(sheet.rules);
        self.rebuild_active();
        Ok(added)
    }

    /// Append a single rule from `property: value` pairs
    pub fn add_rule<'a>(&mut self, selector: &str, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        let order = self.bump_order();
        self.author_rules.push(CssRule::from_pairs(selector, pairs, order));
        self.rebuild_active();
    }

    pub fn rules(&self) -> &[CssRule] {
        &self.active
    }

    pub fn clear(&mut self) {
        self.author_rules.clear();
        self.style_elements.clear();
        self.active.clear();
    }

    /// Re-parse `<style>` nodes whose text changed and forget detached ones.
    /// Returns true if the active rule set changed.
    pub fn sync_style_elements(&mut self, store: &NodeStore) -> bool {
        let mut seen = Vec::new();
        let mut changed = false;

        for id in store.pre_order(store.root()) {
            let Some(node) = store.get(id) else { continue };
            if node.tag() != Tag::Style {
                continue;
            }
            seen.push(id);

            let text: String = node
                .children()
                .iter()
                .filter_map(|&c| store.get(c).and_then(|c| c.text()))
                .collect();
            if self.style_elements.get(&id).is_some_and(|s| s.text == text) {
                continue;
            }

            let rules = match CssParser::with_source_order(self.next_order).parse(&text) {
                Ok(sheet) => sheet.rules,
                Err(err) => {
                    tracing::warn!(node = %id, error = %err, "failed to parse <style> contents");
                    Vec::new()
                }
            };
            self.next_order += rules.len();
            self.style_elements.insert(id, StyleElementSheet { text, rules });
            changed = true;
        }

        let before = self.style_elements.len();
        self.style_elements.retain(|id, _| seen.contains(id));
        changed |= self.style_elements.len() != before;

        if changed {
            self.rebuild_active();
        }
        changed
    }

    /// Resolve computed styles over the whole tree
    pub fn resolve(&mut self, store: &mut NodeStore) -> Result<usize, CssError> {
        self.sync_style_elements(store);
        let count = self.resolver.resolve_tree(&self.active, store)?;
        tracing::debug!(nodes = count, rules = self.active.len(), "resolved styles");
        Ok(count)
    }

    fn bump_order(&mut self) -> usize {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    fn rebuild_active(&mut self) {
        self.active = self
            .author_rules
            .iter()
            .chain(self.style_elements.values().flat_map(|s| s.rules.iter()))
            .cloned()
            .collect();
        self.active.sort_by_key(|r| r.source_order);
    }
}
