//! Selector parsing and matching
//!
//! Supported subset: type, universal, `.class`, `#id`, `[attr]` presence,
//! `:hover` / `:focus`, descendant (whitespace) and child (`>`) combinators,
//! comma-separated lists. Anything else is a [`SelectorError`], which the
//! cascade treats as a non-match.

use lumen_dom::{NodeId, NodeStore, PseudoState, VirtualNode};

use crate::Specificity;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),
    #[error("unsupported selector syntax: {0}")]
    Unsupported(String),
    #[error("combinator without a following compound selector")]
    DanglingCombinator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    Hover,
    Focus,
}

impl PseudoClass {
    fn state(self) -> PseudoState {
        match self {
            PseudoClass::Hover => PseudoState::HOVER,
            PseudoClass::Focus => PseudoState::FOCUS,
        }
    }
}

/// A sequence of simple selectors with no combinator, e.g. `div.card:hover`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<String>,
    pub pseudo_classes: Vec<PseudoClass>,
}

impl CompoundSelector {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.pseudo_classes.is_empty()
    }

    pub fn matches(&self, node: &VirtualNode) -> bool {
        // Selectors only match elements
        if node.tag().is_text() {
            return false;
        }
        if let Some(tag) = &self.tag {
            if tag != "*" && tag != node.tag().name() {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.element_id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.classes().any(|nc| nc == c)) {
            return false;
        }
        if !self.attributes.iter().all(|a| node.has_attribute(a)) {
            return false;
        }
        self.pseudo_classes
            .iter()
            .all(|p| node.pseudo_state().contains(p.state()))
    }

    fn specificity(&self) -> Specificity {
        let ids = u32::from(self.id.is_some());
        let classes = (self.classes.len() + self.attributes.len() + self.pseudo_classes.len()) as u32;
        let types = u32::from(self.tag.as_deref().is_some_and(|t| t != "*"));
        Specificity(ids, classes, types)
    }
}

/// One branch of a selector list: compounds joined by combinators, left to
/// right. `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

impl ComplexSelector {
    pub fn specificity(&self) -> Specificity {
        self.compounds
            .iter()
            .map(CompoundSelector::specificity)
            .fold(Specificity::default(), |acc, s| acc + s)
    }

    pub fn matches(&self, store: &NodeStore, node: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(store, node, n - 1),
        }
    }

    fn matches_at(&self, store: &NodeStore, node: NodeId, idx: usize) -> bool {
        let Some(current) = store.get(node) else {
            return false;
        };
        if !self.compounds[idx].matches(current) {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match self.combinators[idx - 1] {
            Combinator::Child => current
                .parent()
                .is_some_and(|p| self.matches_at(store, p, idx - 1)),
            Combinator::Descendant => {
                let mut ancestor = current.parent();
                while let Some(p) = ancestor {
                    if self.matches_at(store, p, idx - 1) {
                        return true;
                    }
                    ancestor = store.parent(p);
                }
                false
            }
        }
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub branches: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let mut branches = Vec::new();
        for part in text.split(',') {
            branches.push(parse_complex(part)?);
        }
        Ok(Self { branches })
    }

    /// Highest specificity among branches that match `node`
    pub fn match_specificity(&self, store: &NodeStore, node: NodeId) -> Option<Specificity> {
        self.branches
            .iter()
            .filter(|b| b.matches(store, node))
            .map(ComplexSelector::specificity)
            .max()
    }

    pub fn matches(&self, store: &NodeStore, node: NodeId) -> bool {
        self.branches.iter().any(|b| b.matches(store, node))
    }

    /// Highest specificity among all branches
    pub fn max_specificity(&self) -> Specificity {
        self.branches
            .iter()
            .map(ComplexSelector::specificity)
            .max()
            .unwrap_or_default()
    }
}

/// Parse and match in one step; a parse failure is returned to the caller.
pub fn matches_selector(text: &str, store: &NodeStore, node: NodeId) -> Result<bool, SelectorError> {
    Ok(SelectorList::parse(text)?.matches(store, node))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn parse_complex(text: &str) -> Result<ComplexSelector, SelectorError> {
    let chars: Vec<(usize, char)> = text.trim().char_indices().collect();
    if chars.is_empty() {
        return Err(SelectorError::Empty);
    }

    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut current = CompoundSelector::default();
    let mut pending: Option<Combinator> = None;
    let mut i = 0;

    let read_ident = |i: &mut usize| -> String {
        let start = *i;
        while *i < chars.len() && is_ident_char(chars[*i].1) {
            *i += 1;
        }
        chars[start..*i].iter().map(|(_, c)| *c).collect()
    };

    while i < chars.len() {
        let (offset, c) = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' | '>' => {
                let mut combinator = Combinator::Descendant;
                while i < chars.len() && matches!(chars[i].1, ' ' | '\t' | '\n' | '\r' | '>') {
                    if chars[i].1 == '>' {
                        if combinator == Combinator::Child {
                            return Err(SelectorError::UnexpectedChar('>', chars[i].0));
                        }
                        combinator = Combinator::Child;
                    }
                    i += 1;
                }
                if current.is_empty() {
                    return Err(SelectorError::UnexpectedChar(c, offset));
                }
                compounds.push(std::mem::take(&mut current));
                pending = Some(combinator);
            }
            '*' => {
                if current.tag.is_some() {
                    return Err(SelectorError::UnexpectedChar(c, offset));
                }
                current.tag = Some("*".to_string());
                i += 1;
            }
            '.' | '#' => {
                i += 1;
                let name = read_ident(&mut i);
                if name.is_empty() {
                    return Err(SelectorError::UnexpectedChar(c, offset));
                }
                if c == '.' {
                    current.classes.push(name);
                } else if current.id.is_some() {
                    return Err(SelectorError::Unsupported(format!("multiple ids in `{text}`")));
                } else {
                    current.id = Some(name);
                }
            }
            '[' => {
                i += 1;
                let name = read_ident(&mut i);
                match chars.get(i) {
                    Some((_, ']')) if !name.is_empty() => {
                        current.attributes.push(name.to_ascii_lowercase());
                        i += 1;
                    }
                    _ => {
                        return Err(SelectorError::Unsupported(format!(
                            "attribute selector in `{text}`"
                        )));
                    }
                }
            }
            ':' => {
                i += 1;
                if chars.get(i).is_some_and(|(_, c)| *c == ':') {
                    return Err(SelectorError::Unsupported("pseudo-element".to_string()));
                }
                let name = read_ident(&mut i).to_ascii_lowercase();
                let pseudo = match name.as_str() {
                    "hover" => PseudoClass::Hover,
                    "focus" => PseudoClass::Focus,
                    other => return Err(SelectorError::Unsupported(format!(":{other}"))),
                };
                current.pseudo_classes.push(pseudo);
            }
            c if is_ident_char(c) => {
                if current.tag.is_some() || !current.is_empty() {
                    return Err(SelectorError::UnexpectedChar(c, offset));
                }
                current.tag = Some(read_ident(&mut i).to_ascii_lowercase());
            }
            '+' | '~' => {
                return Err(SelectorError::Unsupported(format!("combinator `{c}`")));
            }
            _ => return Err(SelectorError::UnexpectedChar(c, offset)),
        }

        if let Some(combinator) = pending.take() {
            if i < chars.len() {
                combinators.push(combinator);
            } else {
                return Err(SelectorError::DanglingCombinator);
            }
        }
    }

    if current.is_empty() {
        return Err(SelectorError::DanglingCombinator);
    }
    compounds.push(current);
    Ok(ComplexSelector { compounds, combinators })
}
