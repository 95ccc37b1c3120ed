//! Lumen CSS - style resolution
//!
//! Stylesheet parsing (lightningcss), selector matching, cascade and
//! inheritance. Produces a computed style map per node.

mod parser;
mod cascade;
mod inheritance;
mod computed;
pub mod properties;
pub mod selectors;

use std::collections::BTreeMap;

use lumen_dom::DomError;

pub use parser::CssParser;
pub use cascade::CascadeResolver;
pub use inheritance::{apply_inheritance, INHERIT, INITIAL};
pub use computed::{ComputedStyleResolver, StyleEngine};
pub use properties::{expand_declaration, PropertyId, INHERITED_PROPERTIES, INITIAL_VALUES};
pub use selectors::{matches_selector, SelectorError, SelectorList};

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssError> {
    CssParser::new().parse(css)
}

/// Declarations keyed by longhand property
pub type Declarations = BTreeMap<PropertyId, String>;

/// Parsed stylesheet
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub rules: Vec<CssRule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(css: &str) -> Result<Self, CssError> {
        parse_stylesheet(css)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One style rule.
///
/// The selector is parsed once when the rule is built; a parse failure is
/// kept and the rule never matches.
#[derive(Debug, Clone)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Declarations,
    pub specificity: Specificity,
    pub source_order: usize,
    parsed: Result<SelectorList, SelectorError>,
}

impl CssRule {
    pub fn new(selector: impl Into<String>, declarations: Declarations, source_order: usize) -> Self {
        let selector = selector.into();
        let parsed = SelectorList::parse(&selector);
        let specificity = match &parsed {
            Ok(list) => list.max_specificity(),
            Err(err) => {
                tracing::warn!(selector = %selector, error = %err, "ignoring rule with unsupported selector");
                Specificity::default()
            }
        };
        Self {
            selector,
            declarations,
            specificity,
            source_order,
            parsed,
        }
    }

    /// Build a rule from `property: value` pairs, expanding shorthands.
    pub fn from_pairs<'a>(
        selector: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
        source_order: usize,
    ) -> Self {
        let mut declarations = Declarations::new();
        for (name, value) in pairs {
            declarations.extend(expand_declaration(name, value));
        }
        Self::new(selector, declarations, source_order)
    }

    pub fn selector_list(&self) -> Result<&SelectorList, &SelectorError> {
        self.parsed.as_ref()
    }
}

/// Selector specificity (a, b, c)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl std::ops::Add for Specificity {
    type Output = Specificity;

    fn add(self, rhs: Self) -> Self {
        Specificity(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl std::fmt::Display for Specificity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

/// Style resolution error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("parse error: {message}")]
    Parse { message: String },
    #[error("printer error: {message}")]
    Printer { message: String },
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Dom(#[from] DomError),
}
