//! CSS Parser using lightningcss
//!
//! Converts style rules into [`CssRule`]s. Only top-level style rules are
//! kept; at-rules are skipped.

use lightningcss::declaration::DeclarationBlock;
use lightningcss::properties::Property;
use lightningcss::rules::CssRule as LightningRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;

use crate::{expand_declaration, CssError, CssRule, Declarations, Stylesheet};

/// CSS Parser
#[derive(Debug, Default)]
pub struct CssParser {
    /// Source order assigned to the first rule parsed
    first_order: usize,
}

impl CssParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start numbering rules at `order`
    pub fn with_source_order(order: usize) -> Self {
        Self { first_order: order }
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<Stylesheet, CssError> {
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };

        let sheet = StyleSheet::parse(css, options).map_err(|e| CssError::Parse {
            message: e.to_string(),
        })?;

        let mut result = Stylesheet::new();
        let mut order = self.first_order;
        for rule in sheet.rules.0.iter() {
            match rule {
                LightningRule::Style(style) => {
                    let selector = style
                        .selectors
                        .to_css_string(PrinterOptions::default())
                        .map_err(|e| CssError::Printer { message: e.to_string() })?;
                    let declarations = convert_declarations(&style.declarations)?;
                    result.rules.push(CssRule::new(selector, declarations, order));
                    order += 1;
                }
                other => {
                    tracing::debug!(rule = ?std::mem::discriminant(other), "skipping non-style rule");
                }
            }
        }

        tracing::debug!(rules = result.rules.len(), "parsed stylesheet");
        Ok(result)
    }
}

fn convert_declarations(block: &DeclarationBlock<'_>) -> Result<Declarations, CssError> {
    let mut out = Declarations::new();
    // Important declarations are applied last so they win within the rule
    for property in block.declarations.iter().chain(block.important_declarations.iter()) {
        let (name, value) = property_text(property)?;
        let expanded = expand_declaration(&name, &value);
        if expanded.is_empty() {
            tracing::trace!(property = %name, "dropping unsupported declaration");
        }
        out.extend(expanded);
    }
    Ok(out)
}

fn property_text(property: &Property<'_>) -> Result<(String, String), CssError> {
    let name = property.property_id().name().to_string();
    let value = property
        .value_to_css_string(PrinterOptions::default())
        .map_err(|e| CssError::Printer { message: e.to_string() })?;
    Ok((name, value))
}
