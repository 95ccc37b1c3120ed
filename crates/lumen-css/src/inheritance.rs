//! Style inheritance and initial values

use lumen_dom::StyleMap;

use crate::{Declarations, PropertyId, INHERITED_PROPERTIES, INITIAL_VALUES};

/// Keyword forcing the parent's value
pub const INHERIT: &str = "inherit";
/// Keyword forcing the initial value
pub const INITIAL: &str = "initial";

/// Turn cascaded declarations into a computed style map.
///
/// Inherited properties without an own value take the parent's computed
/// value; `inherit` works for any property. Remaining non-inherited
/// properties are filled from the initial-value table.
pub fn apply_inheritance(declared: Declarations, parent: Option<&StyleMap>) -> StyleMap {
    let parent_value = |id: PropertyId| parent.and_then(|p| p.get(id.name())).cloned();

    let explicit: Vec<PropertyId> = declared.keys().copied().collect();
    let mut computed = StyleMap::new();
    for (id, value) in declared {
        let resolved = if value.eq_ignore_ascii_case(INHERIT) {
            parent_value(id).or_else(|| id.initial_value().map(str::to_string))
        } else if value.eq_ignore_ascii_case(INITIAL) {
            id.initial_value().map(str::to_string)
        } else {
            Some(value)
        };
        if let Some(value) = resolved {
            computed.insert(id.name().to_string(), value);
        }
    }

    for id in INHERITED_PROPERTIES {
        if !explicit.contains(id) {
            if let Some(value) = parent_value(*id) {
                computed.insert(id.name().to_string(), value);
            }
        }
    }

    for (id, value) in INITIAL_VALUES {
        computed
            .entry(id.name().to_string())
            .or_insert_with(|| value.to_string());
    }

    computed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent() -> StyleMap {
        StyleMap::from([
            ("color".to_string(), "red".to_string()),
            ("font-size".to_string(), "20px".to_string()),
            ("width".to_string(), "100px".to_string()),
        ])
    }

    #[test]
    fn test_inherited_properties_copied() {
        let out = apply_inheritance(Declarations::new(), Some(&parent()));
        assert_eq!(out.get("color").map(String::as_str), Some("red"));
        assert_eq!(out.get("font-size").map(String::as_str), Some("20px"));
        // Not inherited: falls back to initial
        assert_eq!(out.get("width").map(String::as_str), Some("auto"));
    }

    #[test]
    fn test_own_value_wins() {
        let declared = Declarations::from([(PropertyId::Color, "blue".to_string())]);
        let out = apply_inheritance(declared, Some(&parent()));
        assert_eq!(out.get("color").map(String::as_str), Some("blue"));
    }

    #[test]
    fn test_initial_fill_without_parent() {
        let out = apply_inheritance(Declarations::new(), None);
        assert_eq!(out.get("display").map(String::as_str), Some("block"));
        assert_eq!(out.get("opacity").map(String::as_str), Some("1"));
        assert!(!out.contains_key("color"));
        assert_eq!(out.len(), INITIAL_VALUES.len());
    }

    #[test]
    fn test_keywords() {
        let declared = Declarations::from([
            (PropertyId::Width, "inherit".to_string()),
            (PropertyId::Color, "initial".to_string()),
        ]);
        let out = apply_inheritance(declared, Some(&parent()));
        assert_eq!(out.get("width").map(String::as_str), Some("100px"));
        // `initial` on a property without an initial value removes it
        assert!(!out.contains_key("color"));
    }
}
