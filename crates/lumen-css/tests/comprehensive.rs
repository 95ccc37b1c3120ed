//! Comprehensive tests for lumen-css
//!
//! Parsing edge cases and style computation through the public API.

use lumen_css::{CssParser, PropertyId, Specificity, StyleEngine, SelectorList};
use lumen_dom::{NodeId, NodeStore, PseudoState, Tag};

fn computed(store: &NodeStore, id: NodeId, property: &str) -> Option<String> {
    store.get(id)?.computed_style()?.get(property).cloned()
}

#[test]
fn test_parse_empty() {
    let stylesheet = CssParser::new().parse("").unwrap();
    assert_eq!(stylesheet.len(), 0);
}

#[test]
fn test_parse_multiple_rules() {
    let css = r#"
        .foo { color: red; }
        .bar { opacity: 0.5; }
        #baz { display: flex; }
    "#;
    let stylesheet = CssParser::new().parse(css).unwrap();
    assert_eq!(stylesheet.len(), 3);
    assert_eq!(stylesheet.rules[2].specificity, Specificity(1, 0, 0));
}

#[test]
fn test_parse_recovers_from_garbage() {
    let css = "p { color: red; width: ; } span { display: none }";
    let stylesheet = CssParser::new().parse(css).unwrap();
    assert!(stylesheet.rules.iter().any(|r| r.selector == "p"));
}

#[test]
fn test_selector_list_specificity_is_max_branch() {
    let sheet = CssParser::new().parse("h1, #title, .x.y { color: red }").unwrap();
    assert_eq!(sheet.rules[0].specificity, Specificity(1, 0, 0));
}

#[test]
fn test_specificity_ordering() {
    assert!(Specificity(0, 1, 0) > Specificity(0, 0, 5));
    assert!(Specificity(1, 0, 0) > Specificity(0, 9, 9));
    let list = SelectorList::parse("div > p.a:focus").unwrap();
    assert_eq!(list.max_specificity(), Specificity(0, 2, 2));
}

#[test]
fn test_cascade_class_beats_type_in_either_order() {
    for css in [
        "p { color: red } .note { color: green }",
        ".note { color: green } p { color: red }",
    ] {
        let mut store = NodeStore::new();
        let p = store.create_element(Tag::P);
        store.append_child(NodeId::ROOT, p).unwrap();
        store.set_attribute(p, "class", "note").unwrap();

        let mut engine = StyleEngine::new();
        engine.add_css(css).unwrap();
        engine.resolve(&mut store).unwrap();
        assert_eq!(computed(&store, p, "color").as_deref(), Some("green"), "{css}");
    }
}

#[test]
fn test_cascade_equal_specificity_later_wins() {
    let mut store = NodeStore::new();
    let p = store.create_element(Tag::P);
    store.append_child(NodeId::ROOT, p).unwrap();

    let mut engine = StyleEngine::new();
    engine.add_css("p { width: 10px }").unwrap();
    engine.add_css("p { width: 20px }").unwrap();
    engine.resolve(&mut store).unwrap();
    assert_eq!(computed(&store, p, "width").as_deref(), Some("20px"));
}

#[test]
fn test_pseudo_state_changes_resolution() {
    let mut store = NodeStore::new();
    let button = store.create_element(Tag::Button);
    store.append_child(NodeId::ROOT, button).unwrap();

    let mut engine = StyleEngine::new();
    engine.add_rule("button:hover", [("opacity", "0.5")]);
    engine.resolve(&mut store).unwrap();
    assert_eq!(computed(&store, button, "opacity").as_deref(), Some("1"));

    store.set_pseudo_state(button, PseudoState::HOVER, true).unwrap();
    engine.resolve(&mut store).unwrap();
    assert_eq!(computed(&store, button, "opacity").as_deref(), Some("0.5"));
}

#[test]
fn test_unsupported_selector_does_not_break_pipeline() {
    let mut store = NodeStore::new();
    let p = store.create_element(Tag::P);
    store.append_child(NodeId::ROOT, p).unwrap();

    let mut engine = StyleEngine::new();
    engine
        .add_css("p::after { color: red } p ~ p { color: red } p { height: 3px }")
        .unwrap();
    engine.resolve(&mut store).unwrap();
    assert_eq!(computed(&store, p, "height").as_deref(), Some("3px"));
    assert_eq!(computed(&store, p, "color"), None);
}

#[test]
fn test_inheritance_through_levels() {
    let mut store = NodeStore::new();
    let outer = store.create_element(Tag::Section);
    let inner = store.create_element(Tag::Div);
    let leaf = store.create_element(Tag::Span);
    store.append_child(NodeId::ROOT, outer).unwrap();
    store.append_child(outer, inner).unwrap();
    store.append_child(inner, leaf).unwrap();

    let mut engine = StyleEngine::new();
    engine.add_css("section { font-size: 18px; width: 50px } div { font-size: inherit; width: inherit }").unwrap();
    engine.resolve(&mut store).unwrap();

    assert_eq!(computed(&store, leaf, "font-size").as_deref(), Some("18px"));
    assert_eq!(computed(&store, inner, "width").as_deref(), Some("50px"));
    assert_eq!(computed(&store, leaf, "width").as_deref(), Some("auto"));
}

#[test]
fn test_property_ids_are_layout_tagged() {
    assert!(PropertyId::Width.affects_layout());
    assert!(!PropertyId::Color.affects_layout());
}
