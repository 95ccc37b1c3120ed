//! Flexbox layout through the adapter contract

use lumen_dom::{NodeId, StyleMap};
use lumen_layout::{LayoutAdapter, LayoutRect, TaffyLayoutAdapter};

fn style(pairs: &[(&str, &str)]) -> StyleMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn row_container() -> TaffyLayoutAdapter {
    let mut adapter = TaffyLayoutAdapter::new();
    for i in 0..3 {
        adapter.create_node(NodeId(i)).unwrap();
    }
    adapter
        .sync_styles(NodeId(0), &style(&[("display", "flex"), ("width", "200px"), ("height", "100px")]))
        .unwrap();
    adapter.sync_styles(NodeId(1), &style(&[("width", "50px")])).unwrap();
    adapter.sync_styles(NodeId(2), &style(&[("flex-grow", "1")])).unwrap();
    adapter.append_child(NodeId(0), NodeId(1)).unwrap();
    adapter.append_child(NodeId(0), NodeId(2)).unwrap();
    adapter
}

#[test]
fn test_flex_row_grow() {
    let mut adapter = row_container();
    adapter.compute_layout(NodeId(0), Some(800.0), Some(600.0)).unwrap();

    assert_eq!(adapter.get_layout(NodeId(0)), Some(LayoutRect::new(0.0, 0.0, 200.0, 100.0)));
    assert_eq!(adapter.get_layout(NodeId(1)), Some(LayoutRect::new(0.0, 0.0, 50.0, 100.0)));
    assert_eq!(adapter.get_layout(NodeId(2)), Some(LayoutRect::new(50.0, 0.0, 150.0, 100.0)));
}

#[test]
fn test_insert_child_reorders() {
    let mut adapter = row_container();
    // Move the growing child in front
    adapter.insert_child(NodeId(0), NodeId(2), 0).unwrap();
    adapter.compute_layout(NodeId(0), None, None).unwrap();

    assert_eq!(adapter.get_layout(NodeId(2)).unwrap().x, 0.0);
    assert_eq!(adapter.get_layout(NodeId(1)).unwrap().x, 150.0);
}

#[test]
fn test_column_with_padding_and_gap() {
    let mut adapter = row_container();
    adapter
        .sync_styles(
            NodeId(0),
            &style(&[
                ("display", "flex"),
                ("flex-direction", "column"),
                ("width", "200px"),
                ("padding-top", "10px"),
                ("row-gap", "5px"),
            ]),
        )
        .unwrap();
    adapter.sync_styles(NodeId(1), &style(&[("height", "20px")])).unwrap();
    adapter.sync_styles(NodeId(2), &style(&[("height", "30px")])).unwrap();
    adapter.compute_layout(NodeId(0), Some(800.0), None).unwrap();

    assert_eq!(adapter.get_layout(NodeId(1)).unwrap().y, 10.0);
    assert_eq!(adapter.get_layout(NodeId(2)).unwrap().y, 35.0);
    assert_eq!(adapter.get_layout(NodeId(0)).unwrap().height, 65.0);
}

#[test]
fn test_destroy_removes_from_parent() {
    let mut adapter = row_container();
    adapter.destroy_node(NodeId(1)).unwrap();
    assert!(!adapter.has_node(NodeId(1)));
    adapter.compute_layout(NodeId(0), None, None).unwrap();
    assert_eq!(adapter.get_layout(NodeId(2)).unwrap().width, 200.0);
}

#[test]
fn test_adapter_is_object_safe() {
    let mut boxed: Box<dyn LayoutAdapter> = Box::new(TaffyLayoutAdapter::new());
    boxed.create_node(NodeId(5)).unwrap();
    assert!(boxed.has_node(NodeId(5)));
}
