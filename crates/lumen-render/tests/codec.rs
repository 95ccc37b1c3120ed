//! Binary and JSON codecs over every render op

use lumen_dom::{NodeId, StyleMap, Tag};
use lumen_layout::LayoutRect;
use lumen_render::{RenderCommand, RenderCommandBuffer, RenderOp};

fn sample() -> RenderCommandBuffer {
    let styles = StyleMap::from([
        ("background-color".to_string(), "red".to_string()),
        ("margin-top".to_string(), "4px".to_string()),
    ]);
    RenderCommandBuffer::from(vec![
        RenderCommand::create(NodeId(1), Tag::Section, Some(NodeId(0)), Some(0)),
        RenderCommand::destroy(NodeId(7)),
        RenderCommand::update_layout(NodeId(1), LayoutRect::new(1.5, -2.0, 300.0, 40.25)),
        RenderCommand::update_style(NodeId(1), styles),
        RenderCommand::update_text(NodeId(4), Some("héllo wörld".to_string())),
        RenderCommand::reparent(NodeId(4), NodeId(1), 3),
    ])
}

#[test]
fn test_binary_roundtrip_each_op() {
    let buffer = sample();
    let bytes = buffer.to_bytes().unwrap();
    let decoded = RenderCommandBuffer::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, buffer);

    let ops: Vec<_> = decoded.iter().map(|c| c.op).collect();
    assert_eq!(
        ops,
        vec![
            RenderOp::Create,
            RenderOp::Destroy,
            RenderOp::UpdateLayout,
            RenderOp::UpdateStyle,
            RenderOp::UpdateText,
            RenderOp::Reparent,
        ]
    );
}

#[test]
fn test_json_roundtrip() {
    let buffer = sample();
    let json = buffer.to_json().unwrap();
    assert_eq!(RenderCommandBuffer::from_json(&json).unwrap(), buffer);
}

#[test]
fn test_empty_buffer() {
    let empty = RenderCommandBuffer::new();
    let bytes = empty.to_bytes().unwrap();
    assert_eq!(bytes.len(), 4);
    assert!(RenderCommandBuffer::from_bytes(&bytes).unwrap().is_empty());
    assert_eq!(empty.to_json().unwrap(), "[]");
}

#[test]
fn test_truncated_input_is_an_error() {
    let bytes = sample().to_bytes().unwrap();
    for cut in [5, 12, bytes.len() - 1] {
        assert!(RenderCommandBuffer::from_bytes(&bytes[..cut]).is_err(), "cut at {cut}");
    }
}

#[test]
fn test_buffer_queries() {
    let buffer = sample();
    assert_eq!(buffer.count_op(RenderOp::UpdateStyle), 1);
    assert_eq!(buffer.for_node(NodeId(1)).count(), 3);
}
