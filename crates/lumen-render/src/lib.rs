//! Lumen Render - command model and wire codecs
//!
//! A [`RenderCommandBuffer`] is the per-tick output of the reconciler. It is
//! consumed by a native backend through the compact binary format in
//! [`binary`], or inspected as JSON through [`json`].

pub mod binary;
pub mod json;

use lumen_dom::{NodeId, StyleMap, Tag};
use lumen_layout::LayoutRect;
use serde::{Deserialize, Serialize};

pub use binary::{decode, encode};

/// Render operation, discriminant is the wire byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RenderOp {
    Create = 0,
    Destroy = 1,
    UpdateLayout = 2,
    UpdateStyle = 3,
    UpdateText = 4,
    Reparent = 5,
}

impl RenderOp {
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => RenderOp::Create,
            1 => RenderOp::Destroy,
            2 => RenderOp::UpdateLayout,
            3 => RenderOp::UpdateStyle,
            4 => RenderOp::UpdateText,
            5 => RenderOp::Reparent,
            _ => return None,
        })
    }
}

/// One command for the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCommand {
    pub op: RenderOp,
    pub node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sibling_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutRect>,
    /// Changed or added entries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RenderCommand {
    fn bare(op: RenderOp, node_id: NodeId) -> Self {
        Self {
            op,
            node_id,
            tag: None,
            parent_id: None,
            sibling_index: None,
            layout: None,
            styles: None,
            text: None,
        }
    }

    pub fn create(node_id: NodeId, tag: Tag, parent_id: Option<NodeId>, sibling_index: Option<usize>) -> Self {
        Self {
            tag: Some(tag),
            parent_id,
            sibling_index: sibling_index.map(|i| i as i32),
            ..Self::bare(RenderOp::Create, node_id)
        }
    }

    pub fn destroy(node_id: NodeId) -> Self {
        Self::bare(RenderOp::Destroy, node_id)
    }

    pub fn reparent(node_id: NodeId, parent_id: NodeId, sibling_index: usize) -> Self {
        Self {
            parent_id: Some(parent_id),
            sibling_index: Some(sibling_index as i32),
            ..Self::bare(RenderOp::Reparent, node_id)
        }
    }

    pub fn update_style(node_id: NodeId, styles: StyleMap) -> Self {
        Self {
            styles: Some(styles),
            ..Self::bare(RenderOp::UpdateStyle, node_id)
        }
    }

    pub fn update_text(node_id: NodeId, text: Option<String>) -> Self {
        Self {
            text,
            ..Self::bare(RenderOp::UpdateText, node_id)
        }
    }

    pub fn update_layout(node_id: NodeId, layout: LayoutRect) -> Self {
        Self {
            layout: Some(layout),
            ..Self::bare(RenderOp::UpdateLayout, node_id)
        }
    }

    /// Whether the command can be written with the binary codec
    pub fn check_wire(&self) -> Result<(), CodecError> {
        binary::check(self)
    }
}

/// Ordered, append-only command sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderCommandBuffer {
    commands: Vec<RenderCommand>,
}

impl RenderCommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: RenderCommand) {
        tracing::trace!(op = ?command.op, node = %command.node_id, "emit");
        self.commands.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = RenderCommand>) {
        for command in commands {
            self.push(command);
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderCommand> {
        self.commands.iter()
    }

    /// Commands addressed to `id`, in order
    pub fn for_node(&self, id: NodeId) -> impl Iterator<Item = &RenderCommand> {
        self.commands.iter().filter(move |c| c.node_id == id)
    }

    pub fn count_op(&self, op: RenderOp) -> usize {
        self.commands.iter().filter(|c| c.op == op).count()
    }

    pub fn into_commands(self) -> Vec<RenderCommand> {
        self.commands
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        binary::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        binary::decode(bytes)
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        json::encode(self)
    }

    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        json::decode(text)
    }
}

impl From<Vec<RenderCommand>> for RenderCommandBuffer {
    fn from(commands: Vec<RenderCommand>) -> Self {
        Self { commands }
    }
}

impl<'a> IntoIterator for &'a RenderCommandBuffer {
    type Item = &'a RenderCommand;
    type IntoIter = std::slice::Iter<'a, RenderCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Codec error
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("buffer too short: needed {needed} bytes at offset {offset}")]
    BufferTooShort { offset: usize, needed: usize },
    #[error("unknown render op {0}")]
    UnknownOp(u8),
    #[error("unknown tag byte {0}")]
    UnknownTag(u8),
    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),
    #[error("malformed style entry: {0:?}")]
    MalformedStyle(String),
    #[error("{field} is {len} bytes, more than the u16 length prefix allows")]
    TooLong { field: &'static str, len: usize },
    #[error("{0} trailing bytes after the last command")]
    TrailingBytes(usize),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
