//! Binary wire format
//!
//! All integers little-endian.
//!
//! ```text
//! u32 count
//! count × {
//!     u8  op
//!     i32 node id
//!     u8  mask
//!     [bit0] u8  tag
//!     [bit1] i32 parent id
//!     [bit2] i32 sibling index
//!     [bit3] f32 x, f32 y, f32 width, f32 height
//!     [bit4] u16 len, UTF-8 "key=value" pairs joined by NUL
//!     [bit5] u16 len, UTF-8 text
//! }
//! ```

use lumen_dom::{NodeId, StyleMap, Tag};
use lumen_layout::LayoutRect;

use crate::{CodecError, RenderCommand, RenderCommandBuffer, RenderOp};

pub const HAS_TAG: u8 = 1 << 0;
pub const HAS_PARENT: u8 = 1 << 1;
pub const HAS_SIBLING_INDEX: u8 = 1 << 2;
pub const HAS_LAYOUT: u8 = 1 << 3;
pub const HAS_STYLES: u8 = 1 << 4;
pub const HAS_TEXT: u8 = 1 << 5;

const STYLE_SEPARATOR: char = '\0';

/// Write u16 little-endian
fn write_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_f32(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write u16-length-prefixed bytes
fn write_short_bytes(buf: &mut Vec<u8>, field: &'static str, data: &[u8]) -> Result<(), CodecError> {
    write_u16(buf, short_len(field, data.len())?);
    buf.extend_from_slice(data);
    Ok(())
}

fn join_styles(styles: &StyleMap) -> Result<String, CodecError> {
    let mut out = String::new();
    for (i, (key, value)) in styles.iter().enumerate() {
        if key.contains(['=', STYLE_SEPARATOR]) || value.contains(STYLE_SEPARATOR) {
            return Err(CodecError::MalformedStyle(format!("{key}={value}")));
        }
        if i > 0 {
            out.push(STYLE_SEPARATOR);
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    Ok(out)
}

fn short_len(field: &'static str, len: usize) -> Result<u16, CodecError> {
    u16::try_from(len).map_err(|_| CodecError::TooLong { field, len })
}

/// Check that `command` fits the wire format: style keys free of `=` and
/// NUL, values free of NUL, and string payloads within a u16 length.
pub fn check(command: &RenderCommand) -> Result<(), CodecError> {
    if let Some(styles) = command.styles.as_ref().filter(|s| !s.is_empty()) {
        short_len("styles", join_styles(styles)?.len())?;
    }
    if let Some(text) = &command.text {
        short_len("text", text.len())?;
    }
    Ok(())
}

fn split_styles(joined: &str) -> Result<StyleMap, CodecError> {
    joined
        .split(STYLE_SEPARATOR)
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| CodecError::MalformedStyle(pair.to_string()))
        })
        .collect()
}

fn mask_of(command: &RenderCommand) -> u8 {
    let mut mask = 0;
    if command.tag.is_some() {
        mask |= HAS_TAG;
    }
    if command.parent_id.is_some() {
        mask |= HAS_PARENT;
    }
    if command.sibling_index.is_some() {
        mask |= HAS_SIBLING_INDEX;
    }
    if command.layout.is_some() {
        mask |= HAS_LAYOUT;
    }
    if command.styles.as_ref().is_some_and(|s| !s.is_empty()) {
        mask |= HAS_STYLES;
    }
    if command.text.is_some() {
        mask |= HAS_TEXT;
    }
    mask
}

/// Encode a buffer
pub fn encode(buffer: &RenderCommandBuffer) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(4 + buffer.len() * 16);
    write_u32(&mut buf, buffer.len() as u32);

    for command in buffer {
        let mask = mask_of(command);
        buf.push(command.op as u8);
        write_i32(&mut buf, command.node_id.as_wire());
        buf.push(mask);

        if let Some(tag) = command.tag {
            buf.push(tag.as_u8());
        }
        if let Some(parent) = command.parent_id {
            write_i32(&mut buf, parent.as_wire());
        }
        if let Some(index) = command.sibling_index {
            write_i32(&mut buf, index);
        }
        if let Some(rect) = command.layout {
            for v in [rect.x, rect.y, rect.width, rect.height] {
                write_f32(&mut buf, v);
            }
        }
        if mask & HAS_STYLES != 0 {
            if let Some(styles) = &command.styles {
                write_short_bytes(&mut buf, "styles", join_styles(styles)?.as_bytes())?;
            }
        }
        if let Some(text) = &command.text {
            write_short_bytes(&mut buf, "text", text.as_bytes())?;
        }
    }

    Ok(buf)
}

/// Cursor over an input slice
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.buf.len()).ok_or(
            CodecError::BufferTooShort {
                offset: self.pos,
                needed: n,
            },
        )?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i32(&mut self) -> Result<i32, CodecError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    fn short_str(&mut self, field: &'static str) -> Result<&'a str, CodecError> {
        let len = self.u16()? as usize;
        std::str::from_utf8(self.take(len)?).map_err(|_| CodecError::InvalidUtf8(field))
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

/// Decode a buffer produced by [`encode`]
pub fn decode(bytes: &[u8]) -> Result<RenderCommandBuffer, CodecError> {
    let mut reader = Reader { buf: bytes, pos: 0 };
    let count = reader.u32()? as usize;
    // Each command is at least 6 bytes; don't trust the header for capacity
    let mut commands = Vec::with_capacity(count.min(reader.remaining() / 6));

    for _ in 0..count {
        let op_byte = reader.u8()?;
        let op = RenderOp::from_u8(op_byte).ok_or(CodecError::UnknownOp(op_byte))?;
        let node_id = NodeId::from_wire(reader.i32()?);
        let mask = reader.u8()?;

        let tag = if mask & HAS_TAG != 0 {
            let byte = reader.u8()?;
            Some(Tag::from_u8(byte).ok_or(CodecError::UnknownTag(byte))?)
        } else {
            None
        };
        let parent_id = if mask & HAS_PARENT != 0 {
            Some(NodeId::from_wire(reader.i32()?))
        } else {
            None
        };
        let sibling_index = if mask & HAS_SIBLING_INDEX != 0 {
            Some(reader.i32()?)
        } else {
            None
        };
        let layout = if mask & HAS_LAYOUT != 0 {
            Some(LayoutRect {
                x: reader.f32()?,
                y: reader.f32()?,
                width: reader.f32()?,
                height: reader.f32()?,
            })
        } else {
            None
        };
        let styles = if mask & HAS_STYLES != 0 {
            Some(split_styles(reader.short_str("styles")?)?)
        } else {
            None
        };
        let text = if mask & HAS_TEXT != 0 {
            Some(reader.short_str("text")?.to_string())
        } else {
            None
        };

        commands.push(RenderCommand {
            op,
            node_id,
            tag,
            parent_id,
            sibling_index,
            layout,
            styles,
            text,
        });
    }

    if reader.remaining() != 0 {
        return Err(CodecError::TrailingBytes(reader.remaining()));
    }
    Ok(RenderCommandBuffer::from(commands))
}
