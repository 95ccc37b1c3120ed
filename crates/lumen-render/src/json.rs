//! JSON codec for diagnostics
//!
//! The buffer serializes as a plain array of commands with camelCase keys;
//! absent optional fields are omitted.

use crate::{CodecError, RenderCommandBuffer};

pub fn encode(buffer: &RenderCommandBuffer) -> Result<String, CodecError> {
    Ok(serde_json::to_string(buffer)?)
}

pub fn encode_pretty(buffer: &RenderCommandBuffer) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(buffer)?)
}

pub fn decode(text: &str) -> Result<RenderCommandBuffer, CodecError> {
    Ok(serde_json::from_str(text)?)
}
