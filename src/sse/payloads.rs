//! Frame payload deserialization structs
//!
//! The backend sends `{"type": ..., "message": ...}`. Deserializing into this
//! loose shape first lets unknown types be skipped instead of failing.

use serde::Deserialize;

/// Raw payload of a `data:` frame
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FramePayload {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub message: Option<String>,
}
