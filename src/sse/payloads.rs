//! Wire payload deserialization structs

use serde::Deserialize;

/// The JSON object carried after `data: ` on every frame line
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireFrame {
    /// One of `chunk`, `json`, `done`, `error`
    #[serde(rename = "type")]
    pub kind: String,
    /// Text payload; `done` frames usually send an empty string
    #[serde(default)]
    pub data: Option<String>,
}
