//! Wire-visible request, response, and capability types.

use serde::{Deserialize, Serialize};

/// Shortest buffer the service will fingerprint.
pub const MIN_BUFFER_LEN: usize = 64;

/// Content-type label reported by the generic classifier path.
pub const MAGIC_FILEMAGIC: &str = "filemagic";
/// Fixed content-type label used in DNA mode.
pub const MAGIC_DNA: &str = "dna/iching";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct BufferRequest {
    #[serde(with = "serde_bytes")]
    pub buffer: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct BufferResponse {
    /// Order actually used for the projection.
    pub h_order: u32,
    /// Fingerprint identifier string.
    pub id: String,
    /// Content-type label.
    pub magic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssdeep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tlsh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdhash: Option<String>,
    /// Echoed from the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct ServiceCapabilities {
    pub acceleration: String,
    pub max_order: u32,
    pub magic: String,
    pub ssdeep: bool,
}
