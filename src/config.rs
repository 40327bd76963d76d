use serde::{Deserialize, Serialize};

#[cfg(feature = "config")]
use crate::error::BridgeError;
#[cfg(feature = "config")]
use std::path::Path;

/// Host -> component default cap.
pub const MAX_FROM_HOST: usize = 64 * 1_048_576; // 64 MB
/// Component -> host default cap.
pub const MAX_TO_HOST: usize = 1_048_576; // 1 MB

/// Tunables for a [`crate::Bridge`] and its transport.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// target_origin = "https://host.example"
/// resend_ready = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Sent as `apiVersion` in the readiness handshake.
    pub api_version: u32,
    /// Origin passed to the port on every outbound message.
    pub target_origin: String,
    /// Drop inbound envelopes that do not carry the provenance marker.
    pub require_provenance: bool,
    /// Re-send `componentReady` on every `ensure_ready` call, not only the first.
    pub resend_ready: bool,
    /// Height used by `report_height(None)` when no content extent is configured.
    pub fallback_height: f64,
    pub max_outbound_bytes: usize,
    pub max_inbound_bytes: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_version: 1,
            target_origin: "*".to_string(),
            require_provenance: true,
            resend_ready: true,
            fallback_height: 0.0,
            max_outbound_bytes: MAX_TO_HOST,
            max_inbound_bytes: MAX_FROM_HOST,
        }
    }
}

#[cfg(feature = "config")]
impl BridgeConfig {
    /// Parse a (possibly partial) TOML document on top of the defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, BridgeError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
