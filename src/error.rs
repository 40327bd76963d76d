use std::io;
use thiserror::Error;

/// Errors raised by the transport, framing and configuration layers.
///
/// Protocol operations on [`crate::Bridge`] never return these: transmission
/// failures are logged and swallowed, malformed inbound envelopes are dropped.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The host end of the channel is gone (EOF on read, or the writer was closed).
    #[error("host endpoint disconnected")]
    Disconnected,

    /// A frame exceeded the configured size cap.
    #[error("frame of {len} bytes exceeds limit of {limit} bytes")]
    FrameTooLarge { len: usize, limit: usize },

    /// A frame body was not valid UTF-8.
    #[error("frame body is not valid UTF-8")]
    InvalidUtf8,

    /// A tokio-backed port was constructed outside a runtime.
    #[error("no tokio runtime available to drive the port")]
    NoRuntime,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "config")]
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}
