//! # component_bridge
//!
//! The component side of a **host-embedding bridge**: the protocol that lets a
//! component running inside a sandboxed frame talk to the application that
//! embeds it.
//!
//! - Announce readiness with a handshake the host waits for
//! - Receive **render** notifications (`args`, `disabled`, `theme`)
//! - Report a **value** back (binary or JSON) and negotiate the **frame height**
//!
//! The channel is one-way-trusted and asynchronous: no shared memory, no
//! acknowledgements, and no ordering guarantee across message kinds.
//!
//! ---
//!
//! ## The wire protocol
//!
//! Every message is a flat JSON object with a `type` tag. Outbound messages
//! also carry the provenance marker `"isStreamlitMessage": true`.
//!
//! | direction        | `type`                         | fields                               |
//! |------------------|--------------------------------|--------------------------------------|
//! | component → host | `streamlit:componentReady`     | `apiVersion: 1`                      |
//! | component → host | `streamlit:setComponentValue`  | `value`, `dataType: "bytes"\|"json"` |
//! | component → host | `streamlit:setFrameHeight`     | `height`                             |
//! | host → component | `streamlit:render`             | `args`, `disabled?`, `theme?`        |
//!
//! ### Most important gotchas (read this first)
//!
//! - **Nothing renders before the handshake:** the host withholds `render` until it
//!   sees `componentReady`. Call [`Bridge::ensure_ready`] (or [`connect`]) once the
//!   component is mounted.
//! - **Unknown messages are not errors:** envelopes without the provenance marker
//!   or with an unknown `type` are dropped silently.
//! - **Heights are memoized:** [`Bridge::report_height`] only transmits when the
//!   height changes, so calling it on every layout change is fine.
//! - **Never log to stdout** when using [`host::FramedPort::stdio`]: stdout carries frames.
//!
//! ---
//!
//! ## Crate layout
//!
//! - [`bridge`] — the [`Bridge`] handle: readiness gate, inbound dispatch, value and height reporting.
//! - [`envelope`] — typed envelopes and the provenance check.
//! - [`render`] — render decoding into [`RenderEvent`].
//! - [`value`] — [`ComponentValue`] and typed-array flattening.
//! - [`theme`] — host theme and the observable applied-style state.
//! - [`port`] — the [`HostPort`] trait, [`MemoryPort`] and [`NullPort`].
//! - [`host`] — length-prefixed framing and the tokio-backed `FramedPort`.
//! - [`connection`] — [`connect`] a [`HostedComponent`] to a bridge.
//! - [`config`] — [`BridgeConfig`].
//!
//! ---
//!
//! ## Quick start: a hosted component
//!
//! ```rust
//! use component_bridge::{connect, Bridge, HostedComponent, MemoryPort, RenderEvent};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct Editor;
//!
//! impl HostedComponent for Editor {
//!     fn render(&mut self, event: &RenderEvent, bridge: &Bridge) {
//!         if let Some(molecule) = event.arg("molecule").and_then(|v| v.as_str()) {
//!             bridge.report_value(molecule);
//!         }
//!     }
//! }
//!
//! let port = Arc::new(MemoryPort::new());
//! let bridge = Bridge::builder(port.clone())
//!     .content_extent(|| 480.0)
//!     .build();
//! let _conn = connect(&bridge, Editor);
//!
//! // play the host
//! port.deliver(json!({
//!     "isStreamlitMessage": true,
//!     "type": "streamlit:render",
//!     "args": {"molecule": "CCO"},
//! }));
//!
//! let sent = port.take_posted();
//! assert_eq!(sent[0]["type"], "streamlit:componentReady");
//! assert_eq!(sent[1]["value"], "CCO");
//! assert_eq!(sent[2]["height"], 480.0);
//! ```
//!
//! ---
//!
//! ## Over stdio
//!
//! With the `stdio` feature, [`host::FramedPort`] carries envelopes as
//! 4-byte native-endian length-prefixed JSON frames over any `Read`/`Write`
//! pair, stdin/stdout by default.
//!
//! ```no_run
//! use component_bridge::{host::FramedPort, Bridge, BridgeConfig, BridgeError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BridgeError> {
//!     let config = BridgeConfig::default();
//!     let port = std::sync::Arc::new(FramedPort::stdio(&config)?);
//!     let bridge = Bridge::builder(port.clone()).config(config).build();
//!
//!     let _sub = bridge.on_render(|event| eprintln!("render: {:?}", event.args));
//!     bridge.ensure_ready();
//!
//!     port.closed().await; // host disconnected
//!     port.close().await
//! }
//! ```
//!
//! ---
//!
//! ## Pure framing (runnable example)
//!
//! ```rust
//! use component_bridge::host::{decode_frame, encode_frame};
//! use component_bridge::config::{MAX_FROM_HOST, MAX_TO_HOST};
//! use serde_json::json;
//! use std::io::Cursor;
//!
//! let msg = json!({"type": "streamlit:setFrameHeight", "height": 320});
//! let frame = encode_frame(&msg, MAX_TO_HOST).unwrap();
//!
//! let mut cur = Cursor::new(frame);
//! let raw = decode_frame(&mut cur, MAX_FROM_HOST).unwrap();
//! let back: serde_json::Value = serde_json::from_str(&raw).unwrap();
//! assert_eq!(back, msg);
//! ```

pub mod bridge;
pub mod config;
pub mod connection;
pub mod envelope;
pub mod error;
pub mod host;
pub mod port;
pub mod render;
pub mod theme;
pub mod value;

#[doc(inline)]
pub use bridge::{Bridge, BridgeBuilder, ContentExtent, Subscription, WeakBridge};
#[doc(inline)]
pub use config::BridgeConfig;
#[doc(inline)]
pub use connection::{connect, HostedComponent};
#[doc(inline)]
pub use envelope::{ComponentMessage, DataType};
#[doc(inline)]
pub use error::BridgeError;
#[doc(inline)]
pub use port::{HostPort, MemoryPort, NullPort};
#[doc(inline)]
pub use render::RenderEvent;
#[doc(inline)]
pub use theme::{AppliedTheme, Theme};
#[doc(inline)]
pub use value::ComponentValue;
