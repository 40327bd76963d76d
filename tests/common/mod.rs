#![allow(dead_code)]

use component_bridge::{Bridge, MemoryPort};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Records the level of every tracing event emitted while installed.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    levels: Arc<Mutex<Vec<Level>>>,
}

impl CaptureLayer {
    pub fn count(&self, level: Level) -> usize {
        self.levels
            .lock()
            .expect("levels mutex")
            .iter()
            .filter(|l| **l == level)
            .count()
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.levels
            .lock()
            .expect("levels mutex")
            .push(*event.metadata().level());
    }
}

/// Run `f` with a capturing subscriber installed on this thread.
pub fn capture_events<T>(f: impl FnOnce() -> T) -> (T, CaptureLayer) {
    let capture = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, capture)
}

/// A bridge over a fresh in-memory port, handshake already done and drained.
pub fn ready_bridge() -> (Bridge, Arc<MemoryPort>) {
    let port = Arc::new(MemoryPort::new());
    let bridge = Bridge::new(Arc::clone(&port));
    bridge.ensure_ready();
    port.take_posted();
    (bridge, port)
}

/// A render envelope as the host would post it.
pub fn render_msg(args: Value) -> Value {
    json!({
        "isStreamlitMessage": true,
        "type": "streamlit:render",
        "args": args,
    })
}

pub fn theme_json(base: &str, primary: &str, background: &str) -> Value {
    json!({
        "base": base,
        "primaryColor": primary,
        "backgroundColor": background,
        "secondaryBackgroundColor": "#f0f2f6",
        "textColor": "#31333f",
        "font": "sans serif",
    })
}
