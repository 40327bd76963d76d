//! Minimal hosted component over stdio.
//!
//! Echoes the `molecule` render argument back as the component value and
//! uses the `height` argument as the frame height. Logs go to stderr
//! (`RUST_LOG=debug` for protocol detail); stdout carries frames only.

use component_bridge::host::FramedPort;
use component_bridge::{connect, Bridge, BridgeConfig, BridgeError, HostedComponent, RenderEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Echo {
    height: Arc<AtomicU64>,
    last: Option<String>,
}

impl HostedComponent for Echo {
    fn render(&mut self, event: &RenderEvent, bridge: &Bridge) {
        if let Some(h) = event.arg("height").and_then(|v| v.as_f64()) {
            self.height.store(h.to_bits(), Ordering::Relaxed);
        }
        if event.disabled {
            return;
        }
        let molecule = event.arg("molecule").and_then(|v| v.as_str());
        if let Some(m) = molecule {
            if self.last.as_deref() != Some(m) {
                info!(molecule = m, "echoing value");
                bridge.report_value(m);
                self.last = Some(m.to_string());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), BridgeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::var_os("COMPONENT_BRIDGE_CONFIG") {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };

    let height = Arc::new(AtomicU64::new(config.fallback_height.to_bits()));
    let extent = {
        let height = Arc::clone(&height);
        move || f64::from_bits(height.load(Ordering::Relaxed))
    };

    let port = Arc::new(FramedPort::stdio(&config)?);
    let bridge = Bridge::builder(Arc::clone(&port))
        .config(config)
        .content_extent(extent)
        .build();

    let _conn = connect(
        &bridge,
        Echo {
            height,
            last: None,
        },
    );
    info!("component ready; waiting for host");

    port.closed().await;
    info!("host disconnected");
    port.close().await
}
