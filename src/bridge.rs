use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::config::BridgeConfig;
use crate::envelope::{decode_envelope, encode_envelope, ComponentMessage, HostMessage};
use crate::port::HostPort;
use crate::render::{decode_render, RenderEvent};
use crate::theme::{AppliedTheme, Theme, ThemeCell};
use crate::value::ComponentValue;

/// Full rendered height of the hosted content, used when a height report
/// does not name one.
pub trait ContentExtent: Send + Sync {
    fn content_height(&self) -> f64;
}

impl<F> ContentExtent for F
where
    F: Fn() -> f64 + Send + Sync,
{
    fn content_height(&self) -> f64 {
        self()
    }
}

type RenderCallback = Arc<dyn Fn(&RenderEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, RenderCallback)>,
}

struct Inner {
    config: BridgeConfig,
    port: Box<dyn HostPort>,
    extent: Option<Box<dyn ContentExtent>>,
    inbound: OnceCell<()>,
    last_height: Mutex<Option<f64>>,
    renders: Mutex<Registry>,
    theme: ThemeCell,
}

impl Inner {
    fn send(&self, message: ComponentMessage) {
        let kind = message.kind();
        let envelope = match encode_envelope(&message) {
            Ok(v) => v,
            Err(e) => {
                debug!(kind, error = %e, "could not encode envelope; dropping");
                return;
            }
        };
        if let Err(e) = self.port.post_message(&envelope, &self.config.target_origin) {
            debug!(kind, error = %e, "host did not take message");
        }
    }

    fn dispatch(&self, raw: Value) {
        match decode_envelope(&raw, self.config.require_provenance) {
            Ok(HostMessage::Render(render)) => {
                let event = decode_render(render);
                // theme state must be current before anyone sees the event
                if let Some(theme) = &event.theme {
                    self.theme.apply(theme);
                }
                let callbacks: Vec<RenderCallback> = self
                    .renders
                    .lock()
                    .entries
                    .iter()
                    .map(|(_, cb)| Arc::clone(cb))
                    .collect();
                for cb in callbacks {
                    cb(&event);
                }
            }
            Err(reason) => trace!(?reason, "ignoring inbound message"),
        }
    }
}

/// Handle to the component side of the host bridge.
///
/// One bridge exists per embedded document. Clones share the same state:
/// the inbound subscription flag, the last reported height, render
/// subscribers and theme state.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<Inner>,
}

pub struct BridgeBuilder {
    port: Box<dyn HostPort>,
    config: BridgeConfig,
    extent: Option<Box<dyn ContentExtent>>,
}

impl BridgeBuilder {
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn content_extent(mut self, extent: impl ContentExtent + 'static) -> Self {
        self.extent = Some(Box::new(extent));
        self
    }

    pub fn build(self) -> Bridge {
        Bridge {
            inner: Arc::new(Inner {
                config: self.config,
                port: self.port,
                extent: self.extent,
                inbound: OnceCell::new(),
                last_height: Mutex::new(None),
                renders: Mutex::new(Registry::default()),
                theme: ThemeCell::new(),
            }),
        }
    }
}

impl Bridge {
    /// Bridge with default config and no content extent.
    pub fn new(port: impl HostPort + 'static) -> Self {
        Self::builder(port).build()
    }

    pub fn builder(port: impl HostPort + 'static) -> BridgeBuilder {
        BridgeBuilder {
            port: Box::new(port),
            config: BridgeConfig::default(),
            extent: None,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// A handle that does not keep the bridge alive; for callbacks the
    /// bridge itself stores.
    pub fn downgrade(&self) -> WeakBridge {
        WeakBridge {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Announce readiness to the host.
    ///
    /// The inbound listener is installed on the first call, before the
    /// handshake goes out, so a render sent in direct response cannot be
    /// missed. Later calls announce again (the host may ask after a remount)
    /// unless `resend_ready` is off.
    pub fn ensure_ready(&self) {
        let mut first = false;
        self.inner.inbound.get_or_init(|| {
            let weak = Arc::downgrade(&self.inner);
            self.inner.port.listen(Arc::new(move |raw: Value| {
                if let Some(inner) = weak.upgrade() {
                    inner.dispatch(raw);
                }
            }));
            debug!("inbound listener installed");
            first = true;
        });

        if first || self.inner.config.resend_ready {
            self.inner.send(ComponentMessage::ComponentReady {
                api_version: self.inner.config.api_version,
            });
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.inbound.get().is_some()
    }

    /// Register a render callback. It runs for every accepted render
    /// notification until the returned [`Subscription`] is dropped.
    pub fn on_render<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&RenderEvent) + Send + Sync + 'static,
    {
        let mut reg = self.inner.renders.lock();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.entries.push((id, Arc::new(callback)));
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Feed one raw host message through the inbound path, as the port
    /// listener does.
    pub fn handle_host_message(&self, raw: Value) {
        self.inner.dispatch(raw);
    }

    /// Send a new component value to the host.
    pub fn report_value(&self, value: impl Into<ComponentValue>) {
        let (value, data_type) = value.into().into_wire();
        self.inner
            .send(ComponentMessage::SetComponentValue { value, data_type });
    }

    /// Report the frame height; `None` measures the hosted content. Repeats
    /// of the last reported height are not sent, and NaN or infinite heights
    /// are dropped without touching the memo.
    pub fn report_height(&self, height: Option<f64>) {
        let height = height.unwrap_or_else(|| match &self.inner.extent {
            Some(extent) => extent.content_height(),
            None => self.inner.config.fallback_height,
        });
        if !height.is_finite() {
            warn!(height, "frame height is not a finite number; not reporting it");
            return;
        }

        let mut last = self.inner.last_height.lock();
        if *last == Some(height) {
            trace!(height, "frame height unchanged");
            return;
        }
        *last = Some(height);
        self.inner.send(ComponentMessage::SetFrameHeight { height });
    }

    pub fn last_reported_height(&self) -> Option<f64> {
        *self.inner.last_height.lock()
    }

    /// Replace the applied theme state.
    pub fn apply_theme(&self, theme: &Theme) {
        self.inner.theme.apply(theme);
    }

    /// The theme state currently applied, if any render carried one.
    pub fn theme(&self) -> Option<AppliedTheme> {
        self.inner.theme.current()
    }

    pub fn watch_theme(&self) -> watch::Receiver<Option<AppliedTheme>> {
        self.inner.theme.subscribe()
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.inner.config)
            .field("subscribed", &self.is_subscribed())
            .field("last_height", &self.last_reported_height())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct WeakBridge {
    inner: Weak<Inner>,
}

impl WeakBridge {
    pub fn upgrade(&self) -> Option<Bridge> {
        self.inner.upgrade().map(|inner| Bridge { inner })
    }
}

/// Keeps a render callback registered. Dropping it (or calling
/// [`cancel`](Subscription::cancel)) unregisters the callback.
#[must_use = "dropping a Subscription unregisters its callback"]
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    pub fn cancel(self) {}

    /// Keep the callback registered for the bridge's whole lifetime.
    pub fn detach(mut self) {
        self.inner = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .renders
                .lock()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
