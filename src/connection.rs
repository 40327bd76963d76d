//! Lifecycle glue between a bridge and the content it hosts.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::bridge::{Bridge, Subscription};
use crate::render::RenderEvent;

/// Content that consumes render notifications and may report values back
/// through the bridge it is handed.
pub trait HostedComponent: Send + 'static {
    fn render(&mut self, event: &RenderEvent, bridge: &Bridge);
}

/// Connect `component` to `bridge`.
///
/// Subscribes the component to render events, then announces readiness.
/// After each render the frame height is re-measured and reported, so the
/// host frame follows the content. Dropping the returned subscription
/// disconnects the component.
pub fn connect<C: HostedComponent>(bridge: &Bridge, component: C) -> Subscription {
    let component = Arc::new(Mutex::new(component));
    let weak = bridge.downgrade();
    let subscription = bridge.on_render(move |event| {
        let Some(bridge) = weak.upgrade() else {
            return;
        };
        component.lock().render(event, &bridge);
        bridge.report_height(None);
    });
    bridge.ensure_ready();
    subscription
}
