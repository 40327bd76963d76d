//! The cross-boundary message primitive the bridge talks through.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use crate::error::BridgeError;

/// Receives every message the host posts to this component.
pub type InboundListener = Arc<dyn Fn(Value) + Send + Sync>;

/// A host endpoint: one inbound listener, fire-and-forget outbound posts.
pub trait HostPort: Send + Sync {
    /// Install the inbound listener. The bridge calls this at most once.
    fn listen(&self, listener: InboundListener);

    /// Transmit one envelope to the host.
    fn post_message(&self, message: &Value, target_origin: &str) -> Result<(), BridgeError>;
}

/// Port for a component that is not embedded anywhere: nothing comes in,
/// everything sent is discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPort;

impl HostPort for NullPort {
    fn listen(&self, _listener: InboundListener) {}

    fn post_message(&self, _message: &Value, _target_origin: &str) -> Result<(), BridgeError> {
        Ok(())
    }
}

/// One message posted through a [`MemoryPort`].
#[derive(Debug, Clone, PartialEq)]
pub struct Posted {
    pub message: Value,
    pub target_origin: String,
}

/// In-process host endpoint. Records outbound posts and lets the caller play
/// the host by delivering messages to the installed listener.
#[derive(Default)]
pub struct MemoryPort {
    listener: Mutex<Option<InboundListener>>,
    posted: Mutex<Vec<Posted>>,
}

impl MemoryPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_listening(&self) -> bool {
        self.listener.lock().is_some()
    }

    /// Deliver a message as if the host had posted it. Returns `false` when
    /// no listener is installed (the message is lost, as it would be in a frame).
    pub fn deliver(&self, message: Value) -> bool {
        let listener = self.listener.lock().clone();
        match listener {
            Some(l) => {
                l(message);
                true
            }
            None => false,
        }
    }

    /// Everything posted so far, oldest first.
    pub fn posted(&self) -> Vec<Posted> {
        self.posted.lock().clone()
    }

    /// Drain and return the posted messages.
    pub fn take_posted(&self) -> Vec<Value> {
        self.posted
            .lock()
            .drain(..)
            .map(|p| p.message)
            .collect()
    }
}

impl HostPort for MemoryPort {
    fn listen(&self, listener: InboundListener) {
        *self.listener.lock() = Some(listener);
    }

    fn post_message(&self, message: &Value, target_origin: &str) -> Result<(), BridgeError> {
        self.posted.lock().push(Posted {
            message: message.clone(),
            target_origin: target_origin.to_string(),
        });
        Ok(())
    }
}

impl<P: HostPort + ?Sized> HostPort for Arc<P> {
    fn listen(&self, listener: InboundListener) {
        (**self).listen(listener)
    }

    fn post_message(&self, message: &Value, target_origin: &str) -> Result<(), BridgeError> {
        (**self).post_message(message, target_origin)
    }
}
