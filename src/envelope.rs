//! Wire envelopes exchanged with the host.
//!
//! Every envelope is a flat JSON object carrying a `type` tag. Outbound
//! envelopes also carry the provenance marker (`"isStreamlitMessage": true`)
//! so the host can tell component traffic from anything else posted to it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the provenance marker on every envelope.
pub const PROVENANCE_KEY: &str = "isStreamlitMessage";

pub const COMPONENT_READY: &str = "streamlit:componentReady";
pub const SET_COMPONENT_VALUE: &str = "streamlit:setComponentValue";
pub const SET_FRAME_HEIGHT: &str = "streamlit:setFrameHeight";
pub const RENDER: &str = "streamlit:render";

/// How the host should interpret a reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Bytes,
    Json,
}

/// Component -> host messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ComponentMessage {
    /// Sent once the component can receive render notifications. The host
    /// withholds `render` until it sees this.
    #[serde(rename = "streamlit:componentReady", rename_all = "camelCase")]
    ComponentReady { api_version: u32 },

    /// A new widget value; the host reruns its app and eventually renders again.
    #[serde(rename = "streamlit:setComponentValue", rename_all = "camelCase")]
    SetComponentValue { value: Value, data_type: DataType },

    /// A new height for the embedding frame.
    #[serde(rename = "streamlit:setFrameHeight")]
    SetFrameHeight { height: f64 },
}

impl ComponentMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ComponentMessage::ComponentReady { .. } => COMPONENT_READY,
            ComponentMessage::SetComponentValue { .. } => SET_COMPONENT_VALUE,
            ComponentMessage::SetFrameHeight { .. } => SET_FRAME_HEIGHT,
        }
    }
}

#[derive(Serialize)]
struct Outbound<'a> {
    #[serde(rename = "isStreamlitMessage")]
    provenance: bool,
    #[serde(flatten)]
    message: &'a ComponentMessage,
}

/// Wrap a message in its outbound envelope.
pub fn encode_envelope(message: &ComponentMessage) -> serde_json::Result<Value> {
    serde_json::to_value(Outbound {
        provenance: true,
        message,
    })
}

/// Raw fields of a `render` envelope, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRender {
    pub args: Option<Value>,
    pub disabled: Option<Value>,
    pub theme: Option<Value>,
}

/// Host -> component messages the bridge understands.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    Render(RawRender),
}

/// Why an inbound envelope was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ignored {
    NotAnObject,
    MissingProvenance,
    MissingType,
    UnknownType(String),
}

/// Classify one inbound message. Anything that is not a recognized envelope
/// comes back as [`Ignored`]; none of those are errors.
pub fn decode_envelope(raw: &Value, require_provenance: bool) -> Result<HostMessage, Ignored> {
    let obj = raw.as_object().ok_or(Ignored::NotAnObject)?;

    if require_provenance && !has_provenance(obj) {
        return Err(Ignored::MissingProvenance);
    }

    let ty = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or(Ignored::MissingType)?;

    match ty {
        RENDER => Ok(HostMessage::Render(RawRender {
            args: obj.get("args").cloned(),
            disabled: obj.get("disabled").cloned(),
            theme: obj.get("theme").cloned(),
        })),
        other => Err(Ignored::UnknownType(other.to_string())),
    }
}

fn has_provenance(obj: &Map<String, Value>) -> bool {
    matches!(obj.get(PROVENANCE_KEY), Some(Value::Bool(true)))
}
