use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::envelope::RawRender;
use crate::theme::Theme;

/// A normalized render notification, as seen by hosted content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderEvent {
    pub args: Map<String, Value>,
    pub disabled: bool,
    pub theme: Option<Theme>,
}

impl RenderEvent {
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }
}

/// Normalize a raw `render` envelope. Never fails: missing or malformed
/// fields fall back to safe defaults and are logged.
///
/// `args` must be an object. Anything else, arrays and strings included, is
/// replaced by an empty map rather than spread into index keys. Theme fields
/// that are `null` become empty and other non-string values keep their JSON
/// text.
pub fn decode_render(raw: RawRender) -> RenderEvent {
    let args = match raw.args {
        Some(Value::Object(map)) => map,
        None | Some(Value::Null) => {
            error!("got null args in render message; this should never happen");
            Map::new()
        }
        Some(other) => {
            warn!(args = %other, "render args are not an object; using empty args");
            Map::new()
        }
    };

    let disabled = raw.disabled.as_ref().map(truthy).unwrap_or(false);

    let theme = match raw.theme {
        None | Some(Value::Null) => None,
        // field types are read leniently, so an object theme always applies
        Some(value @ Value::Object(_)) => match serde_json::from_value::<Theme>(value) {
            Ok(theme) => Some(theme),
            Err(e) => {
                warn!(error = %e, "could not read render theme; ignoring it");
                None
            }
        },
        Some(other) => {
            warn!(theme = %other, "render theme is not an object; ignoring it");
            None
        }
    };

    RenderEvent {
        args,
        disabled,
        theme,
    }
}

/// Loose truthiness, so a host sending `1` or `"true"` still disables the component.
pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_loose_boolean_rules() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!(2)));
        assert!(truthy(&json!("false")));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
    }

    #[test]
    fn non_object_args_become_empty() {
        let ev = decode_render(RawRender {
            args: Some(json!("oops")),
            ..RawRender::default()
        });
        assert!(ev.args.is_empty());
        assert!(!ev.disabled);
    }

    #[test]
    fn non_object_array_args_become_empty() {
        let ev = decode_render(RawRender {
            args: Some(json!(["a", "b"])),
            ..RawRender::default()
        });
        assert!(ev.args.is_empty());
    }

    #[test]
    fn theme_with_wrong_field_types_is_kept() {
        let ev = decode_render(RawRender {
            args: Some(json!({})),
            theme: Some(json!({"base": 3, "font": null})),
            ..RawRender::default()
        });
        let theme = ev.theme.expect("object theme is always kept");
        assert_eq!(theme.base, "3");
        assert_eq!(theme.font, "");
    }
}
