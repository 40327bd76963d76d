//! Theme state pushed by the host on render.
//!
//! The host sends its theme with render notifications. The bridge turns it
//! into an [`AppliedTheme`] (custom style properties plus the root
//! background/foreground pair) and publishes it through a [`ThemeCell`] that
//! hosted content can read or watch.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::watch;

/// Theme description as sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    #[serde(deserialize_with = "lenient_text")]
    pub base: String,
    #[serde(deserialize_with = "lenient_text")]
    pub primary_color: String,
    #[serde(deserialize_with = "lenient_text")]
    pub background_color: String,
    #[serde(deserialize_with = "lenient_text")]
    pub secondary_background_color: String,
    #[serde(deserialize_with = "lenient_text")]
    pub text_color: String,
    #[serde(deserialize_with = "lenient_text")]
    pub font: String,
}

/// Read a theme field as text. `null` is empty; non-strings keep their JSON text.
fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Materialized style state for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTheme {
    /// Custom style properties keyed by name (`--primary-color`, ...).
    pub properties: BTreeMap<&'static str, String>,
    pub root_background: String,
    pub root_foreground: String,
}

impl AppliedTheme {
    pub fn resolve(theme: &Theme) -> Self {
        let properties = BTreeMap::from([
            ("--base", theme.base.clone()),
            ("--primary-color", theme.primary_color.clone()),
            ("--background-color", theme.background_color.clone()),
            (
                "--secondary-background-color",
                theme.secondary_background_color.clone(),
            ),
            ("--text-color", theme.text_color.clone()),
            ("--font", theme.font.clone()),
        ]);
        Self {
            properties,
            root_background: theme.background_color.clone(),
            root_foreground: theme.text_color.clone(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Stylesheet equivalent of this state, for embedders that render into a document.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.properties {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push_str("}\n\nbody {\n");
        css.push_str("  background-color: var(--background-color);\n");
        css.push_str("  color: var(--text-color);\n");
        css.push_str("}\n");
        css
    }
}

/// Observable, process-wide theme state. Each [`apply`](ThemeCell::apply)
/// replaces the previous state wholesale.
#[derive(Debug)]
pub struct ThemeCell {
    tx: watch::Sender<Option<AppliedTheme>>,
}

impl Default for ThemeCell {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeCell {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn apply(&self, theme: &Theme) {
        let applied = AppliedTheme::resolve(theme);
        // watchers are only woken when the state actually changes
        self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(&applied) {
                false
            } else {
                *current = Some(applied);
                true
            }
        });
    }

    pub fn current(&self) -> Option<AppliedTheme> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AppliedTheme>> {
        self.tx.subscribe()
    }
}
