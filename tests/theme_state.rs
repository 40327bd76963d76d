mod common;

use common::{ready_bridge, theme_json};
use component_bridge::{AppliedTheme, Theme};
use serde_json::json;

fn theme(base: &str, primary: &str, background: &str, text: &str) -> Theme {
    Theme {
        base: base.into(),
        primary_color: primary.into(),
        background_color: background.into(),
        secondary_background_color: format!("{background}-alt"),
        text_color: text.into(),
        font: format!("{base}-font"),
    }
}

#[test]
fn second_theme_fully_replaces_first() {
    let (bridge, _port) = ready_bridge();
    let t1 = theme("light", "#111111", "#ffffff", "#000000");
    let t2 = theme("dark", "#222222", "#0e1117", "#fafafa");

    bridge.apply_theme(&t1);
    bridge.apply_theme(&t2);

    let applied = bridge.theme().expect("applied");
    assert_eq!(applied, AppliedTheme::resolve(&t2));
    for value in applied.properties.values() {
        assert!(!value.contains("#111111") && !value.contains("light"), "residue: {value}");
    }
    assert_eq!(applied.root_background, "#0e1117");
    assert_eq!(applied.root_foreground, "#fafafa");
}

#[test]
fn all_six_fields_are_materialized() {
    let (bridge, _port) = ready_bridge();
    bridge.apply_theme(&theme("dark", "#ff4b4b", "#0e1117", "#fafafa"));

    let applied = bridge.theme().unwrap();
    assert_eq!(applied.properties.len(), 6);
    assert_eq!(applied.property("--base"), Some("dark"));
    assert_eq!(applied.property("--primary-color"), Some("#ff4b4b"));
    assert_eq!(applied.property("--background-color"), Some("#0e1117"));
    assert_eq!(applied.property("--secondary-background-color"), Some("#0e1117-alt"));
    assert_eq!(applied.property("--text-color"), Some("#fafafa"));
    assert_eq!(applied.property("--font"), Some("dark-font"));
}

#[test]
fn reapplying_same_theme_is_idempotent() {
    let (bridge, _port) = ready_bridge();
    let t = theme("light", "#ff4b4b", "#ffffff", "#31333f");

    bridge.apply_theme(&t);
    let first = bridge.theme();
    bridge.apply_theme(&t);
    assert_eq!(bridge.theme(), first);
}

#[tokio::test]
async fn watchers_see_changes_but_not_repeats() {
    let (bridge, port) = ready_bridge();
    let mut rx = bridge.watch_theme();
    assert!(rx.borrow_and_update().is_none());

    let msg = json!({
        "isStreamlitMessage": true,
        "type": "streamlit:render",
        "args": {},
        "theme": theme_json("dark", "#ff4b4b", "#0e1117"),
    });
    port.deliver(msg.clone());
    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone().unwrap();
    assert_eq!(seen.property("--base"), Some("dark"));

    port.deliver(msg);
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn partial_theme_from_host_fills_missing_fields_with_empty() {
    let (bridge, port) = ready_bridge();
    port.deliver(json!({
        "isStreamlitMessage": true,
        "type": "streamlit:render",
        "args": {},
        "theme": {"base": "light", "primaryColor": "#ff4b4b"},
    }));

    let applied = bridge.theme().unwrap();
    assert_eq!(applied.property("--primary-color"), Some("#ff4b4b"));
    assert_eq!(applied.property("--font"), Some(""));
}
