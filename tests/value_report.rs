mod common;

use common::ready_bridge;
use component_bridge::value::TypedArrayElement;
use component_bridge::ComponentValue;
use serde_json::{json, Value};

fn byte_len_sent<T: TypedArrayElement>(items: Vec<T>) -> (usize, Value) {
    let (bridge, port) = ready_bridge();
    bridge.report_value(items);
    let sent = port.take_posted();
    assert_eq!(sent.len(), 1);
    let msg = sent.into_iter().next().unwrap();
    assert_eq!(msg["type"], "streamlit:setComponentValue");
    assert_eq!(msg["isStreamlitMessage"], true);
    let len = msg["value"].as_array().expect("bytes travel as an array").len();
    (len, msg["dataType"].clone())
}

#[test]
fn typed_arrays_are_sent_as_their_full_byte_length() {
    let cases = [
        byte_len_sent(vec![1i8, -2, 3]),
        byte_len_sent(vec![1u8, 2, 3]),
        byte_len_sent(vec![1i16, -2, 3]),
        byte_len_sent(vec![1u16, 2, 3]),
        byte_len_sent(vec![1i32, -2, 3]),
        byte_len_sent(vec![1u32, 2, 3]),
        byte_len_sent(vec![1i64, -2, 3]),
        byte_len_sent(vec![1u64, 2, 3]),
        byte_len_sent(vec![1.5f32, -2.0, 3.25]),
        byte_len_sent(vec![1.5f64, -2.0, 3.25]),
    ];
    let widths = [1, 1, 2, 2, 4, 4, 8, 8, 4, 8];

    for ((len, data_type), width) in cases.into_iter().zip(widths) {
        assert_eq!(data_type, "bytes");
        assert_eq!(len, 3 * width, "element count must not be mistaken for byte count");
    }
}

#[test]
fn typed_array_bytes_are_the_memory_view() {
    let (bridge, port) = ready_bridge();
    let samples = [0.5f32, -1.0];
    bridge.report_value(&samples[..]);

    let sent = port.take_posted();
    let bytes: Vec<u8> = sent[0]["value"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b.as_u64().unwrap() as u8)
        .collect();
    let expected: Vec<u8> = samples.iter().flat_map(|f| f.to_ne_bytes()).collect();
    assert_eq!(bytes, expected);
}

#[test]
fn raw_buffer_is_bytes() {
    let (bridge, port) = ready_bridge();
    bridge.report_value(ComponentValue::from_buffer(b"\x00\x01\xff".as_slice()));

    let sent = port.take_posted();
    assert_eq!(sent[0]["dataType"], "bytes");
    assert_eq!(sent[0]["value"], json!([0, 1, 255]));
}

#[test]
fn empty_typed_array_is_still_bytes() {
    let (len, data_type) = byte_len_sent(Vec::<u32>::new());
    assert_eq!(len, 0);
    assert_eq!(data_type, "bytes");
}

#[test]
fn non_binary_values_are_json_and_unchanged() {
    let structured = json!({"smiles": "CCO", "atoms": [6, 6, 8], "valid": true});
    let cases: Vec<(ComponentValue, Value)> = vec![
        ("C1=CC=CC=C1".into(), json!("C1=CC=CC=C1")),
        (String::from("").into(), json!("")),
        (42i64.into(), json!(42)),
        (2.5f64.into(), json!(2.5)),
        (false.into(), json!(false)),
        (structured.clone().into(), structured),
        (Value::Null.into(), Value::Null),
    ];

    for (input, expected) in cases {
        let (bridge, port) = ready_bridge();
        bridge.report_value(input);
        let sent = port.take_posted();
        assert_eq!(sent[0]["dataType"], "json");
        assert_eq!(sent[0]["value"], expected);
    }
}

#[test]
fn plain_numbers_of_any_width_are_json() {
    let (bridge, port) = ready_bridge();
    bridge.report_value(5);
    bridge.report_value(5u32);
    bridge.report_value(-3i8);
    bridge.report_value(u64::MAX);
    bridge.report_value(0.5f32);

    let sent = port.take_posted();
    let values: Vec<Value> = sent.iter().map(|m| m["value"].clone()).collect();
    assert!(sent.iter().all(|m| m["dataType"] == "json"));
    assert_eq!(values, vec![json!(5), json!(5), json!(-3), json!(u64::MAX), json!(0.5)]);
}

#[test]
fn serde_values_encode_as_json() {
    #[derive(serde::Serialize)]
    struct Selection {
        start: u32,
        end: u32,
    }

    let (bridge, port) = ready_bridge();
    bridge.report_value(ComponentValue::json(&Selection { start: 1, end: 4 }).unwrap());
    let sent = port.take_posted();
    assert_eq!(sent[0]["dataType"], "json");
    assert_eq!(sent[0]["value"], json!({"start": 1, "end": 4}));
}

#[test]
fn each_report_is_independent() {
    let (bridge, port) = ready_bridge();
    bridge.report_value("a");
    bridge.report_value("a");
    assert_eq!(port.take_posted().len(), 2);
}
