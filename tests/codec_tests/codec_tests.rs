//! Codec Tests
//!
//! Tests for dataset encoding/decoding.

use docukv::codec::{decode, encode, Dataset};
use docukv::DecodeError;

// =============================================================================
// Helper Functions
// =============================================================================

fn dataset(pairs: &[(&str, &str)]) -> Dataset {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn round_trip(original: &Dataset) -> Dataset {
    let bytes = encode(original).unwrap();
    decode(&bytes).unwrap()
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_empty() {
    let empty = Dataset::new();
    assert_eq!(round_trip(&empty), empty);
}

#[test]
fn test_round_trip_awkward_keys() {
    let original = dataset(&[
        ("a/b/c", "slashes"),
        ("x=y", "equals"),
        ("  spaced key\t", "whitespace"),
        ("\"quoted\"", "quotes"),
        ("", "empty key"),
        ("empty value", ""),
    ]);
    assert_eq!(round_trip(&original), original);
}

#[test]
fn test_round_trip_non_ascii_and_control_chars() {
    let original = dataset(&[
        ("emoji 🚀", "héllo wörld"),
        ("日本語", "\u{0}\u{1}\n\r\u{7f}"),
        ("bell\u{7}", "zero\u{0}width\u{200b}"),
    ]);
    assert_eq!(round_trip(&original), original);
}

#[test]
fn test_round_trip_large_dataset() {
    let original: Dataset = (0..1000)
        .map(|i| (format!("key_{:04}", i), "v".repeat(i % 50)))
        .collect();
    assert_eq!(round_trip(&original), original);
}

// =============================================================================
// Format Tests
// =============================================================================

#[test]
fn test_encode_known_document() {
    let encoded = encode(&dataset(&[("hello", "world")])).unwrap();
    assert_eq!(encoded, br#"{"aGVsbG8=":"d29ybGQ="}"#);
}

#[test]
fn test_encode_is_deterministic() {
    let original: Dataset = (0..50).map(|i| (i.to_string(), i.to_string())).collect();
    let first = encode(&original).unwrap();
    let rebuilt: Dataset = original.clone().into_iter().collect::<Vec<_>>().into_iter().rev().collect();
    assert_eq!(encode(&rebuilt).unwrap(), first);
}

#[test]
fn test_decode_known_document() {
    let decoded = decode(br#"{"aGVsbG8=":"d29ybGQ=","a2V5":""}"#).unwrap();
    assert_eq!(decoded, dataset(&[("hello", "world"), ("key", "")]));
}

#[test]
fn test_decode_tolerates_whitespace() {
    let decoded = decode(b"  {\n  \"aGVsbG8=\" : \"d29ybGQ=\"\n}\n").unwrap();
    assert_eq!(decoded, dataset(&[("hello", "world")]));
}

// =============================================================================
// Decode Error Tests
// =============================================================================

#[test]
fn test_decode_rejects_non_json() {
    let err = decode(b"this is not json").unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_decode_rejects_empty_input() {
    let err = decode(b"").unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_decode_rejects_non_object() {
    assert!(matches!(decode(b"[]").unwrap_err(), DecodeError::Json(_)));
    assert!(matches!(decode(b"\"str\"").unwrap_err(), DecodeError::Json(_)));
    assert!(matches!(decode(b"null").unwrap_err(), DecodeError::Json(_)));
}

#[test]
fn test_decode_rejects_non_string_field() {
    let err = decode(br#"{"aGVsbG8=":42}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_decode_rejects_bad_base64_name() {
    let err = decode(br#"{"not base64!":"d29ybGQ="}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Base64 { .. }));
}

#[test]
fn test_decode_rejects_bad_base64_value() {
    let err = decode(br#"{"aGVsbG8=":"%%%"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Base64 { .. }));
}

#[test]
fn test_decode_rejects_standard_alphabet() {
    // '+' and '/' belong to the standard alphabet, not the url-safe one
    let err = decode(br#"{"aGVsbG8=":"ab+/"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Base64 { .. }));
}

#[test]
fn test_decode_rejects_non_utf8_payload() {
    // "_w==" is the single byte 0xff
    let err = decode(br#"{"aGVsbG8=":"_w=="}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Utf8 { .. }));
}
