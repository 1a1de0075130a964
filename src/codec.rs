//! Document codec
//!
//! Converts a [`Dataset`] to the on-disk document and back.
//!
//! ## Document Format
//! ```text
//! {
//!   "<url-safe base64 of key>": "<url-safe base64 of value>",
//!   ...
//! }
//! ```
//!
//! Both field names and values are encoded so that arbitrary strings
//! (slashes, quotes, control characters) never need JSON escaping. Field
//! names are written in sorted order so equal datasets produce equal bytes.

use std::collections::{BTreeMap, HashMap};

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;

use crate::error::{DecodeError, KvError, Result};

/// The complete string-to-string mapping held by the store
pub type Dataset = HashMap<String, String>;

/// Encode a dataset into document bytes
pub fn encode(dataset: &Dataset) -> Result<Vec<u8>> {
    let document: BTreeMap<String, String> = dataset
        .iter()
        .map(|(k, v)| (URL_SAFE.encode(k), URL_SAFE.encode(v)))
        .collect();

    serde_json::to_vec(&document).map_err(KvError::Serialization)
}

/// Decode document bytes into a dataset
///
/// Fails on the first malformed field; no partial dataset is returned.
pub fn decode(bytes: &[u8]) -> std::result::Result<Dataset, DecodeError> {
    let document: HashMap<String, String> = serde_json::from_slice(bytes)?;

    let mut dataset = Dataset::with_capacity(document.len());
    for (name, value) in document {
        let key = decode_field(&name, "field name")?;
        let value = decode_field(&value, "value")?;
        dataset.insert(key, value);
    }

    Ok(dataset)
}

fn decode_field(encoded: &str, what: &str) -> std::result::Result<String, DecodeError> {
    let raw = URL_SAFE.decode(encoded).map_err(|source| DecodeError::Base64 {
        field: format!("{} {:?}", what, encoded),
        source,
    })?;

    String::from_utf8(raw).map_err(|source| DecodeError::Utf8 {
        field: format!("{} {:?}", what, encoded),
        source,
    })
}
