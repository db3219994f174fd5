//! Canonical signing payload derivation.
//!
//! Every signer of an envelope signs the same bytes: the envelope serialized
//! as JSON with keys in lexicographic order, with the `signature`,
//! `signatures` and `prefix` fields removed and every null-valued field
//! dropped, and with the optional domain-separation prefix prepended as raw
//! bytes. Any drift in this function breaks cross-stack signature validity,
//! so it is a pure function of the envelope value with no configuration.

use serde_json::Value;

/// Top-level fields excluded from the signed bytes.
const EXCLUDED_FIELDS: [&str; 3] = ["signature", "signatures", "prefix"];

/// Derive the bytes a signer commits to for the given envelope value.
///
/// `envelope` is the full envelope as a JSON value; `prefix` is the
/// domain-separation string (ETH-style `\x19...` separators are the caller's
/// responsibility and travel through unchanged).
pub fn signing_payload(envelope: &Value, prefix: Option<&str>) -> Vec<u8> {
    let canonical = canonicalize(envelope, true);
    let json = canonical.to_string();

    let mut bytes = Vec::with_capacity(prefix.map_or(0, str::len) + json.len());
    if let Some(prefix) = prefix {
        bytes.extend_from_slice(prefix.as_bytes());
    }
    bytes.extend_from_slice(json.as_bytes());
    bytes
}

// serde_json's Map is backed by a BTreeMap, so object keys serialize in
// lexicographic order; this function only has to drop excluded and null
// fields. Nulls are dropped at every depth so that an absent field and an
// explicit null sign identically.
fn canonicalize(value: &Value, top_level: bool) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, field)| {
                    !(top_level && EXCLUDED_FIELDS.contains(&key.as_str())) && !field.is_null()
                })
                .map(|(key, field)| (key.clone(), canonicalize(field, false)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| canonicalize(item, false))
                .collect(),
        ),
        other => other.clone(),
    }
}
