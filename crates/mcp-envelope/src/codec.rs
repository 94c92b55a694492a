//! Envelope decoding and encoding.
//!
//! Decoding is lenient about field-name case and ignores unknown fields, but
//! rejects bodies that are empty, not JSON, not an object, or lack a
//! `messageType`.

use serde_json::{Map, Value};

use crate::types::{EnvelopeError, EnvelopeResult, RequestEnvelope, ResponseEnvelope};

const ENVELOPE_FIELDS: &[&str] = &["requestId", "messageType", "invokeRequest", "streamRequest"];
const CALL_FIELDS: &[&str] = &["operation", "parameters"];

/// Decode a raw request body into an envelope.
pub fn decode_request(raw: &[u8]) -> EnvelopeResult<RequestEnvelope> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(EnvelopeError::Empty);
    }

    let value: Value = serde_json::from_slice(raw).map_err(EnvelopeError::Syntax)?;
    let Value::Object(fields) = value else {
        return Err(EnvelopeError::NotAnObject);
    };

    let mut fields = canonicalize(fields, ENVELOPE_FIELDS);
    for nested in ["invokeRequest", "streamRequest"] {
        if let Some(Value::Object(call)) = fields.get_mut(nested) {
            *call = canonicalize(std::mem::take(call), CALL_FIELDS);
        }
    }

    serde_json::from_value(Value::Object(fields)).map_err(EnvelopeError::Shape)
}

/// Encode a response envelope. Absent optional fields are omitted.
pub fn encode_response(envelope: &ResponseEnvelope) -> EnvelopeResult<Vec<u8>> {
    serde_json::to_vec(envelope).map_err(EnvelopeError::Encode)
}

/// Decode a response envelope, as a client would.
pub fn decode_response(raw: &[u8]) -> EnvelopeResult<ResponseEnvelope> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(EnvelopeError::Empty);
    }
    serde_json::from_slice(raw).map_err(EnvelopeError::Shape)
}

/// Encode a request envelope, as a client would.
pub fn encode_request(envelope: &RequestEnvelope) -> EnvelopeResult<Vec<u8>> {
    serde_json::to_vec(envelope).map_err(EnvelopeError::Encode)
}

/// Rename keys that match a canonical field name ignoring ASCII case, and
/// drop everything else. The first spelling seen for a field wins.
fn canonicalize(fields: Map<String, Value>, canonical: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in fields {
        let Some(name) = canonical.iter().find(|c| c.eq_ignore_ascii_case(&key)) else {
            tracing::trace!("Ignoring unknown envelope field '{key}'");
            continue;
        };
        if value.is_null() || out.contains_key(*name) {
            continue;
        }
        out.insert((*name).to_string(), value);
    }
    out
}
