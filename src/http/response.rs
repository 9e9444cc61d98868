//! Response body helpers
//!
//! Error reporting must never fail because a server answered with HTML or an
//! empty body, so everything here degrades to a diagnostic object instead of
//! returning an error.

use crate::error::{Error, Result};
use crate::http::transport::TransportResponse;
use crate::types::{JsonObject, JsonValue};
use serde_json::json;

/// Best-effort JSON object for a response
///
/// A JSON object body is returned as is. Other JSON values are wrapped as
/// `{"body": value}`. A body that is not JSON becomes a note with the
/// reason phrase and the decode error.
pub fn response_dict(response: &TransportResponse) -> JsonObject {
    match response.json() {
        Ok(JsonValue::Object(map)) => map,
        Ok(other) => {
            let mut map = JsonObject::new();
            map.insert("body".to_string(), other);
            map
        }
        Err(e) => {
            let value = json!({
                "reason": response.reason(),
                "additional_notes": "No-JSON response.",
                "No-JSON response exception:": e.to_string(),
            });
            match value {
                JsonValue::Object(map) => map,
                _ => JsonObject::new(),
            }
        }
    }
}

/// [`response_dict`] rendered as a JSON string for error messages
pub fn render_response(response: &TransportResponse) -> String {
    JsonValue::Object(response_dict(response)).to_string()
}

/// Parse a success body, which must be a JSON object
pub(crate) fn parse_object(response: &TransportResponse) -> Result<JsonObject> {
    match response.json()? {
        JsonValue::Object(map) => Ok(map),
        other => Err(Error::decode(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
