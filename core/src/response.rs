//! Classifies a decoded response body and extracts the operation's result.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::catalog::{Extraction, Operation};
use crate::error::ApiError;

/// The `status` value the service uses for success.
pub const SUCCESS: &str = "success";

/// Decode raw response bytes into a JSON tree.
pub fn decode_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::MalformedResponse(format!("body is not valid JSON: {e}")))
}

/// Check `status` and pull the result out along the operation's extraction
/// path. The body is only read, never modified.
pub fn interpret(operation: &Operation, body: &Value) -> Result<Value, ApiError> {
    let Value::Object(fields) = body else {
        return Err(ApiError::MalformedResponse(format!(
            "{}: response is not a JSON object",
            operation.method
        )));
    };

    let status = match fields.get("status") {
        Some(Value::String(status)) => status.as_str(),
        Some(other) => {
            return Err(ApiError::MalformedResponse(format!(
                "{}: status is not a string: {other}",
                operation.method
            )))
        }
        None => {
            return Err(ApiError::MalformedResponse(format!(
                "{}: response has no status",
                operation.method
            )))
        }
    };

    if status != SUCCESS {
        warn!(method = operation.method, status, "request rejected");
        return Err(ApiError::RemoteError(status.to_string()));
    }

    debug!(method = operation.method, "request succeeded");
    extract(operation, fields)
}

fn extract(operation: &Operation, fields: &Map<String, Value>) -> Result<Value, ApiError> {
    let missing = |path: &str| {
        ApiError::MalformedResponse(format!("{}: missing '{path}'", operation.method))
    };
    // A JSON null carries no value, so it counts as missing.
    let field = |key: &str| {
        fields
            .get(key)
            .filter(|value| !value.is_null())
            .ok_or_else(|| missing(key))
    };
    let first = |key: &str| {
        field(key)?
            .as_array()
            .and_then(|items| items.first())
            .filter(|value| !value.is_null())
            .ok_or_else(|| missing(&format!("{key}[0]")))
    };

    match operation.extraction {
        Extraction::Field(key) => field(key).cloned(),
        Extraction::FirstElement(key) => first(key).cloned(),
        Extraction::FirstElementField(key, inner) => first(key)?
            .get(inner)
            .filter(|value| !value.is_null())
            .cloned()
            .ok_or_else(|| missing(&format!("{key}[0].{inner}"))),
        Extraction::WithoutStatus => Ok(Value::Object(
            fields
                .iter()
                .filter(|(key, _)| key.as_str() != "status")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )),
        Extraction::Fields(keys) => keys
            .iter()
            .map(|&key| field(key).map(|value| (key.to_string(), value.clone())))
            .collect::<Result<Map<_, _>, _>>()
            .map(Value::Object),
        Extraction::Nothing => Ok(Value::Null),
    }
}
