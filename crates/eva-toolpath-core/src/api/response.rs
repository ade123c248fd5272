//! Response parsing utilities for the robot HTTP API.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RobotError;

/// Parse a JSON response body into `T`.
pub fn parse_json_response<T: DeserializeOwned>(body: &str, host: &str) -> Result<T, RobotError> {
    serde_json::from_str(body).map_err(|e| RobotError::InvalidResponse {
        host: host.to_string(),
        message: format!("Failed to parse JSON: {}", e),
    })
}

/// Pull `key` out of a JSON envelope such as `{"toolpaths": [...]}`.
pub fn unwrap_envelope<T: DeserializeOwned>(
    body: &str,
    key: &str,
    host: &str,
) -> Result<T, RobotError> {
    let mut value: Value = parse_json_response(body, host)?;

    let inner = value
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| RobotError::InvalidResponse {
            host: host.to_string(),
            message: format!("Missing '{}' in response", key),
        })?;

    serde_json::from_value(inner).map_err(|e| RobotError::InvalidResponse {
        host: host.to_string(),
        message: format!("Unexpected '{}' payload: {}", key, e),
    })
}

/// Best-effort human readable message from an error response body.
///
/// The robot reports failures as `{"error": ...}` or `{"message": ...}`,
/// sometimes nested under `"error": {"message": ...}`. Anything else is
/// returned trimmed.
pub fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let candidate = json
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .or_else(|| json.get("message"));

        if let Some(msg) = candidate {
            return match msg.as_str() {
                Some(s) => s.to_string(),
                None => msg.to_string(),
            };
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no details".to_string()
    } else {
        trimmed.to_string()
    }
}
