//! Correlation ID propagation across chained invocations.
//!
//! # Data Flow
//! ```text
//! inbound request {"correlation_id": ...}
//!     → get_or_create (reuse, or mint a UUID v4)
//!     → add_to_response (headers["X-Correlation-ID"])
//!     → add_to_next_lambda_payload (payload["correlation_id"])
//! ```
//!
//! IDs are opaque: any non-empty string is accepted as-is.

use serde_json::{Map, Value};
use uuid::Uuid;

/// Request / payload field carrying the correlation ID.
pub const CORRELATION_ID_FIELD: &str = "correlation_id";

/// Response header carrying the correlation ID.
pub const X_CORRELATION_ID: &str = "X-Correlation-ID";

/// Response field holding the header map.
pub const HEADERS_FIELD: &str = "headers";

/// Return the request's correlation ID, or mint a new one.
///
/// Non-empty strings are used verbatim and numbers by their JSON text.
/// Missing, null, empty and any other values yield a fresh UUID v4.
pub fn get_or_create(request: &Value) -> String {
    match request.get(CORRELATION_ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => generate(),
    }
}

/// A fresh correlation ID in canonical hyphenated UUID form.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Set `headers["X-Correlation-ID"]`, creating `headers` when absent.
///
/// Other response fields and existing headers are left untouched. A
/// `headers` value that is not an object is replaced.
pub fn add_to_response<'a>(
    response: &'a mut Map<String, Value>,
    correlation_id: &str,
) -> &'a mut Map<String, Value> {
    let headers = response
        .entry(HEADERS_FIELD)
        .or_insert_with(|| Value::Object(Map::new()));

    if !headers.is_object() {
        tracing::warn!(headers = %headers, "Response headers are not an object, replacing");
        *headers = Value::Object(Map::new());
    }

    if let Value::Object(headers) = headers {
        headers.insert(X_CORRELATION_ID.to_string(), Value::from(correlation_id));
    }

    response
}

/// Set `payload["correlation_id"]` for a downstream invocation.
pub fn add_to_next_lambda_payload<'a>(
    payload: &'a mut Map<String, Value>,
    correlation_id: &str,
) -> &'a mut Map<String, Value> {
    payload.insert(CORRELATION_ID_FIELD.to_string(), Value::from(correlation_id));
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_existing_id_reused() {
        assert_eq!(get_or_create(&json!({"correlation_id": "abc"})), "abc");
        assert_eq!(get_or_create(&json!({"correlation_id": 17})), "17");
    }

    #[test]
    fn test_missing_id_generated() {
        let first = get_or_create(&json!({}));
        let second = get_or_create(&json!({}));

        let parsed = Uuid::parse_str(&first).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(first, parsed.hyphenated().to_string());
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_or_null_id_generated() {
        for request in [
            json!({"correlation_id": ""}),
            json!({"correlation_id": null}),
            json!({"correlation_id": false}),
            json!("not an object"),
        ] {
            let id = get_or_create(&request);
            assert!(Uuid::parse_str(&id).is_ok(), "{request} gave {id}");
        }
    }

    #[test]
    fn test_add_to_empty_response() {
        let mut response = Map::new();
        add_to_response(&mut response, "id1");
        assert_eq!(
            Value::Object(response),
            json!({"headers": {"X-Correlation-ID": "id1"}})
        );
    }

    #[test]
    fn test_add_to_response_preserves_fields() {
        let mut response = object(json!({"statusCode": 200, "headers": {"A": "b"}}));
        add_to_response(&mut response, "id1");
        assert_eq!(
            Value::Object(response),
            json!({"statusCode": 200, "headers": {"A": "b", "X-Correlation-ID": "id1"}})
        );
    }

    #[test]
    fn test_add_to_response_overwrites_header() {
        let mut response = object(json!({"headers": {"X-Correlation-ID": "old"}}));
        let headers = &add_to_response(&mut response, "new")["headers"];
        assert_eq!(headers["X-Correlation-ID"], "new");
    }

    #[test]
    fn test_non_object_headers_replaced() {
        let mut response = object(json!({"headers": null}));
        add_to_response(&mut response, "id1");
        assert_eq!(response["headers"], json!({"X-Correlation-ID": "id1"}));
    }

    #[test]
    fn test_add_to_next_payload() {
        let mut payload = object(json!({"user_id": "u1"}));
        add_to_next_lambda_payload(&mut payload, "id1");
        assert_eq!(
            Value::Object(payload),
            json!({"user_id": "u1", "correlation_id": "id1"})
        );
    }
}
