//! Unit tests for error normalization and the ProxyError contract

use api_gateway::error::{GatewayError, ProxyError};
use chrono::DateTime;
use serde_json::{json, Value};

#[test]
fn test_downstream_error_uses_body_message_and_details() {
    let failure = GatewayError::Downstream {
        status: 404,
        body: json!({"message": "not found", "resource": "user"}),
    };

    let error = ProxyError::normalize(failure, "users");

    assert_eq!(error.status_code, 404);
    assert_eq!(error.message, "not found");
    assert_eq!(error.service, "users");
    assert_eq!(
        error.details,
        Some(json!({"message": "not found", "resource": "user"}))
    );
}

#[test]
fn test_downstream_error_without_message_falls_back() {
    let failure = GatewayError::Downstream {
        status: 502,
        body: json!({"detail": "upstream exploded"}),
    };

    let error = ProxyError::normalize(failure, "ml");

    assert_eq!(error.status_code, 502);
    assert_eq!(error.message, "request failed with status code 502");
    assert_eq!(error.details, Some(json!({"detail": "upstream exploded"})));
}

#[test]
fn test_downstream_null_body_omits_details() {
    let failure = GatewayError::Downstream {
        status: 500,
        body: Value::Null,
    };

    let error = ProxyError::normalize(failure, "ml");
    assert_eq!(error.details, None);

    let serialized = serde_json::to_value(&error).unwrap();
    assert!(serialized.get("details").is_none());
}

#[test]
fn test_service_not_found_is_500() {
    let failure = GatewayError::ServiceNotFound {
        service: "ghost".to_string(),
    };

    let error = ProxyError::normalize(failure, "ghost");

    assert_eq!(error.status_code, 500);
    assert_eq!(error.message, "Service not found");
    assert_eq!(error.service, "ghost");
}

#[test]
fn test_timeout_is_generic_500() {
    let failure = GatewayError::Timeout { timeout_ms: 5000 };
    let error = ProxyError::normalize(failure, "app");

    assert_eq!(error.status_code, 500);
    assert_eq!(error.message, "timeout of 5000ms exceeded");
    assert_eq!(error.details, None);
}

#[test]
fn test_network_failure_is_generic_500() {
    let failure = GatewayError::Network {
        message: "connection refused".to_string(),
    };
    let error = ProxyError::normalize(failure, "app");

    assert_eq!(error.status_code, 500);
    assert_eq!(error.message, "connection refused");
}

#[test]
fn test_serializes_with_camel_case_keys() {
    let failure = GatewayError::Timeout { timeout_ms: 5000 };
    let error = ProxyError::normalize(failure, "app");

    let serialized = serde_json::to_value(&error).unwrap();
    assert!(serialized.get("statusCode").is_some());
    assert!(serialized.get("status_code").is_none());
    assert!(serialized.get("message").is_some());
    assert!(serialized.get("service").is_some());
}

#[test]
fn test_timestamp_is_rfc3339_utc() {
    let failure = GatewayError::Network {
        message: "boom".to_string(),
    };
    let error = ProxyError::normalize(failure, "app");

    assert!(error.timestamp.ends_with('Z'));
    DateTime::parse_from_rfc3339(&error.timestamp).unwrap();
}
