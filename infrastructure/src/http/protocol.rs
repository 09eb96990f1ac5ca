//! Reply interpretation for the comparison API
//!
//! The API reports failures in the body rather than (only) through the
//! status code: `/compare` sends `{"error": {"message": ...}}` and
//! `/assess` sends `{"error": "..."}`. A body with an `error` field is a
//! backend error whatever the status.

use serde::de::DeserializeOwned;
use serde_json::Value;
use stack_application::GatewayError;

/// Interpret a reply body received with `status`.
pub(crate) fn interpret<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<T, GatewayError> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if status.is_success() => {
            return Err(GatewayError::InvalidResponse(format!("not JSON: {}", e)));
        }
        Err(_) => return Err(GatewayError::Backend(status_message(status))),
    };

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        return Err(GatewayError::Backend(error_message(error)));
    }
    if !status.is_success() {
        return Err(GatewayError::Backend(status_message(status)));
    }

    serde_json::from_value(value).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => String::new(),
        },
        other => other.to_string(),
    }
}

fn status_message(status: reqwest::StatusCode) -> String {
    format!(
        "HTTP {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use stack_application::CompareResponse;
    use stack_domain::AssessmentResult;

    #[test]
    fn test_success_body_is_parsed() {
        let body = r#"{"agent1": {"name": "Intern1", "response": "4"},
                       "agent2": {"name": "Intern2", "response": "Four"}}"#;
        let reply: CompareResponse = interpret(StatusCode::OK, body).unwrap();
        assert_eq!(reply.agent1.response, "4");
        assert_eq!(reply.agent2.name, "Intern2");
    }

    #[test]
    fn test_error_object_uses_message() {
        let body = r#"{"error": {"message": "Agent not found", "code": 404}}"#;
        let err = interpret::<CompareResponse>(StatusCode::NOT_FOUND, body).unwrap_err();
        assert_eq!(err, GatewayError::Backend("Agent not found".to_string()));
    }

    #[test]
    fn test_error_string_on_success_status() {
        let body = r#"{"error": "Assessment failed"}"#;
        let err = interpret::<AssessmentResult>(StatusCode::OK, body).unwrap_err();
        assert_eq!(err, GatewayError::Backend("Assessment failed".to_string()));
    }

    #[test]
    fn test_error_object_without_message_is_blank() {
        let body = r#"{"error": {"code": 500}}"#;
        let err = interpret::<CompareResponse>(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert_eq!(err, GatewayError::Backend(String::new()));
    }

    #[test]
    fn test_non_json_failure_reports_status() {
        let err =
            interpret::<CompareResponse>(StatusCode::BAD_GATEWAY, "<html>oops</html>").unwrap_err();
        assert_eq!(err, GatewayError::Backend("HTTP 502 Bad Gateway".to_string()));
    }

    #[test]
    fn test_wrong_shape_is_invalid_response() {
        let err = interpret::<CompareResponse>(StatusCode::OK, r#"{"agent1": 1}"#).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }
}
