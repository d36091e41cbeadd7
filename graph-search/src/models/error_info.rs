use serde_json::Value;

/// User-facing reading of a Graph error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphErrorInfo {
    pub message: String,
    pub code: Option<String>,
    pub is_retryable: bool,
}

impl GraphErrorInfo {
    pub fn classify(code: Option<&str>, message: Option<&str>) -> Self {
        let Some(code) = code else {
            return Self {
                message: message.unwrap_or("Unknown error occurred").to_string(),
                code: None,
                is_retryable: false,
            };
        };

        let (message, is_retryable) = match code {
            "Throttled" | "TooManyRequests" => {
                ("Request was throttled. Please try again later.", true)
            }
            "Unauthorized" | "Forbidden" => ("Access denied. Please check permissions.", false),
            "NotFound" => ("Requested resource was not found.", false),
            "ServiceUnavailable" => (
                "Microsoft Graph service is temporarily unavailable.",
                true,
            ),
            _ => (message.unwrap_or("Graph API error occurred"), false),
        };

        Self {
            message: message.to_string(),
            code: Some(code.to_string()),
            is_retryable,
        }
    }

    /// Reads `{ "error": { "code", "message" } }`, falling back to a code
    /// implied by the HTTP status.
    pub fn from_response(status: u16, body: Option<&Value>) -> Self {
        let error = body.and_then(|b| b.get("error"));
        let code = error
            .and_then(|e| e.get("code"))
            .and_then(Value::as_str)
            .or_else(|| status_code_name(status));
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str);

        Self::classify(code, message)
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.code.as_deref(), Some("Unauthorized" | "Forbidden"))
    }
}

fn status_code_name(status: u16) -> Option<&'static str> {
    match status {
        401 => Some("Unauthorized"),
        403 => Some("Forbidden"),
        404 => Some("NotFound"),
        429 => Some("TooManyRequests"),
        503 => Some("ServiceUnavailable"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_codes() {
        let throttled = GraphErrorInfo::classify(Some("TooManyRequests"), None);
        assert!(throttled.is_retryable);
        assert_eq!(throttled.message, "Request was throttled. Please try again later.");

        let forbidden = GraphErrorInfo::classify(Some("Forbidden"), Some("ignored"));
        assert!(!forbidden.is_retryable);
        assert!(forbidden.is_auth_failure());

        assert!(GraphErrorInfo::classify(Some("ServiceUnavailable"), None).is_retryable);
        assert!(!GraphErrorInfo::classify(Some("NotFound"), None).is_retryable);
    }

    #[test]
    fn unknown_code_keeps_service_message() {
        let info = GraphErrorInfo::classify(Some("BadRequest"), Some("Invalid entity type"));
        assert_eq!(info.message, "Invalid entity type");
        assert_eq!(info.code.as_deref(), Some("BadRequest"));
        assert!(!info.is_retryable);

        let info = GraphErrorInfo::classify(None, None);
        assert_eq!(info.message, "Unknown error occurred");
        assert_eq!(info.code, None);
    }

    #[test]
    fn from_response_prefers_body_code() {
        let body = json!({ "error": { "code": "Throttled", "message": "slow down" } });
        let info = GraphErrorInfo::from_response(429, Some(&body));
        assert_eq!(info.code.as_deref(), Some("Throttled"));

        let info = GraphErrorInfo::from_response(503, None);
        assert_eq!(info.code.as_deref(), Some("ServiceUnavailable"));
        assert!(info.is_retryable);

        let info = GraphErrorInfo::from_response(500, Some(&json!({})));
        assert_eq!(info.code, None);
    }
}
