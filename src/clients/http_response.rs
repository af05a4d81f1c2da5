//! HTTP response types for the identity SDK.

use std::collections::HashMap;

use serde_json::Value;

/// An HTTP response from the service.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lower-cased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body; `{}` when the body was empty, `null` when it
    /// was not JSON.
    pub body: Value,
    /// The body text, kept only when it could not be parsed as JSON.
    pub raw_body: Option<String>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Value) -> Self {
        Self {
            code,
            headers,
            body,
            raw_body: None,
        }
    }

    /// Creates a response whose body text is not JSON.
    #[must_use]
    pub const fn unparsed(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        raw_body: String,
    ) -> Self {
        Self {
            code,
            headers,
            body: Value::Null,
            raw_body: Some(raw_body),
        }
    }

    /// Returns `true` if the body was empty or valid JSON.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.raw_body.is_none()
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the request id header value, if present.
    ///
    /// Include this id in error reports.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the most descriptive error message in the body.
    ///
    /// Error bodies look like
    /// `{"status": 400, "code": 2002, "message": "...", "developerMessage": "..."}`.
    /// The developer message wins over the user-facing message; without
    /// either, the raw body is returned.
    #[must_use]
    pub fn error_message(&self) -> String {
        if let Some(raw) = &self.raw_body {
            return raw.clone();
        }
        ["developerMessage", "message", "error"]
            .iter()
            .find_map(|key| self.body.get(key).and_then(Value::as_str))
            .map_or_else(|| self.body.to_string(), ToString::to_string)
    }

    /// Returns the service-specific error code from an error body.
    #[must_use]
    pub fn error_code(&self) -> Option<i64> {
        self.body.get("code").and_then(Value::as_i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [400, 401, 404, 409, 500, 503] {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(!response.is_ok());
        }
    }

    #[test]
    fn test_request_id_header() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["req-123".to_string()]);
        let response = HttpResponse::new(200, headers, json!({}));
        assert_eq!(response.request_id(), Some("req-123"));
    }

    #[test]
    fn test_error_message_prefers_developer_message() {
        let response = HttpResponse::new(
            400,
            HashMap::new(),
            json!({
                "status": 400,
                "code": 2002,
                "message": "Oops! We encountered an unexpected error.",
                "developerMessage": "Organization name is required."
            }),
        );
        assert_eq!(response.error_message(), "Organization name is required.");
        assert_eq!(response.error_code(), Some(2002));
    }

    #[test]
    fn test_error_message_falls_back_to_json_body() {
        let response = HttpResponse::new(500, HashMap::new(), json!({"status": 500}));
        assert_eq!(response.error_message(), r#"{"status":500}"#);
    }

    #[test]
    fn test_unparsed_body_is_kept_verbatim() {
        let response =
            HttpResponse::unparsed(502, HashMap::new(), "<html>gateway</html>".to_string());
        assert!(!response.is_json());
        assert!(response.body.is_null());
        assert_eq!(response.error_message(), "<html>gateway</html>");
        assert!(HttpResponse::new(200, HashMap::new(), json!({})).is_json());
    }
}
