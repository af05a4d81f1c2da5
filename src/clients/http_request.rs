//! HTTP request types for the identity SDK.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests sent by the [`HttpDataStore`](crate::datastore::HttpDataStore).

use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the data store.
///
/// The service updates resources with POST, so there is no PUT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources and collection pages.
    Get,
    /// HTTP POST method for creating and updating resources.
    Post,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// An HTTP request to be sent to the service.
///
/// `href` may be absolute or relative to the configured base URL. Bodies are
/// always JSON.
///
/// # Example
///
/// ```rust
/// use identity_sdk::clients::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(HttpMethod::Get, "/organizations")
///     .query_param("offset", "0")
///     .query_param("limit", "25")
///     .build()
///     .unwrap();
///
/// let post_request = HttpRequest::builder(HttpMethod::Post, "/organizations/abc")
///     .body(json!({"name": "Acme"}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The resource href (absolute, or relative to the base URL).
    pub href: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters in the order they are appended to the URL.
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, href: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, href)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::MissingBody`] for a POST without body
    /// and [`InvalidHttpRequestError::UnexpectedBody`] for a GET or DELETE with one.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        match (self.http_method, &self.body) {
            (HttpMethod::Post, None) => Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            }),
            (HttpMethod::Get | HttpMethod::Delete, Some(_)) => {
                Err(InvalidHttpRequestError::UnexpectedBody {
                    method: self.http_method.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    href: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, href: impl Into<String>) -> Self {
        Self {
            http_method: method,
            href: href.into(),
            body: None,
            query: Vec::new(),
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Appends query parameters.
    #[must_use]
    pub fn query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Appends a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            href: self.href,
            body: self.body,
            query: self.query,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = HttpRequest::builder(HttpMethod::Get, "/organizations/abc")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.href, "/organizations/abc");
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_verify_requires_body_for_post() {
        let result = HttpRequest::builder(HttpMethod::Post, "/organizations").build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBody { method }) if method == "post"
        ));
    }

    #[test]
    fn test_verify_rejects_body_on_get() {
        let result = HttpRequest::builder(HttpMethod::Get, "/organizations")
            .body(json!({"name": "x"}))
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::UnexpectedBody { method }) if method == "get"
        ));
    }

    #[test]
    fn test_query_params_keep_insertion_order() {
        let request = HttpRequest::builder(HttpMethod::Get, "/organizations")
            .query_param("offset", "25")
            .query(vec![("limit".to_string(), "25".to_string())])
            .query_param("name", "Acme")
            .build()
            .unwrap();

        let keys: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["offset", "limit", "name"]);
    }
}
