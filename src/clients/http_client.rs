//! HTTP client for the identity service.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! JSON requests against the configured base URL.

use std::collections::HashMap;

use base64::prelude::*;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ClientConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the identity service.
///
/// The client handles:
/// - URL resolution of relative and absolute hrefs against the base URL
/// - Default headers including User-Agent and Basic authorization
/// - JSON body parsing
///
/// Unlike a raw `reqwest` call, [`HttpClient::request`] returns the parsed
/// response for every status code. Mapping statuses to errors is left to the
/// caller, which knows whether a 404 means "not found" or "query rejected".
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use identity_sdk::{BaseUrl, ClientConfig};
/// use identity_sdk::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/organizations/abc")
///     .build()
///     .unwrap();
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: crate::config::BaseUrl,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g. TLS initialization failure).
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Identity SDK v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        if let (Some(id), Some(secret)) = (config.api_key_id(), config.api_key_secret()) {
            let credentials = format!("{}:{}", id.as_ref(), secret.as_ref());
            default_headers.insert(
                "Authorization".to_string(),
                format!("Basic {}", BASE64_STANDARD.encode(credentials)),
            );
        }

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            default_headers,
        })
    }

    /// Returns the base URL hrefs are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &crate::config::BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request and returns the parsed response.
    ///
    /// Non-2xx responses are returned as `Ok`; inspect
    /// [`HttpResponse::is_ok`] to tell them apart.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A network error occurs (`Network`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.base_url.resolve(&request.href);

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }

        tracing::debug!(method = %request.http_method, url = %url, "sending request");

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.unwrap_or_default();

        let response = if body_text.is_empty() {
            HttpResponse::new(code, res_headers, serde_json::json!({}))
        } else {
            match serde_json::from_str(&body_text) {
                Ok(body) => HttpResponse::new(code, res_headers, body),
                Err(_) => HttpResponse::unparsed(code, res_headers, body_text),
            }
        };

        tracing::debug!(
            method = %request.http_method,
            url = %url,
            status = code,
            request_id = response.request_id().unwrap_or_default(),
            "received response"
        );

        Ok(response)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
