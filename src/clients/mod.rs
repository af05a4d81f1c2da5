//! HTTP client types for the identity service.
//!
//! This module provides the transport layer underneath
//! [`HttpDataStore`](crate::datastore::HttpDataStore). It knows how to send
//! authenticated JSON requests and parse responses; it knows nothing about
//! resources.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client
//! - [`HttpRequest`]: A request to be sent to the service
//! - [`HttpResponse`]: A parsed response from the service
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, DELETE)
//! - [`HttpError`]: Transport-level failures
//!
//! # Example
//!
//! ```rust,ignore
//! use identity_sdk::{BaseUrl, ClientConfig};
//! use identity_sdk::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
//!     .build()
//!     .unwrap();
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/organizations")
//!     .query_param("limit", "25")
//!     .build()
//!     .unwrap();
//!
//! let response = client.request(request).await?;
//! ```
//!
//! Failed requests are not retried.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
