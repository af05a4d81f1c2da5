//! JSON-over-HTTP data store.

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResponseError};
use crate::config::ClientConfig;
use crate::datastore::{DataStore, QueryParams, QueryResult};
use crate::resource::{Href, PropertyMap, ResourceError};

/// A [`DataStore`] backed by the identity service's REST API.
///
/// | Operation | Request | Failure |
/// |-----------|---------|---------|
/// | fetch | `GET href` | 404 → `ResourceNotFound`, other → `Transport` |
/// | save | `POST href` with the dirty properties | `Persistence` |
/// | create | `POST parent` | `Persistence` |
/// | delete | `DELETE href` | 404 → `ResourceNotFound`, other → `Transport` |
/// | query | `GET href?offset=..&limit=..` | `Query` |
///
/// A successful response whose body is not JSON (an HTML error page from a
/// proxy, say) is [`ResourceError::Malformed`] for fetch, create and query.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use identity_sdk::{BaseUrl, ClientConfig};
/// use identity_sdk::datastore::HttpDataStore;
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
///     .build()
///     .unwrap();
/// let store = Arc::new(HttpDataStore::new(&config)?);
/// ```
#[derive(Debug)]
pub struct HttpDataStore {
    client: HttpClient,
}

// Verify HttpDataStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpDataStore>();
};

impl HttpDataStore {
    /// Creates a store sending requests with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        Ok(Self {
            client: HttpClient::new(config)?,
        })
    }

    /// Creates a store over an existing client.
    #[must_use]
    pub const fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ResourceError> {
        Ok(self.client.request(request).await?)
    }
}

fn build(
    builder: crate::clients::HttpRequestBuilder,
) -> Result<HttpRequest, ResourceError> {
    builder
        .build()
        .map_err(|e| ResourceError::Transport(HttpError::InvalidRequest(e)))
}

fn response_error(response: &HttpResponse) -> HttpResponseError {
    HttpResponseError {
        code: response.code,
        message: response.error_message(),
        error_reference: response.request_id().map(String::from),
    }
}

/// Maps a failed fetch or delete: 404 is a missing resource, anything else is transport.
fn lookup_error(href: &Href, response: &HttpResponse) -> ResourceError {
    if response.code == 404 {
        ResourceError::ResourceNotFound {
            href: href.to_string(),
        }
    } else {
        ResourceError::Transport(HttpError::Response(response_error(response)))
    }
}

/// Takes the JSON body of a successful response.
fn json_body(href: &Href, response: HttpResponse) -> Result<Value, ResourceError> {
    if response.is_json() {
        Ok(response.body)
    } else {
        tracing::warn!(href = %href, status = response.code, "response body is not JSON");
        Err(ResourceError::Malformed {
            href: href.to_string(),
            reason: "response body is not JSON".to_string(),
        })
    }
}

fn into_properties(href: &Href, response: HttpResponse) -> Result<PropertyMap, ResourceError> {
    match json_body(href, response)? {
        Value::Object(map) => Ok(map),
        _ => Err(ResourceError::Malformed {
            href: href.to_string(),
            reason: "resource representation is not a JSON object".to_string(),
        }),
    }
}

#[async_trait]
impl DataStore for HttpDataStore {
    async fn fetch(&self, href: &Href) -> Result<PropertyMap, ResourceError> {
        let request = build(HttpRequest::builder(HttpMethod::Get, href.as_str()))?;
        let response = self.send(request).await?;
        if !response.is_ok() {
            return Err(lookup_error(href, &response));
        }
        into_properties(href, response)
    }

    async fn save(&self, href: &Href, properties: &PropertyMap) -> Result<(), ResourceError> {
        let request = build(
            HttpRequest::builder(HttpMethod::Post, href.as_str())
                .body(Value::Object(properties.clone())),
        )?;
        let response = self.send(request).await?;
        if !response.is_ok() {
            return Err(ResourceError::Persistence {
                href: href.to_string(),
                message: response.error_message(),
            });
        }
        Ok(())
    }

    async fn create(
        &self,
        parent: &Href,
        properties: &PropertyMap,
    ) -> Result<PropertyMap, ResourceError> {
        let request = build(
            HttpRequest::builder(HttpMethod::Post, parent.as_str())
                .body(Value::Object(properties.clone())),
        )?;
        let response = self.send(request).await?;
        if !response.is_ok() {
            return Err(ResourceError::Persistence {
                href: parent.to_string(),
                message: response.error_message(),
            });
        }
        into_properties(parent, response)
    }

    async fn delete(&self, href: &Href) -> Result<(), ResourceError> {
        let request = build(HttpRequest::builder(HttpMethod::Delete, href.as_str()))?;
        let response = self.send(request).await?;
        if !response.is_ok() {
            return Err(lookup_error(href, &response));
        }
        Ok(())
    }

    async fn query(&self, href: &Href, params: &QueryParams) -> Result<QueryResult, ResourceError> {
        let request = build(
            HttpRequest::builder(HttpMethod::Get, href.as_str()).query(params.to_pairs()),
        )?;
        let response = self.send(request).await?;
        if !response.is_ok() {
            return Err(ResourceError::Query {
                href: href.to_string(),
                message: response.error_message(),
            });
        }
        QueryResult::from_json(href, json_body(href, response)?)
    }
}
