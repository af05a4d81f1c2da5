//! The backing data store contract.
//!
//! The resource layer never talks to the network directly. Everything it
//! needs from the remote service goes through the [`DataStore`] trait:
//!
//! - [`DataStore::fetch`]: the full representation of one resource
//! - [`DataStore::save`]: persist the dirty properties of a resource
//! - [`DataStore::create`]: create a new resource under a parent collection
//! - [`DataStore::delete`]: remove a resource
//! - [`DataStore::query`]: one page of a collection query
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryDataStore`]: an in-process store for tests and offline use
//! - [`HttpDataStore`]: a thin JSON-over-HTTP store built on `reqwest`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use identity_sdk::datastore::{DataStore, MemoryDataStore, QueryParams};
//! use identity_sdk::resource::Href;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryDataStore::new();
//! let href = Href::new("/organizations/1").unwrap();
//! store.insert(&href, json!({"name": "Acme"}).as_object().unwrap().clone());
//!
//! let properties = store.fetch(&href).await.unwrap();
//! assert_eq!(properties["name"], "Acme");
//! # });
//! ```

mod http;
mod memory;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{ClientConfig, DEFAULT_PAGE_LIMIT};
use crate::resource::{Href, PropertyMap, ResourceError};

pub use http::HttpDataStore;
pub use memory::MemoryDataStore;

/// The service the resource layer fetches from and persists to.
///
/// The store is shared by every resource created through it and has no
/// ownership over resource instances, only the authority to populate them.
/// Implementations must report errors with the variants documented on each
/// method; the resource layer passes them to callers unchanged.
#[async_trait]
pub trait DataStore: Send + Sync + fmt::Debug {
    /// Returns the full representation of the resource at `href`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::ResourceNotFound`] if the resource does not exist,
    /// [`ResourceError::Transport`] for transport failures.
    async fn fetch(&self, href: &Href) -> Result<PropertyMap, ResourceError>;

    /// Persists `properties` (the dirty subset) to the resource at `href`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Persistence`] if the store refuses the update.
    async fn save(&self, href: &Href, properties: &PropertyMap) -> Result<(), ResourceError>;

    /// Creates a resource in the collection at `parent`.
    ///
    /// Returns the created representation, including its server-assigned `href`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Persistence`] if the store refuses the resource.
    async fn create(
        &self,
        parent: &Href,
        properties: &PropertyMap,
    ) -> Result<PropertyMap, ResourceError>;

    /// Deletes the resource at `href`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::ResourceNotFound`] if the resource does not exist.
    async fn delete(&self, href: &Href) -> Result<(), ResourceError>;

    /// Executes one page of the collection query at `href`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Query`] if the store rejects the query.
    async fn query(&self, href: &Href, params: &QueryParams) -> Result<QueryResult, ResourceError>;
}

/// Pagination cursor and filters of a collection query.
///
/// `limit` is always greater than zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryParams {
    offset: u32,
    limit: u32,
    filters: BTreeMap<String, String>,
}

impl QueryParams {
    /// Creates query parameters for the given page window.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPropertyValue`] if `limit` is zero.
    pub fn new(offset: u32, limit: u32) -> Result<Self, ResourceError> {
        if limit == 0 {
            return Err(ResourceError::invalid_value(
                "limit",
                "page limit must be greater than zero",
            ));
        }
        Ok(Self {
            offset,
            limit,
            filters: BTreeMap::new(),
        })
    }

    /// Returns the first page window sized by the configured default page limit.
    #[must_use]
    pub fn first_page(config: &ClientConfig) -> Self {
        Self {
            offset: 0,
            limit: config.default_page_limit(),
            filters: BTreeMap::new(),
        }
    }

    /// Adds an attribute filter (e.g. `name=Acme`).
    #[must_use]
    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    /// Returns the index of the first item of the page.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns the maximum number of items in the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the attribute filters.
    #[must_use]
    pub const fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Returns the parameters of the following page (same limit and filters).
    #[must_use]
    pub fn next_page(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
            filters: self.filters.clone(),
        }
    }

    /// Returns the parameters as query string pairs, pagination first.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("offset".to_string(), self.offset.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }

    /// Returns the URL-encoded query string (without a leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.to_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
            filters: BTreeMap::new(),
        }
    }
}

/// One page of a collection query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    /// Representations of the page's items.
    pub items: Vec<PropertyMap>,
    /// Total number of matching items, when the store reports it.
    pub size: Option<u64>,
}

impl QueryResult {
    /// Parses a collection page body: `{"size": n, "items": [{...}, ...]}`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Malformed`] if the body is not an object with
    /// an `items` array of objects.
    pub fn from_json(href: &Href, body: Value) -> Result<Self, ResourceError> {
        let malformed = |reason: &str| ResourceError::Malformed {
            href: href.to_string(),
            reason: reason.to_string(),
        };

        let Value::Object(mut body) = body else {
            return Err(malformed("collection page is not a JSON object"));
        };

        let size = body.get("size").and_then(Value::as_u64);
        let items = match body.remove("items") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    _ => Err(malformed("collection item is not a JSON object")),
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => return Err(malformed("collection page has no 'items'")),
            Some(_) => return Err(malformed("'items' is not an array")),
        };

        Ok(Self { items, size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_params_reject_zero_limit() {
        assert!(QueryParams::new(0, 0).is_err());
        assert!(QueryParams::new(10, 1).is_ok());
    }

    #[test]
    fn test_next_page_advances_offset_by_limit() {
        let params = QueryParams::new(0, 25).unwrap().with_filter("name", "Acme");
        let next = params.next_page();
        assert_eq!(next.offset(), 25);
        assert_eq!(next.limit(), 25);
        assert_eq!(next.filters(), params.filters());
        assert_eq!(next.next_page().offset(), 50);
    }

    #[test]
    fn test_query_string_is_encoded() {
        let params = QueryParams::new(50, 25)
            .unwrap()
            .with_filter("name", "Acme Corp");
        assert_eq!(params.to_query_string(), "offset=50&limit=25&name=Acme%20Corp");
    }

    #[test]
    fn test_default_uses_default_page_limit() {
        let params = QueryParams::default();
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_first_page_uses_configured_limit() {
        let config = ClientConfig::builder()
            .base_url(crate::config::BaseUrl::new("https://api.example.com").unwrap())
            .default_page_limit(100)
            .build()
            .unwrap();
        let params = QueryParams::first_page(&config);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 100);
    }

    #[test]
    fn test_query_result_parses_items_and_size() {
        let href = Href::new("/organizations").unwrap();
        let result = QueryResult::from_json(
            &href,
            json!({"offset": 0, "limit": 25, "size": 2, "items": [{"name": "a"}, {"name": "b"}]}),
        )
        .unwrap();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.size, Some(2));
    }

    #[test]
    fn test_query_result_rejects_malformed_bodies() {
        let href = Href::new("/organizations").unwrap();
        assert!(matches!(
            QueryResult::from_json(&href, json!([])),
            Err(ResourceError::Malformed { .. })
        ));
        assert!(matches!(
            QueryResult::from_json(&href, json!({"items": [1, 2]})),
            Err(ResourceError::Malformed { .. })
        ));
        assert!(matches!(
            QueryResult::from_json(&href, json!({"items": null})),
            Err(ResourceError::Malformed { .. })
        ));
    }

    #[test]
    fn test_query_result_without_items_is_malformed() {
        let href = Href::new("/organizations").unwrap();
        assert!(matches!(
            QueryResult::from_json(&href, json!({"size": 0})),
            Err(ResourceError::Malformed { .. })
        ));
        assert!(QueryResult::from_json(&href, json!({"size": 0, "items": []}))
            .unwrap()
            .items
            .is_empty());
    }
}
