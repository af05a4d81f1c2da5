//! Paginated collection resources.
//!
//! A [`CollectionResource`] is one page of a collection query: the query
//! href, the page window ([`QueryParams`]) and, once fetched, the page items.
//! The page is fetched lazily on first access and frozen afterwards.
//! Advancing never mutates a collection; [`CollectionResource::next_page`]
//! returns a new one.
//!
//! # Example
//!
//! ```rust,ignore
//! use identity_sdk::datastore::QueryParams;
//! use identity_sdk::resource::{ModeledEmailTemplate, ResourceType};
//!
//! let templates = policy
//!     .verification_email_templates(QueryParams::new(0, 25)?)
//!     .await?;
//!
//! // One page
//! for template in templates.items().await? {
//!     println!("{:?}", template.name().await?);
//! }
//!
//! // Every page
//! let mut iter = templates.iter();
//! while let Some(template) = iter.next().await {
//!     let template: ModeledEmailTemplate = template?;
//! }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::datastore::{DataStore, QueryParams};
use crate::resource::{Href, ResourceError, ResourceType};

#[derive(Debug)]
struct Page<T> {
    items: Vec<T>,
    size: Option<u64>,
}

/// One page of a collection query over resources of type `T`.
#[derive(Debug)]
pub struct CollectionResource<T: ResourceType> {
    data_store: Arc<dyn DataStore>,
    href: Href,
    params: QueryParams,
    page: OnceCell<Page<T>>,
    end_of_sequence: bool,
}

impl<T: ResourceType> CollectionResource<T> {
    /// Creates a collection page; nothing is fetched until items are read.
    #[must_use]
    pub fn new(data_store: Arc<dyn DataStore>, href: Href, params: QueryParams) -> Self {
        Self {
            data_store,
            href,
            params,
            page: OnceCell::new(),
            end_of_sequence: false,
        }
    }

    /// A page past the end of the sequence. Resolved empty, never queried.
    fn past_end(&self, params: QueryParams, size: Option<u64>) -> Self {
        Self {
            data_store: self.data_store.clone(),
            href: self.href.clone(),
            params,
            page: OnceCell::new_with(Some(Page {
                items: Vec::new(),
                size,
            })),
            end_of_sequence: true,
        }
    }

    /// Returns the collection href.
    #[must_use]
    pub const fn href(&self) -> &Href {
        &self.href
    }

    /// Returns the index of the first item of this page.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.params.offset()
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.params.limit()
    }

    /// Returns the query parameters of this page.
    #[must_use]
    pub const fn query_params(&self) -> &QueryParams {
        &self.params
    }

    /// Returns the href with the encoded query string of this page.
    #[must_use]
    pub fn query_href(&self) -> String {
        format!("{}?{}", self.href, self.params.to_query_string())
    }

    async fn page(&self) -> Result<&Page<T>, ResourceError> {
        self.page.get_or_try_init(|| self.fetch_page()).await
    }

    async fn fetch_page(&self) -> Result<Page<T>, ResourceError> {
        let result = match self.data_store.query(&self.href, &self.params).await {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(query = %self.query_href(), error = %error, "collection query failed");
                return Err(error);
            }
        };

        let mut items = result.items;
        let limit = self.params.limit() as usize;
        if items.len() > limit {
            tracing::warn!(
                query = %self.query_href(),
                returned = items.len(),
                limit,
                "store returned more items than requested, truncating"
            );
            items.truncate(limit);
        }

        tracing::debug!(
            query = %self.query_href(),
            items = items.len(),
            size = ?result.size,
            "fetched collection page"
        );

        Ok(Page {
            items: items
                .into_iter()
                .map(|properties| T::from_properties(self.data_store.clone(), properties))
                .collect(),
            size: result.size,
        })
    }

    /// Returns the items of this page, querying the store on first access.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Query`] if the store rejects the query.
    pub async fn items(&self) -> Result<&[T], ResourceError> {
        self.page().await.map(|page| page.items.as_slice())
    }

    /// Consumes the collection, returning the items of this page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Query`] if the store rejects the query.
    pub async fn into_items(self) -> Result<Vec<T>, ResourceError> {
        self.page().await?;
        Ok(self.page.into_inner().map(|page| page.items).unwrap_or_default())
    }

    /// Returns the total number of matching items, when the store reports it.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Query`] if the store rejects the query.
    pub async fn size(&self) -> Result<Option<u64>, ResourceError> {
        self.page().await.map(|page| page.size)
    }

    /// Returns `true` if no items follow this page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Query`] if the store rejects the query.
    pub async fn is_last_page(&self) -> Result<bool, ResourceError> {
        if self.end_of_sequence {
            return Ok(true);
        }
        let page = self.page().await?;
        Ok(Self::exhausts(&self.params, page))
    }

    fn exhausts(params: &QueryParams, page: &Page<T>) -> bool {
        let end = u64::from(params.offset()) + page.items.len() as u64;
        page.items.len() < params.limit() as usize || page.size.is_some_and(|size| end >= size)
    }

    /// Returns the following page: same limit and filters, offset advanced by limit.
    ///
    /// When this page is the last one the returned collection is already
    /// resolved to no items and never reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Query`] if this page has not been fetched
    /// yet and the store rejects the query.
    pub async fn next_page(&self) -> Result<Self, ResourceError> {
        let next = self.params.next_page();
        if self.end_of_sequence {
            return Ok(self.past_end(next, None));
        }
        let page = self.page().await?;
        if Self::exhausts(&self.params, page) {
            return Ok(self.past_end(next, page.size));
        }
        Ok(Self::new(self.data_store.clone(), self.href.clone(), next))
    }

    /// Returns a lazy iterator over the items of this page and every page after it.
    ///
    /// Each iterator queries the store afresh from this page's offset.
    #[must_use]
    pub fn iter(&self) -> CollectionIter<T> {
        CollectionIter {
            current: Some(Self::new(
                self.data_store.clone(),
                self.href.clone(),
                self.params.clone(),
            )),
            buffer: VecDeque::new(),
        }
    }
}

/// Lazy iterator over every item of a paginated collection.
///
/// Pages are queried one at a time as the buffer drains. Iteration ends after
/// the first page that is shorter than the limit, or after an error.
#[derive(Debug)]
pub struct CollectionIter<T: ResourceType> {
    current: Option<CollectionResource<T>>,
    buffer: VecDeque<T>,
}

impl<T: ResourceType> CollectionIter<T> {
    /// Returns the next item, or `None` at the end of the sequence.
    pub async fn next(&mut self) -> Option<Result<T, ResourceError>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            let current = self.current.take()?;
            let following = match current.next_page().await {
                Ok(following) => following,
                Err(error) => return Some(Err(error)),
            };
            match current.into_items().await {
                Ok(items) => self.buffer.extend(items),
                Err(error) => return Some(Err(error)),
            }
            if !following.end_of_sequence {
                self.current = Some(following);
            }
        }
    }

    /// Drains the iterator into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first query error encountered.
    pub async fn collect_all(mut self) -> Result<Vec<T>, ResourceError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::MemoryDataStore;
    use crate::resource::{InstanceResource, PropertyDescriptor, PropertyRegistry};
    use serde_json::json;
    use std::sync::OnceLock;

    #[derive(Debug)]
    struct Item(InstanceResource);

    impl ResourceType for Item {
        const TYPE_NAME: &'static str = "Item";

        fn registry() -> &'static PropertyRegistry {
            static REGISTRY: OnceLock<PropertyRegistry> = OnceLock::new();
            REGISTRY.get_or_init(|| {
                PropertyRegistry::define("Item", &[PropertyDescriptor::string("name")])
            })
        }

        fn from_resource(resource: InstanceResource) -> Self {
            Self(resource)
        }

        fn resource(&self) -> &InstanceResource {
            &self.0
        }

        fn into_resource(self) -> InstanceResource {
            self.0
        }
    }

    fn seeded(count: usize) -> (Arc<MemoryDataStore>, Href) {
        let store = Arc::new(MemoryDataStore::new());
        let collection = Href::new("/items").unwrap();
        for i in 0..count {
            let member = collection.child(&i.to_string());
            store.insert(&member, json!({"name": format!("item-{i}")}).as_object().unwrap().clone());
            store.add_to_collection(&collection, &member);
        }
        (store, collection)
    }

    #[tokio::test]
    async fn test_page_is_fetched_once() {
        let (store, href) = seeded(3);
        let collection: CollectionResource<Item> =
            CollectionResource::new(store.clone(), href, QueryParams::new(0, 2).unwrap());

        assert_eq!(collection.items().await.unwrap().len(), 2);
        assert_eq!(collection.size().await.unwrap(), Some(3));
        assert!(!collection.is_last_page().await.unwrap());
        assert_eq!(store.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_next_page_past_end_skips_store() {
        let (store, href) = seeded(3);
        let collection: CollectionResource<Item> =
            CollectionResource::new(store.clone(), href, QueryParams::new(0, 2).unwrap());

        let second = collection.next_page().await.unwrap();
        assert_eq!(second.offset(), 2);
        assert_eq!(second.items().await.unwrap().len(), 1);
        assert!(second.is_last_page().await.unwrap());

        let third = second.next_page().await.unwrap();
        assert!(third.items().await.unwrap().is_empty());
        assert!(third.is_last_page().await.unwrap());
        assert_eq!(store.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_query_href_carries_window() {
        let (store, href) = seeded(0);
        let collection: CollectionResource<Item> =
            CollectionResource::new(store, href, QueryParams::new(50, 25).unwrap());
        assert_eq!(collection.query_href(), "/items?offset=50&limit=25");
    }

    #[tokio::test]
    async fn test_iterator_restarts_from_collection_offset() {
        let (store, href) = seeded(5);
        let collection: CollectionResource<Item> =
            CollectionResource::new(store, href, QueryParams::new(1, 2).unwrap());

        assert_eq!(collection.iter().collect_all().await.unwrap().len(), 4);
        assert_eq!(collection.iter().collect_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_query_surfaces_error() {
        let store = Arc::new(MemoryDataStore::new());
        let collection: CollectionResource<Item> = CollectionResource::new(
            store,
            Href::new("/unknown").unwrap(),
            QueryParams::default(),
        );
        assert!(matches!(
            collection.items().await,
            Err(ResourceError::Query { .. })
        ));

        let mut iter = collection.iter();
        assert!(matches!(iter.next().await, Some(Err(ResourceError::Query { .. }))));
        assert!(iter.next().await.is_none());
    }
}
