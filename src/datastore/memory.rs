//! In-process data store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::datastore::{DataStore, QueryParams, QueryResult};
use crate::resource::{Href, PropertyMap, ResourceError};

#[derive(Debug, Default)]
struct MemoryState {
    resources: HashMap<Href, PropertyMap>,
    collections: HashMap<Href, Vec<Href>>,
    queries: Vec<(Href, QueryParams)>,
    fail_saves: Option<String>,
    next_id: u64,
}

/// A [`DataStore`] keeping representations in memory.
///
/// Collections are lists of member hrefs registered with
/// [`MemoryDataStore::add_to_collection`]; queries page over them and apply
/// filters as exact matches on string properties. Every call is counted so
/// callers can observe how often the resource layer reached the store.
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    state: Mutex<MemoryState>,
    fetches: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryDataStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a representation at `href`, replacing any previous one.
    pub fn insert(&self, href: &Href, mut properties: PropertyMap) {
        properties.insert("href".to_string(), Value::String(href.to_string()));
        self.lock().resources.insert(href.clone(), properties);
    }

    /// Registers `member` as the last item of the collection at `collection`.
    pub fn add_to_collection(&self, collection: &Href, member: &Href) {
        self.lock()
            .collections
            .entry(collection.clone())
            .or_default()
            .push(member.clone());
    }

    /// Returns the stored representation at `href`.
    #[must_use]
    pub fn get(&self, href: &Href) -> Option<PropertyMap> {
        self.lock().resources.get(href).cloned()
    }

    /// Makes every following save fail with `message` until cleared with `None`.
    pub fn fail_saves(&self, message: Option<&str>) {
        self.lock().fail_saves = message.map(ToString::to_string);
    }

    /// Returns how many fetches reached the store.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Returns how many saves reached the store, failed ones included.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Returns every query received, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<(Href, QueryParams)> {
        self.lock().queries.clone()
    }
}

fn matches_filters(properties: &PropertyMap, params: &QueryParams) -> bool {
    params
        .filters()
        .iter()
        .all(|(name, expected)| properties.get(name).and_then(Value::as_str) == Some(expected))
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn fetch(&self, href: &Href) -> Result<PropertyMap, ResourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.lock()
            .resources
            .get(href)
            .cloned()
            .ok_or_else(|| ResourceError::ResourceNotFound {
                href: href.to_string(),
            })
    }

    async fn save(&self, href: &Href, properties: &PropertyMap) -> Result<(), ResourceError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        if let Some(message) = &state.fail_saves {
            return Err(ResourceError::Persistence {
                href: href.to_string(),
                message: message.clone(),
            });
        }
        let stored = state
            .resources
            .get_mut(href)
            .ok_or_else(|| ResourceError::Persistence {
                href: href.to_string(),
                message: "no resource is stored at this href".to_string(),
            })?;
        for (name, value) in properties {
            stored.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    async fn create(
        &self,
        parent: &Href,
        properties: &PropertyMap,
    ) -> Result<PropertyMap, ResourceError> {
        let mut state = self.lock();
        if let Some(message) = &state.fail_saves {
            return Err(ResourceError::Persistence {
                href: parent.to_string(),
                message: message.clone(),
            });
        }
        state.next_id += 1;
        let href = parent.child(&state.next_id.to_string());

        let mut created = properties.clone();
        created.insert("href".to_string(), Value::String(href.to_string()));
        state.resources.insert(href.clone(), created.clone());
        state
            .collections
            .entry(parent.clone())
            .or_default()
            .push(href);
        Ok(created)
    }

    async fn delete(&self, href: &Href) -> Result<(), ResourceError> {
        let mut state = self.lock();
        if state.resources.remove(href).is_none() {
            return Err(ResourceError::ResourceNotFound {
                href: href.to_string(),
            });
        }
        for members in state.collections.values_mut() {
            members.retain(|member| member != href);
        }
        Ok(())
    }

    async fn query(&self, href: &Href, params: &QueryParams) -> Result<QueryResult, ResourceError> {
        let mut state = self.lock();
        state.queries.push((href.clone(), params.clone()));

        let members = state
            .collections
            .get(href)
            .ok_or_else(|| ResourceError::Query {
                href: href.to_string(),
                message: "unknown collection".to_string(),
            })?;

        let matching: Vec<PropertyMap> = members
            .iter()
            .filter_map(|member| state.resources.get(member))
            .filter(|properties| matches_filters(properties, params))
            .cloned()
            .collect();

        let size = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.limit() as usize)
            .collect();

        Ok(QueryResult {
            items,
            size: Some(size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn href(s: &str) -> Href {
        Href::new(s).unwrap()
    }

    fn props(value: Value) -> PropertyMap {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_fetch_counts_and_reports_missing() {
        let store = MemoryDataStore::new();
        store.insert(&href("/a/1"), props(json!({"name": "one"})));

        let fetched = store.fetch(&href("/a/1")).await.unwrap();
        assert_eq!(fetched["href"], "/a/1");
        assert!(matches!(
            store.fetch(&href("/a/2")).await,
            Err(ResourceError::ResourceNotFound { .. })
        ));
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_save_merges_and_can_be_made_to_fail() {
        let store = MemoryDataStore::new();
        store.insert(&href("/a/1"), props(json!({"name": "one", "description": "d"})));

        store
            .save(&href("/a/1"), &props(json!({"name": "uno"})))
            .await
            .unwrap();
        let stored = store.get(&href("/a/1")).unwrap();
        assert_eq!(stored["name"], "uno");
        assert_eq!(stored["description"], "d");

        store.fail_saves(Some("read only"));
        assert!(matches!(
            store.save(&href("/a/1"), &props(json!({"name": "x"}))).await,
            Err(ResourceError::Persistence { .. })
        ));
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn test_save_to_unknown_href_is_persistence_error() {
        let store = MemoryDataStore::new();
        let href = Href::new("/organizations/missing").unwrap();
        let changes = json!({"name": "Acme"}).as_object().unwrap().clone();
        assert!(matches!(
            store.save(&href, &changes).await,
            Err(ResourceError::Persistence { href, .. }) if href == "/organizations/missing"
        ));
        assert!(store.get(&Href::new("/organizations/missing").unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_create_assigns_href_and_joins_parent_collection() {
        let store = MemoryDataStore::new();
        let parent = href("/organizations");

        let created = store
            .create(&parent, &props(json!({"name": "Acme"})))
            .await
            .unwrap();
        assert_eq!(created["href"], "/organizations/1");

        let page = store
            .query(&parent, &QueryParams::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_query_pages_and_filters() {
        let store = MemoryDataStore::new();
        let collection = href("/organizations");
        for i in 0..5 {
            let member = href(&format!("/organizations/{i}"));
            let status = if i % 2 == 0 { "ENABLED" } else { "DISABLED" };
            store.insert(&member, props(json!({"name": format!("org-{i}"), "status": status})));
            store.add_to_collection(&collection, &member);
        }

        let page = store
            .query(&collection, &QueryParams::new(2, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0]["name"], "org-2");
        assert_eq!(page.size, Some(5));

        let enabled = store
            .query(
                &collection,
                &QueryParams::new(0, 10).unwrap().with_filter("status", "ENABLED"),
            )
            .await
            .unwrap();
        assert_eq!(enabled.items.len(), 3);

        assert!(matches!(
            store.query(&href("/nope"), &QueryParams::default()).await,
            Err(ResourceError::Query { .. })
        ));
        assert_eq!(store.queries().len(), 3);
    }
}
