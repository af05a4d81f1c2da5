//! Integration tests for the HTTP data store.
//!
//! These tests run the store against a local mock server and verify the
//! request shapes and the mapping of response statuses to resource errors.

use std::sync::Arc;

use identity_sdk::datastore::{DataStore, HttpDataStore, QueryParams};
use identity_sdk::resource::{
    AccountCreationPolicy, EmailStatus, Href, Organization, ResourceError, ResourceType,
};
use identity_sdk::{ApiKeyId, ApiKeySecret, BaseUrl, ClientConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a store pointed at the mock server.
fn create_store(server: &MockServer) -> Arc<HttpDataStore> {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .api_key(
            ApiKeyId::new("id").unwrap(),
            ApiKeySecret::new("secret").unwrap(),
        )
        .build()
        .unwrap();
    Arc::new(HttpDataStore::new(&config).unwrap())
}

fn href(s: &str) -> Href {
    Href::new(s).unwrap()
}

// ============================================================================
// Status Mapping
// ============================================================================

#[tokio::test]
async fn test_fetch_sends_basic_credentials_and_parses_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/1"))
        .and(header("Authorization", "Basic aWQ6c2VjcmV0"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": "/organizations/1",
            "name": "Acme"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = create_store(&server);
    let properties = store.fetch(&href("/organizations/1")).await.unwrap();
    assert_eq!(properties["name"], "Acme");
}

#[tokio::test]
async fn test_fetch_404_is_resource_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "message": "The requested resource does not exist."
        })))
        .mount(&server)
        .await;

    let store = create_store(&server);
    let result = store.fetch(&href("/organizations/missing")).await;
    assert!(matches!(result, Err(ResourceError::ResourceNotFound { href }) if href == "/organizations/missing"));
}

#[tokio::test]
async fn test_fetch_500_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("x-request-id", "req-42")
                .set_body_json(json!({"message": "boom"})),
        )
        .mount(&server)
        .await;

    let store = create_store(&server);
    match store.fetch(&href("/organizations/1")).await {
        Err(ResourceError::Transport(identity_sdk::HttpError::Response(error))) => {
            assert_eq!(error.code, 500);
            assert_eq!(error.message, "boom");
            assert_eq!(error.error_reference.as_deref(), Some("req-42"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_of_non_object_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let store = create_store(&server);
    assert!(matches!(
        store.fetch(&href("/organizations/1")).await,
        Err(ResourceError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_fetch_of_non_json_success_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let store = create_store(&server);
    assert!(matches!(
        store.fetch(&href("/organizations/1")).await,
        Err(ResourceError::Malformed { href, .. }) if href == "/organizations/1"
    ));

    let org = Organization::from_href(store, href("/organizations/1"));
    assert!(matches!(org.name().await, Err(ResourceError::Malformed { .. })));
    assert!(!org.is_materialized().await);
}

#[tokio::test]
async fn test_create_with_non_json_success_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .mount(&server)
        .await;

    let store = create_store(&server);
    let properties = json!({"name": "Acme"}).as_object().unwrap().clone();
    assert!(matches!(
        store.create(&href("/organizations"), &properties).await,
        Err(ResourceError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_save_failure_is_persistence_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizations/1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "code": 2000,
            "message": "Invalid request.",
            "developerMessage": "Organization nameKey is already in use."
        })))
        .mount(&server)
        .await;

    let store = create_store(&server);
    let changes = json!({"nameKey": "taken"}).as_object().unwrap().clone();
    match store.save(&href("/organizations/1"), &changes).await {
        Err(ResourceError::Persistence { message, .. }) => {
            assert_eq!(message, "Organization nameKey is already in use.");
        }
        other => panic!("expected persistence error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_query_sends_window_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .and(query_param("offset", "25"))
        .and(query_param("limit", "25"))
        .and(query_param("name", "Acme Corp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 25,
            "limit": 25,
            "size": 26,
            "items": [{"href": "/organizations/26", "name": "Acme Corp"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = create_store(&server);
    let params = QueryParams::new(25, 25).unwrap().with_filter("name", "Acme Corp");
    let result = store.query(&href("/organizations"), &params).await.unwrap();
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.size, Some(26));
}

#[tokio::test]
async fn test_query_failure_is_query_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "bad filter"})))
        .mount(&server)
        .await;

    let store = create_store(&server);
    assert!(matches!(
        store.query(&href("/organizations"), &QueryParams::default()).await,
        Err(ResourceError::Query { message, .. }) if message == "bad filter"
    ));
}

#[tokio::test]
async fn test_query_of_non_json_success_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let store = create_store(&server);
    assert!(matches!(
        store.query(&href("/organizations"), &QueryParams::default()).await,
        Err(ResourceError::Malformed { .. })
    ));

    let list = identity_sdk::resource::OrganizationList::new(
        store,
        href("/organizations"),
        QueryParams::default(),
    );
    assert!(matches!(
        list.iter().collect_all().await,
        Err(ResourceError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_query_page_without_items_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"size": 3})))
        .mount(&server)
        .await;

    let store = create_store(&server);
    assert!(matches!(
        store.query(&href("/organizations"), &QueryParams::default()).await,
        Err(ResourceError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_delete_sends_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/organizations/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = create_store(&server);
    let org = Organization::from_href(store, href("/organizations/1"));
    org.delete().await.unwrap();
}

// ============================================================================
// Resources over HTTP
// ============================================================================

#[tokio::test]
async fn test_policy_materializes_once_and_saves_only_dirty_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accountCreationPolicies/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": format!("{}/accountCreationPolicies/abc", server.uri()),
            "verificationEmailStatus": "DISABLED",
            "verificationSuccessEmailStatus": "DISABLED",
            "welcomeEmailStatus": "DISABLED",
            "verificationEmailTemplates": {
                "href": format!("{}/accountCreationPolicies/abc/verificationEmailTemplates", server.uri())
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/accountCreationPolicies/abc"))
        .and(body_json(json!({"welcomeEmailStatus": "ENABLED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = create_store(&server);
    let policy = AccountCreationPolicy::from_href(store, href("/accountCreationPolicies/abc"));

    assert_eq!(
        policy.welcome_email_status().await.unwrap(),
        Some(EmailStatus::Disabled)
    );
    assert_eq!(
        policy.verification_email_status().await.unwrap(),
        Some(EmailStatus::Disabled)
    );

    policy
        .set_welcome_email_status(EmailStatus::Enabled)
        .await
        .unwrap();
    policy.save().await.unwrap();
    assert!(!policy.is_dirty().await);
}

#[tokio::test]
async fn test_collection_pages_over_http() {
    let server = MockServer::start().await;
    let items = |start: usize, count: usize| {
        (start..start + count)
            .map(|i| json!({"href": format!("/organizations/{i}"), "name": format!("org-{i}")}))
            .collect::<Vec<_>>()
    };
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": items(0, 2)})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": items(2, 1)})))
        .expect(1)
        .mount(&server)
        .await;

    let store = create_store(&server);
    let list = identity_sdk::resource::OrganizationList::new(
        store,
        href("/organizations"),
        QueryParams::new(0, 2).unwrap(),
    );
    let all = list.iter().collect_all().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].name().await.unwrap().as_deref(), Some("org-2"));
}
