mod common;

use std::time::Duration;

use common::{ADMIN_TOKEN, Fault, admin, test_config};
use http::{Method, StatusCode};
use storefront_client::sync::keys;
use storefront_client::{
    BrandInput, CacheEvent, CategoryInput, ClientError, PageRequest, QueryStatus,
    SessionData, SessionStore, StorefrontClient,
};
use storefront_mock::MockState;

#[tokio::test]
async fn test_concurrent_reads_share_one_request() {
    let (state, client) = admin();
    state.set_latency(Duration::from_millis(50)).await;

    let page = PageRequest::default().with_sort("name,asc");
    let brands = client.brands();
    let (a, b) = tokio::join!(brands.list(&page), brands.list(&page));

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(a.content[0].name, "Acme");
    assert_eq!(state.requests_to(Method::GET, "/api/brands").await, 1);
}

#[tokio::test]
async fn test_fresh_value_is_served_from_cache() {
    let (state, client) = admin();
    let page = PageRequest::default();

    client.brands().list(&page).await.unwrap();
    client.brands().list(&page).await.unwrap();
    assert_eq!(state.request_count(), 1);

    // A different page is a different key
    client.brands().list(&PageRequest::new(0, 2)).await.unwrap();
    assert_eq!(state.request_count(), 2);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let (state, client) = admin();
    state
        .inject_fault(Fault::new(
            Method::GET,
            "/api/brands",
            StatusCode::SERVICE_UNAVAILABLE,
            2,
        ))
        .await;

    let page = client.brands().list(&PageRequest::default()).await.unwrap();
    assert_eq!(page.total_elements, 3);
    assert_eq!(state.request_count(), 3);
}

#[tokio::test]
async fn test_exhausted_retries_surface_the_last_error() {
    let (state, client) = admin();
    state
        .inject_fault(Fault::new(
            Method::GET,
            "/api/brands",
            StatusCode::INTERNAL_SERVER_ERROR,
            10,
        ))
        .await;

    let err = client
        .brands()
        .list(&PageRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Fetch brands failed: 500");
    assert_eq!(
        state.request_count(),
        u64::from(client.config().retry.max_attempts)
    );
    assert!(matches!(
        client
            .cache()
            .status(&keys::brand_page(&PageRequest::default())),
        QueryStatus::Failed(_)
    ));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (state, client) = admin();

    let err = client.brands().get("brand-missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(state.request_count(), 1);
}

#[tokio::test]
async fn test_server_message_is_preferred_over_fallback() {
    let (state, client) = admin();
    state
        .inject_fault(
            Fault::new(Method::GET, "/api/categories", StatusCode::BAD_GATEWAY, 3)
                .with_message("Upstream unavailable"),
        )
        .await;

    let err = client
        .categories()
        .list(&PageRequest::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::RemoteRejected {
            status: 502,
            message: "Upstream unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn test_update_refetches_list_and_entity() {
    let (state, client) = admin();
    let page = PageRequest::default();
    let list = client.brands().list(&page).await.unwrap();
    let acme = list.content[0].clone();
    let id = acme.id.clone().unwrap();
    client.brands().get(&id).await.unwrap();
    assert_eq!(state.request_count(), 2);

    let input = BrandInput {
        name: "Acme Corp".to_string(),
        description: acme.description.clone(),
        website: acme.website.clone(),
        is_active: true,
    };
    client.brands().update(&id, &input).await.unwrap();
    assert!(matches!(
        client.cache().status(&keys::brand(&id)),
        QueryStatus::Ready { stale: true, .. }
    ));

    let fetched = client.brands().get(&id).await.unwrap();
    assert_eq!(fetched.name, "Acme Corp");
    let list = client.brands().list(&page).await.unwrap();
    assert!(list.content.iter().any(|b| b.name == "Acme Corp"));
    // list, get, update, get, list
    assert_eq!(state.request_count(), 5);
}

#[tokio::test]
async fn test_renamed_category_is_fresh_under_both_keys() {
    let (_state, client) = admin();
    let categories = client.categories();
    let created = categories
        .create(&CategoryInput {
            name: "Boots".to_string(),
            description: None,
            parent: None,
        })
        .await
        .unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(created.slug.as_deref(), Some("boots"));

    categories.get(&id).await.unwrap();
    categories.get_by_slug("boots").await.unwrap();

    let updated = categories
        .update(
            &id,
            Some("boots"),
            &CategoryInput {
                name: "Hiking Boots".to_string(),
                description: None,
                parent: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.slug.as_deref(), Some("hiking-boots"));

    assert!(matches!(
        client.cache().status(&keys::category_by_slug("boots")),
        QueryStatus::Ready { stale: true, .. }
    ));
    assert_eq!(categories.get(&id).await.unwrap().name, "Hiking Boots");
    assert_eq!(
        categories.get_by_slug("hiking-boots").await.unwrap().id,
        Some(id)
    );
    assert!(categories.get_by_slug("boots").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_previous_slug_falls_back_to_cached_entity() {
    let (_state, client) = admin();
    let categories = client.categories();
    let shoes = categories.get_by_slug("shoes").await.unwrap();
    let id = shoes.id.clone().unwrap();
    categories.get(&id).await.unwrap();

    categories
        .update(
            &id,
            None,
            &CategoryInput {
                name: "Footwear".to_string(),
                description: shoes.description.clone(),
                parent: None,
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        client.cache().status(&keys::category_by_slug("shoes")),
        QueryStatus::Ready { stale: true, .. }
    ));
}

#[tokio::test]
async fn test_rename_reaches_slug_only_entries() {
    let (_state, client) = admin();
    let categories = client.categories();
    let created = categories
        .create(&CategoryInput {
            name: "Boots".to_string(),
            description: None,
            parent: None,
        })
        .await
        .unwrap();
    let id = created.id.clone().unwrap();
    categories.get_by_slug("boots").await.unwrap();
    assert_eq!(client.cache().status(&keys::category_by_id(&id)), QueryStatus::Idle);

    categories
        .update(
            &id,
            None,
            &CategoryInput {
                name: "Hiking Boots".to_string(),
                description: None,
                parent: None,
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        client.cache().status(&keys::category_by_slug("boots")),
        QueryStatus::Ready { stale: true, .. }
    ));
    assert!(categories.get_by_slug("boots").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_drops_slug_only_entries() {
    let (_state, client) = admin();
    let categories = client.categories();
    let running = categories.get_by_slug("running-shoes").await.unwrap();
    let id = running.id.clone().unwrap();

    categories.delete(&id, None).await.unwrap();

    assert_eq!(
        client.cache().status(&keys::category_by_slug("running-shoes")),
        QueryStatus::Idle
    );
    assert!(
        categories
            .get_by_slug("running-shoes")
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_delete_drops_entity_keys() {
    let (_state, client) = admin();
    let categories = client.categories();
    let running = categories.get_by_slug("running-shoes").await.unwrap();
    let id = running.id.clone().unwrap();
    categories.get(&id).await.unwrap();
    categories.list(&PageRequest::default()).await.unwrap();

    categories.delete(&id, Some("running-shoes")).await.unwrap();

    assert_eq!(client.cache().status(&keys::category_by_id(&id)), QueryStatus::Idle);
    assert_eq!(
        client.cache().status(&keys::category_by_slug("running-shoes")),
        QueryStatus::Idle
    );
    assert!(matches!(
        client.cache().status(&keys::category_page(&PageRequest::default())),
        QueryStatus::Ready { stale: true, .. }
    ));
    assert!(categories.get(&id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_writes_publish_cache_events() {
    let (_state, client) = admin();
    let mut events = client.subscribe();
    let page = PageRequest::default();
    client.brands().list(&page).await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        CacheEvent::Updated(keys::brand_page(&page))
    );

    client
        .brands()
        .create(&BrandInput {
            name: "Hooli".to_string(),
            description: "Making the world a better place".to_string(),
            website: None,
            is_active: true,
        })
        .await
        .unwrap();
    assert!(matches!(
        events.recv().await.unwrap(),
        CacheEvent::Invalidated(_)
    ));
}

#[tokio::test]
async fn test_clients_sharing_a_session_see_sign_in() {
    let state = MockState::seeded();
    let session = SessionStore::new();
    let client = StorefrontClient::builder()
        .config(test_config())
        .session(session.clone())
        .with_router(storefront_mock::router(state.clone()))
        .build()
        .unwrap();
    let product = common::first_product(&state).await;

    assert!(client.reviews().list_for_product(&product, 0, 5).await.is_err());
    session.set(SessionData {
        token: Some(ADMIN_TOKEN.to_string()),
        user: None,
    });
    let page = client.reviews().list_for_product(&product, 0, 5).await.unwrap();
    assert!(page.content.is_empty());

    let other = common::client(&state, None);
    assert!(!other.session().is_authenticated());
}
