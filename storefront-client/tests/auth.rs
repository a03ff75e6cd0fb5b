mod common;

use common::{CUSTOMER_ID, CUSTOMER_TOKEN, client};
use storefront_client::sync::keys;
use storefront_client::{
    BrandInput, CategoryInput, ClientError, PageRequest, QueryStatus, ReviewCreate, SessionData,
    WishlistCreate,
};
use storefront_mock::MockState;

fn review(product_id: &str) -> ReviewCreate {
    ReviewCreate {
        product_id: product_id.to_string(),
        user_id: CUSTOMER_ID.to_string(),
        title: "Great".to_string(),
        rating: 5,
        comment: "Comfortable from day one".to_string(),
    }
}

fn brand_input(name: &str) -> BrandInput {
    BrandInput {
        name: name.to_string(),
        description: "A new brand".to_string(),
        website: None,
        is_active: true,
    }
}

#[tokio::test]
async fn test_writes_without_token_never_reach_the_server() {
    let state = MockState::seeded();
    let client = client(&state, None);
    let product = common::first_product(&state).await;

    let err = client.reviews().create(&review(&product)).await.unwrap_err();
    assert_eq!(err, ClientError::AuthenticationRequired);

    let err = client.brands().create(&brand_input("Hooli")).await.unwrap_err();
    assert_eq!(err, ClientError::AuthenticationRequired);

    let input = CategoryInput {
        name: "Boots".to_string(),
        description: None,
        parent: None,
    };
    let err = client.categories().create(&input).await.unwrap_err();
    assert_eq!(err, ClientError::AuthenticationRequired);

    let outcome = client
        .brands()
        .create_with_image(&brand_input("Hooli"), None)
        .await;
    assert_eq!(
        outcome.error(),
        Some(&ClientError::AuthenticationRequired)
    );

    assert_eq!(state.request_count(), 0);
}

#[tokio::test]
async fn test_protected_read_without_token_fails_once() {
    let state = MockState::seeded();
    let client = client(&state, None);
    let product = common::first_product(&state).await;

    let err = client
        .reviews()
        .list_for_product(&product, 0, 5)
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(state.request_count(), 0);
}

#[tokio::test]
async fn test_public_catalog_reads_need_no_token() {
    let state = MockState::seeded();
    let client = client(&state, None);

    let brands = client.brands().list(&PageRequest::default()).await.unwrap();
    assert_eq!(brands.total_elements, 3);

    let shoes = client.categories().get_by_slug("shoes").await.unwrap();
    assert_eq!(shoes.name, "Shoes");
    assert_eq!(state.request_count(), 2);
}

#[tokio::test]
async fn test_membership_is_false_when_signed_out() {
    let state = MockState::seeded();
    let client = client(&state, None);
    let product = common::first_product(&state).await;

    assert!(!client.wishlists().contains("any", &product).await.unwrap());
    assert_eq!(state.request_count(), 0);
}

#[tokio::test]
async fn test_customer_cannot_manage_catalog() {
    let state = MockState::seeded();
    let client = client(&state, Some(CUSTOMER_TOKEN));

    let err = client.brands().create(&brand_input("Hooli")).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(!err.to_string().is_empty());
    assert_eq!(state.request_count(), 1);
}

#[tokio::test]
async fn test_signing_out_clears_access() {
    let state = MockState::seeded();
    let client = client(&state, Some(CUSTOMER_TOKEN));
    let product = common::first_product(&state).await;

    client.reviews().list_for_product(&product, 0, 5).await.unwrap();
    client.session().clear();

    let err = client.reviews().create(&review(&product)).await.unwrap_err();
    assert_eq!(err, ClientError::AuthenticationRequired);
    assert_eq!(state.request_count(), 1);
}

#[tokio::test]
async fn test_cached_private_reads_need_a_session() {
    let state = MockState::seeded();
    let client = client(&state, Some(CUSTOMER_TOKEN));
    let product = common::first_product(&state).await;
    client
        .wishlists()
        .create(&WishlistCreate {
            name: "Birthday".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(client.wishlists().list_mine().await.unwrap().len(), 1);
    client.reviews().list_for_product(&product, 0, 5).await.unwrap();
    let sent = state.request_count();

    client.session().clear();

    let err = client.wishlists().list_mine().await.unwrap_err();
    assert_eq!(err, ClientError::AuthenticationRequired);
    let err = client
        .reviews()
        .list_for_product(&product, 0, 5)
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::AuthenticationRequired);
    assert_eq!(state.request_count(), sent);
}

#[tokio::test]
async fn test_new_session_does_not_see_previous_user_data() {
    let state = MockState::seeded();
    let client = client(&state, Some(CUSTOMER_TOKEN));
    client
        .wishlists()
        .create(&WishlistCreate {
            name: "Birthday".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(client.wishlists().list_mine().await.unwrap().len(), 1);

    let other = common::other_customer(&state).await;
    client.session().set(SessionData {
        token: Some(other),
        user: None,
    });
    assert!(client.wishlists().list_mine().await.unwrap().is_empty());

    client.sign_in(SessionData {
        token: Some(CUSTOMER_TOKEN.to_string()),
        user: None,
    });
    assert_eq!(
        client.cache().status(&keys::wishlists()),
        QueryStatus::Idle
    );
    assert_eq!(client.wishlists().list_mine().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_sign_out_drops_session_data() {
    let state = MockState::seeded();
    let client = client(&state, Some(CUSTOMER_TOKEN));
    let product = common::first_product(&state).await;
    client.wishlists().list_mine().await.unwrap();
    client.reviews().list_for_product(&product, 0, 5).await.unwrap();
    client.brands().list(&PageRequest::default()).await.unwrap();

    client.sign_out();

    assert!(!client.session().is_authenticated());
    assert_eq!(
        client.cache().status(&keys::wishlists()),
        QueryStatus::Idle
    );
    assert_eq!(
        client.cache().status(&keys::review_page(&product, 0, 5)),
        QueryStatus::Idle
    );
    assert!(matches!(
        client.cache().status(&keys::brand_page(&PageRequest::default())),
        QueryStatus::Ready { stale: false, .. }
    ));
}

#[tokio::test]
async fn test_missing_token_is_reported_before_invalid_payload() {
    let state = MockState::seeded();
    let client = client(&state, None);
    let product = common::first_product(&state).await;

    let mut bad = review(&product);
    bad.rating = 9;
    let err = client.reviews().create(&bad).await.unwrap_err();
    assert_eq!(err, ClientError::AuthenticationRequired);
    assert_eq!(state.request_count(), 0);
}

#[tokio::test]
async fn test_invalid_payload_is_rejected_locally() {
    let state = MockState::seeded();
    let client = client(&state, Some(CUSTOMER_TOKEN));
    let product = common::first_product(&state).await;

    let mut bad = review(&product);
    bad.rating = 9;
    let err = client.reviews().create(&bad).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(state.request_count(), 0);
}
