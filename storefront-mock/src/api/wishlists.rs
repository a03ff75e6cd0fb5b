//! Wishlist handlers
//!
//! Every wishlist is private to its owner; other users get a 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use shared::models::{Wishlist, WishlistAddProduct, WishlistCreate, WishlistRename};
use shared::Validate;

use crate::error::{MockError, MockResult};
use crate::state::{CurrentUser, MockDb, MockState, now};

pub fn routes() -> Router<MockState> {
    Router::new()
        .route("/wishlists", get(list_mine).post(create))
        .route(
            "/wishlists/{id}",
            get(get_by_id).put(rename).delete(remove),
        )
        .route("/wishlists/{id}/add", post(add_product))
        .route(
            "/wishlists/{id}/products/{product_id}",
            delete(remove_product),
        )
        .route(
            "/wishlists/{id}/products/{product_id}/check",
            get(check_product),
        )
}

fn owned<'a>(db: &'a MockDb, id: &str, user: &CurrentUser) -> MockResult<&'a Wishlist> {
    db.wishlists
        .iter()
        .find(|w| w.id == id && w.user_id == user.id)
        .ok_or_else(|| MockError::not_found("Wishlist", id))
}

fn owned_mut<'a>(db: &'a mut MockDb, id: &str, user: &CurrentUser) -> MockResult<&'a mut Wishlist> {
    db.wishlists
        .iter_mut()
        .find(|w| w.id == id && w.user_id == user.id)
        .ok_or_else(|| MockError::not_found("Wishlist", id))
}

/// GET /api/wishlists
async fn list_mine(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
) -> Json<Vec<Wishlist>> {
    let db = state.db().read().await;
    Json(
        db.wishlists
            .iter()
            .filter(|w| w.user_id == user.id)
            .cloned()
            .collect(),
    )
}

/// GET /api/wishlists/{id}
async fn get_by_id(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> MockResult<Json<Wishlist>> {
    let db = state.db().read().await;
    owned(&db, &id, &user).map(|w| Json(w.clone()))
}

/// POST /api/wishlists
async fn create(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<WishlistCreate>,
) -> MockResult<(StatusCode, Json<Wishlist>)> {
    input.validate()?;
    let now = now();
    let wishlist = Wishlist {
        id: state.next_id("wishlist"),
        name: input.name,
        user_id: user.id.clone(),
        products: Vec::new(),
        created_at: Some(now),
        updated_at: Some(now),
    };
    state.db().write().await.wishlists.push(wishlist.clone());
    Ok((StatusCode::CREATED, Json(wishlist)))
}

/// POST /api/wishlists/{id}/add; adding a present product changes nothing
async fn add_product(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(input): Json<WishlistAddProduct>,
) -> MockResult<Json<Wishlist>> {
    input.validate()?;
    let mut db = state.db().write().await;
    let product = db
        .product(&input.product_id)
        .cloned()
        .ok_or_else(|| MockError::not_found("Product", &input.product_id))?;
    let wishlist = owned_mut(&mut db, &id, &user)?;
    if !wishlist.contains(&product.id) {
        wishlist.products.push(product);
        wishlist.updated_at = Some(now());
    }
    Ok(Json(wishlist.clone()))
}

/// DELETE /api/wishlists/{id}/products/{product_id}; removing an absent
/// product changes nothing
async fn remove_product(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, product_id)): Path<(String, String)>,
) -> MockResult<Json<Wishlist>> {
    let mut db = state.db().write().await;
    let wishlist = owned_mut(&mut db, &id, &user)?;
    if wishlist.contains(&product_id) {
        wishlist.products.retain(|p| p.id != product_id);
        wishlist.updated_at = Some(now());
    }
    Ok(Json(wishlist.clone()))
}

/// PUT /api/wishlists/{id}
async fn rename(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(input): Json<WishlistRename>,
) -> MockResult<Json<Wishlist>> {
    input.validate()?;
    let mut db = state.db().write().await;
    let wishlist = owned_mut(&mut db, &id, &user)?;
    wishlist.name = input.name;
    wishlist.updated_at = Some(now());
    Ok(Json(wishlist.clone()))
}

/// DELETE /api/wishlists/{id}
async fn remove(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    let mut db = state.db().write().await;
    owned(&db, &id, &user)?;
    db.wishlists.retain(|w| w.id != id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/wishlists/{id}/products/{product_id}/check
async fn check_product(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, product_id)): Path<(String, String)>,
) -> MockResult<Json<bool>> {
    let db = state.db().read().await;
    let wishlist = owned(&db, &id, &user)?;
    Ok(Json(wishlist.contains(&product_id)))
}
