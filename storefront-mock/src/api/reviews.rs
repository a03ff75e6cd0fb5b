//! Review handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use shared::models::{Review, ReviewAuthor, ReviewCreate};
use shared::{Page, PageRequest, Validate};

use super::paginate;
use crate::error::{MockError, MockResult};
use crate::state::{CurrentUser, MockState, now};

pub fn routes() -> Router<MockState> {
    Router::new()
        .route("/review/{product_id}/reviews", get(list_for_product))
        .route("/review/review/create", post(create))
        .route("/review/review/{id}", delete(remove))
}

#[derive(Debug, Deserialize)]
struct ReviewPage {
    #[serde(default)]
    page: u32,
    #[serde(default = "default_size")]
    size: u32,
}

fn default_size() -> u32 {
    5
}

/// GET /api/review/{product_id}/reviews, newest first
async fn list_for_product(
    State(state): State<MockState>,
    Path(product_id): Path<String>,
    Query(query): Query<ReviewPage>,
) -> MockResult<Json<Page<Review>>> {
    let reviews: Vec<Review> = state
        .db()
        .read()
        .await
        .reviews
        .iter()
        .filter(|r| r.product_id == product_id)
        .cloned()
        .collect();
    let request = PageRequest::new(query.page, query.size).with_sort("createdAt,desc");
    Ok(Json(paginate(reviews, &request, |r, field| {
        (field == "createdAt").then(|| r.created_at.map(|t| t.to_string()).unwrap_or_default())
    })?))
}

/// POST /api/review/review/create
async fn create(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<ReviewCreate>,
) -> MockResult<(StatusCode, Json<Review>)> {
    input.validate()?;
    if input.user_id != user.id {
        return Err(MockError::Forbidden(
            "Reviews can only be posted as yourself".to_string(),
        ));
    }

    let mut db = state.db().write().await;
    let author = db
        .user(&user.id)
        .map(|u| ReviewAuthor {
            id: u.id.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
            role: u.role.clone(),
        })
        .ok_or_else(|| MockError::not_found("User", &user.id))?;
    let now = now();
    let review = Review {
        id: state.next_id("review"),
        product_id: input.product_id,
        user_id: input.user_id,
        rating: input.rating,
        title: input.title,
        comment: input.comment,
        created_at: Some(now),
        updated_at: Some(now),
        user: author,
    };
    db.reviews.push(review.clone());
    Ok((StatusCode::CREATED, Json(review)))
}

/// DELETE /api/review/review/{id}; authors and admins only
async fn remove(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    let mut db = state.db().write().await;
    let index = db
        .reviews
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| MockError::not_found("Review", &id))?;
    if db.reviews[index].user_id != user.id && !user.is_admin() {
        return Err(MockError::Forbidden(
            "You can only delete your own reviews".to_string(),
        ));
    }
    db.reviews.remove(index);
    Ok(StatusCode::NO_CONTENT)
}
