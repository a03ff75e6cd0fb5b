//! Brand handlers

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use shared::models::{Brand, BrandInput};
use shared::{Page, PageRequest, Validate};

use super::{paginate, read_image, require_catalog_role};
use crate::error::{MockError, MockResult};
use crate::state::{CurrentUser, MockState, now};

const RESOURCE: &str = "Brand";

pub fn routes() -> Router<MockState> {
    Router::new()
        .route("/brands", get(list).post(create))
        // Must be before /brands/{id} to avoid path conflicts
        .route("/brands/active", get(list_active))
        .route("/brands/{id}", get(get_by_id).put(update).delete(delete))
        .route("/brands/{id}/image", post(upload_image).delete(delete_image))
}

fn sort_field(brand: &Brand, field: &str) -> Option<String> {
    match field {
        "name" => Some(brand.name.to_lowercase()),
        "createdAt" => brand.created_at.map(|t| t.to_string()),
        "productCount" => brand.product_count.map(|c| format!("{:012}", c)),
        _ => None,
    }
}

/// GET /api/brands
async fn list(
    State(state): State<MockState>,
    Query(request): Query<PageRequest>,
) -> MockResult<Json<Page<Brand>>> {
    let brands = state.db().read().await.brands.clone();
    Ok(Json(paginate(brands, &request, sort_field)?))
}

/// GET /api/brands/active
async fn list_active(
    State(state): State<MockState>,
    Query(request): Query<PageRequest>,
) -> MockResult<Json<Page<Brand>>> {
    let brands: Vec<Brand> = state
        .db()
        .read()
        .await
        .brands
        .iter()
        .filter(|b| b.is_active)
        .cloned()
        .collect();
    Ok(Json(paginate(brands, &request, sort_field)?))
}

/// GET /api/brands/{id}
async fn get_by_id(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> MockResult<Json<Brand>> {
    let db = state.db().read().await;
    db.brands
        .iter()
        .find(|b| b.id.as_deref() == Some(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::not_found(RESOURCE, &id))
}

/// POST /api/brands
async fn create(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<BrandInput>,
) -> MockResult<(StatusCode, Json<Brand>)> {
    require_catalog_role(&user, "brands")?;
    input.validate()?;

    let mut db = state.db().write().await;
    if db.brands.iter().any(|b| b.name.eq_ignore_ascii_case(&input.name)) {
        return Err(MockError::Conflict(format!(
            "Brand with name '{}' already exists",
            input.name
        )));
    }
    let now = now();
    let brand = Brand {
        id: Some(state.next_id("brand")),
        product_count: Some(db.brand_product_count(&input.name)),
        name: input.name,
        description: input.description,
        image_url: None,
        website: input.website.filter(|w| !w.is_empty()),
        is_active: input.is_active,
        created_at: Some(now),
        updated_at: Some(now),
    };
    db.brands.push(brand.clone());
    tracing::info!(id = ?brand.id, name = %brand.name, "brand created");
    Ok((StatusCode::CREATED, Json(brand)))
}

/// PUT /api/brands/{id}
async fn update(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(input): Json<BrandInput>,
) -> MockResult<Json<Brand>> {
    require_catalog_role(&user, "brands")?;
    input.validate()?;

    let mut db = state.db().write().await;
    if db.brands.iter().any(|b| {
        b.id.as_deref() != Some(id.as_str()) && b.name.eq_ignore_ascii_case(&input.name)
    }) {
        return Err(MockError::Conflict(format!(
            "Brand with name '{}' already exists",
            input.name
        )));
    }
    let product_count = db.brand_product_count(&input.name);
    let brand = db
        .brands
        .iter_mut()
        .find(|b| b.id.as_deref() == Some(id.as_str()))
        .ok_or_else(|| MockError::not_found(RESOURCE, &id))?;
    brand.name = input.name;
    brand.description = input.description;
    brand.website = input.website.filter(|w| !w.is_empty());
    brand.is_active = input.is_active;
    brand.product_count = Some(product_count);
    brand.updated_at = Some(now());
    Ok(Json(brand.clone()))
}

/// DELETE /api/brands/{id}
async fn delete(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    require_catalog_role(&user, "brands")?;
    let mut db = state.db().write().await;
    let before = db.brands.len();
    db.brands.retain(|b| b.id.as_deref() != Some(id.as_str()));
    if db.brands.len() == before {
        return Err(MockError::not_found(RESOURCE, &id));
    }
    tracing::info!(%id, "brand deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/brands/{id}/image
async fn upload_image(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> MockResult<Json<Brand>> {
    require_catalog_role(&user, "brands")?;
    let file_name = read_image(multipart).await?;
    set_image(&state, &id, Some(format!("/images/brands/{}/{}", id, file_name))).await
}

/// DELETE /api/brands/{id}/image
async fn delete_image(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> MockResult<Json<Brand>> {
    require_catalog_role(&user, "brands")?;
    set_image(&state, &id, None).await
}

async fn set_image(state: &MockState, id: &str, image_url: Option<String>) -> MockResult<Json<Brand>> {
    let mut db = state.db().write().await;
    let brand = db
        .brands
        .iter_mut()
        .find(|b| b.id.as_deref() == Some(id))
        .ok_or_else(|| MockError::not_found(RESOURCE, id))?;
    brand.image_url = image_url;
    brand.updated_at = Some(now());
    Ok(Json(brand.clone()))
}
