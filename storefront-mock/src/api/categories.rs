//! Category handlers

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use shared::models::{Category, CategoryInput};
use shared::{Page, PageRequest, Validate};

use super::{paginate, read_image, require_catalog_role, slugify};
use crate::error::{MockError, MockResult};
use crate::state::{CurrentUser, MockDb, MockState};

const RESOURCE: &str = "Category";

pub fn routes() -> Router<MockState> {
    Router::new()
        .route("/categories", get(list).post(create))
        // Must be before /categories/{id} to avoid path conflicts
        .route("/categories/root", get(list_roots))
        .route("/categories/slug/{slug}", get(get_by_slug))
        .route(
            "/categories/{id}",
            get(get_by_id).put(update).delete(delete),
        )
        .route(
            "/categories/{id}/image",
            post(upload_image).delete(delete_image),
        )
}

fn sort_field(category: &Category, field: &str) -> Option<String> {
    match field {
        "name" => Some(category.name.to_lowercase()),
        "slug" => category.slug.clone(),
        _ => None,
    }
}

/// Slug for `name` not used by any other category
fn unique_slug(db: &MockDb, name: &str, own_id: Option<&str>) -> String {
    let base = slugify(name);
    let taken = |slug: &str| {
        db.categories
            .iter()
            .any(|c| c.slug.as_deref() == Some(slug) && c.id.as_deref() != own_id)
    };
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

fn check_parent(db: &MockDb, parent: Option<&str>) -> MockResult<()> {
    match parent {
        Some(parent) if !db.categories.iter().any(|c| c.id.as_deref() == Some(parent)) => Err(
            MockError::Validation(format!("Parent category {} does not exist", parent)),
        ),
        _ => Ok(()),
    }
}

/// GET /api/categories
async fn list(
    State(state): State<MockState>,
    Query(request): Query<PageRequest>,
) -> MockResult<Json<Page<Category>>> {
    let categories = state.db().read().await.categories.clone();
    Ok(Json(paginate(categories, &request, sort_field)?))
}

/// GET /api/categories/root
async fn list_roots(
    State(state): State<MockState>,
    Query(request): Query<PageRequest>,
) -> MockResult<Json<Page<Category>>> {
    let roots: Vec<Category> = state
        .db()
        .read()
        .await
        .categories
        .iter()
        .filter(|c| c.parent.is_none())
        .cloned()
        .collect();
    Ok(Json(paginate(roots, &request, sort_field)?))
}

/// GET /api/categories/{id}
async fn get_by_id(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> MockResult<Json<Category>> {
    let db = state.db().read().await;
    db.categories
        .iter()
        .find(|c| c.id.as_deref() == Some(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::not_found(RESOURCE, &id))
}

/// GET /api/categories/slug/{slug}
async fn get_by_slug(
    State(state): State<MockState>,
    Path(slug): Path<String>,
) -> MockResult<Json<Category>> {
    let db = state.db().read().await;
    db.categories
        .iter()
        .find(|c| c.slug.as_deref() == Some(slug.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::NotFound(format!("Category not found with slug: {}", slug)))
}

/// POST /api/categories
async fn create(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<CategoryInput>,
) -> MockResult<(StatusCode, Json<Category>)> {
    require_catalog_role(&user, "categories")?;
    input.validate()?;

    let mut db = state.db().write().await;
    check_parent(&db, input.parent.as_deref())?;
    let category = Category {
        id: Some(state.next_id("category")),
        slug: Some(unique_slug(&db, &input.name, None)),
        name: input.name,
        image_url: None,
        description: input.description,
        product_count: Some(0),
        parent: input.parent,
    };
    db.categories.push(category.clone());
    tracing::info!(id = ?category.id, slug = ?category.slug, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id}
///
/// The slug follows the name.
async fn update(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> MockResult<Json<Category>> {
    require_catalog_role(&user, "categories")?;
    input.validate()?;
    if input.parent.as_deref() == Some(id.as_str()) {
        return Err(MockError::Validation(
            "A category cannot be its own parent".to_string(),
        ));
    }

    let mut db = state.db().write().await;
    check_parent(&db, input.parent.as_deref())?;
    let slug = unique_slug(&db, &input.name, Some(&id));
    let category = db
        .categories
        .iter_mut()
        .find(|c| c.id.as_deref() == Some(id.as_str()))
        .ok_or_else(|| MockError::not_found(RESOURCE, &id))?;
    category.name = input.name;
    category.slug = Some(slug);
    category.description = input.description;
    category.parent = input.parent;
    Ok(Json(category.clone()))
}

/// DELETE /api/categories/{id}
///
/// Children are re-parented to the root.
async fn delete(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    require_catalog_role(&user, "categories")?;
    let mut db = state.db().write().await;
    let before = db.categories.len();
    db.categories.retain(|c| c.id.as_deref() != Some(id.as_str()));
    if db.categories.len() == before {
        return Err(MockError::not_found(RESOURCE, &id));
    }
    for child in db
        .categories
        .iter_mut()
        .filter(|c| c.parent.as_deref() == Some(id.as_str()))
    {
        child.parent = None;
    }
    tracing::info!(%id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/categories/{id}/image
async fn upload_image(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> MockResult<Json<Category>> {
    require_catalog_role(&user, "categories")?;
    let file_name = read_image(multipart).await?;
    set_image(
        &state,
        &id,
        Some(format!("/images/categories/{}/{}", id, file_name)),
    )
    .await
}

/// DELETE /api/categories/{id}/image
async fn delete_image(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> MockResult<Json<Category>> {
    require_catalog_role(&user, "categories")?;
    set_image(&state, &id, None).await
}

async fn set_image(
    state: &MockState,
    id: &str,
    image_url: Option<String>,
) -> MockResult<Json<Category>> {
    let mut db = state.db().write().await;
    let category = db
        .categories
        .iter_mut()
        .find(|c| c.id.as_deref() == Some(id))
        .ok_or_else(|| MockError::not_found(RESOURCE, id))?;
    category.image_url = image_url;
    Ok(Json(category.clone()))
}
