//! Storefront API routes
//!
//! Mirrors the remote API under `/api`; test controls live under
//! `/__mock`.

mod brands;
mod categories;
mod control;
mod reviews;
mod users;
mod wishlists;

use axum::Router;
use axum::extract::Multipart;
use shared::{Page, PageRequest};

use crate::error::{MockError, MockResult};
use crate::state::{CurrentUser, MockState};

/// Every API route, relative to `/api`
pub fn api_routes() -> Router<MockState> {
    Router::new()
        .merge(brands::routes())
        .merge(categories::routes())
        .merge(reviews::routes())
        .merge(wishlists::routes())
        .merge(users::routes())
}

pub fn control_routes() -> Router<MockState> {
    control::routes()
}

/// Sort and slice a collection
///
/// `field_value` maps an item and a sort field to a comparable string;
/// unknown fields keep insertion order.
pub(crate) fn paginate<T: Clone>(
    mut items: Vec<T>,
    request: &PageRequest,
    field_value: impl Fn(&T, &str) -> Option<String>,
) -> MockResult<Page<T>> {
    if request.size == 0 {
        return Err(MockError::Validation(
            "Page size must not be less than one".to_string(),
        ));
    }
    if let Some((field, descending)) = request.sort_order() {
        items.sort_by(|a, b| {
            let ord = field_value(a, field).cmp(&field_value(b, field));
            if descending { ord.reverse() } else { ord }
        });
    }
    Ok(Page::from_slice(&items, request))
}

/// Catalog writes are for admins and sellers
pub(crate) fn require_catalog_role(user: &CurrentUser, resource: &str) -> MockResult<()> {
    if user.role.can_manage_catalog() {
        Ok(())
    } else {
        Err(MockError::Forbidden(format!(
            "You don't have permission to manage {}",
            resource
        )))
    }
}

/// File name of the `image` field of a multipart upload
pub(crate) async fn read_image(mut multipart: Multipart) -> MockResult<String> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("image") {
            let file_name = field
                .file_name()
                .filter(|n| !n.is_empty())
                .unwrap_or("upload")
                .to_string();
            let data = field.bytes().await?;
            if data.is_empty() {
                return Err(MockError::Validation("Image file is empty".to_string()));
            }
            return Ok(file_name);
        }
    }
    Err(MockError::Validation(
        "Required part 'image' is not present".to_string(),
    ))
}

/// URL-safe slug of a display name
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
