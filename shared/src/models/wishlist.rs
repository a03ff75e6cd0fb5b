//! Wishlist Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::product::ProductSummary;

/// Wishlist entity
///
/// Owned by exactly one user. Product order is the server's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub id: String,
    pub name: String,
    pub user_id: String,
    #[serde(default)]
    pub products: Vec<ProductSummary>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Wishlist {
    pub fn contains(&self, product_id: &str) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }
}

/// Create wishlist payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WishlistCreate {
    #[validate(length(min = 1, message = "Wishlist name is required"))]
    pub name: String,
}

/// Rename wishlist payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WishlistRename {
    #[validate(length(min = 1, message = "Wishlist name is required"))]
    pub name: String,
}

/// Add product payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WishlistAddProduct {
    #[validate(length(min = 1, message = "Product is required"))]
    pub product_id: String,
}
