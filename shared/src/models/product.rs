//! Product Model
//!
//! Only the product projections that other storefront resources embed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product image reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: String,
    pub product_id: String,
    pub image_url: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Product summary as listed inside a wishlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub sku: String,
    #[serde(alias = "active")]
    pub is_active: bool,
    pub min_price: Decimal,
    #[serde(default)]
    pub primary_image: Option<ProductImage>,
    pub brand: String,
}
