//! Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Derived from the name by the server
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_count: Option<i64>,
    /// Parent category id; the API does not reject cycles
    #[serde(default)]
    pub parent: Option<String>,
}

impl Category {
    /// Client-writable projection of this category
    pub fn to_input(&self) -> CategoryInput {
        CategoryInput {
            name: self.name.clone(),
            description: self.description.clone(),
            parent: self.parent.clone(),
        }
    }

    /// Categories that may be offered as a parent for `editing`
    ///
    /// Excludes the category itself. Deeper cycles are not filtered.
    pub fn parent_candidates<'a>(
        all: &'a [Category],
        editing: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Category> + 'a {
        all.iter()
            .filter(move |c| editing.is_none() || c.id.as_deref() != editing)
    }
}

/// Create / update category payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
}
