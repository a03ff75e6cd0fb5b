//! Brand Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateUrl, ValidationError};

/// Brand entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Server-assigned, absent until created
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    /// Computed by the server; never part of a write payload
    #[serde(default)]
    pub product_count: Option<i64>,
}

impl Brand {
    /// Client-writable projection of this brand
    pub fn to_input(&self) -> BrandInput {
        BrandInput {
            name: self.name.clone(),
            description: self.description.clone(),
            website: self.website.clone(),
            is_active: self.is_active,
        }
    }
}

/// Create / update brand payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BrandInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_website"))]
    pub website: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Website must be empty or a valid URL
fn validate_website(website: &str) -> Result<(), ValidationError> {
    if website.is_empty() || website.validate_url() {
        return Ok(());
    }
    let mut err = ValidationError::new("url");
    err.message = Some("Please enter a valid URL".into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(website: Option<&str>) -> BrandInput {
        BrandInput {
            name: "Acme".to_string(),
            description: "Anvils and rockets".to_string(),
            website: website.map(str::to_string),
            is_active: true,
        }
    }

    #[test]
    fn test_brand_input_website_rules() {
        assert!(input(None).validate().is_ok());
        assert!(input(Some("")).validate().is_ok());
        assert!(input(Some("https://acme.example.com")).validate().is_ok());
        assert!(input(Some("not a url")).validate().is_err());
    }

    #[test]
    fn test_brand_input_requires_name_and_description() {
        let mut brand = input(None);
        brand.name.clear();
        let errors = brand.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let mut brand = input(None);
        brand.description.clear();
        assert!(brand.validate().is_err());
    }

    #[test]
    fn test_brand_deserializes_spring_timestamps() {
        let json = r#"{
            "id": "b-1",
            "name": "Acme",
            "description": "Anvils",
            "imageUrl": null,
            "isActive": true,
            "createdAt": "2024-05-01T10:00:00",
            "updatedAt": "2024-05-01T10:00:00.123456",
            "productCount": 4
        }"#;
        let brand: Brand = serde_json::from_str(json).unwrap();
        assert_eq!(brand.product_count, Some(4));
        assert!(brand.created_at.is_some());
        assert!(brand.website.is_none());
    }

    #[test]
    fn test_input_has_no_product_count() {
        let value = serde_json::to_value(input(None)).unwrap();
        assert!(value.get("productCount").is_none());
        assert!(value.get("id").is_none());
        assert_eq!(value["isActive"], true);
    }
}
