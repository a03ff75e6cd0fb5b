//! User Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User role
///
/// Unknown roles are kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Seller,
    Customer,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::Seller => "SELLER",
            Role::Customer => "CUSTOMER",
            Role::Other(role) => role,
        }
    }

    /// Whether this role may manage catalog entries
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, Role::Admin | Role::Seller)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ADMIN" => Role::Admin,
            "SELLER" => Role::Seller,
            "CUSTOMER" => Role::Customer,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User profile projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    pub role: Role,
}

/// Update profile payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Change password payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_unknown_values() {
        let role: Role = serde_json::from_str("\"MODERATOR\"").unwrap();
        assert_eq!(role, Role::Other("MODERATOR".to_string()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"MODERATOR\"");

        let role: Role = serde_json::from_str("\"SELLER\"").unwrap();
        assert!(role.can_manage_catalog());
        assert!(!Role::Customer.can_manage_catalog());
    }

    #[test]
    fn test_profile_update_rejects_bad_email() {
        let update = ProfileUpdate {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_password_change_min_length() {
        let change = PasswordChange {
            current_password: "old-secret".to_string(),
            new_password: "12345".to_string(),
        };
        assert!(change.validate().is_err());
    }
}
