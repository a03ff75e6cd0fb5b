//! Shared types for the storefront workspace
//!
//! Wire models exchanged with the storefront REST API, the paginated
//! envelope every list endpoint returns, and the write payloads with their
//! client-side validation rules. Used by both the client and the mock server.

pub mod models;
pub mod request;
pub mod response;

// Re-exports
pub use request::PageRequest;
pub use response::{ErrorBody, Page};
pub use serde::{Deserialize, Serialize};
pub use validator::{Validate, ValidationErrors};
