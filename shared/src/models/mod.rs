//! Data models
//!
//! Shared between storefront-client and storefront-mock (via API).
//! IDs are opaque strings assigned by the server.

pub mod brand;
pub mod category;
pub mod product;
pub mod review;
pub mod user;
pub mod wishlist;

// Re-exports
pub use brand::*;
pub use category::*;
pub use product::*;
pub use review::*;
pub use user::*;
pub use wishlist::*;
