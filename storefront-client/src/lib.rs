//! Storefront Client - typed, cached access to the storefront API
//!
//! - [`transport`]: executes single HTTP requests (network or in-process)
//! - [`http`]: request builder with the session token gate
//! - [`cache`]: keyed query cache with in-flight coalescing and retries
//! - [`sync`]: per-resource cached reads and invalidating writes
//! - [`composite`]: metadata-then-image writes with a three-way outcome

pub mod api;
pub mod cache;
pub mod client;
pub mod composite;
pub mod config;
pub mod error;
pub mod http;
pub mod notice;
pub mod session;
pub mod sync;
pub mod transport;

pub use cache::{CacheEvent, QueryCache, QueryKey, QueryStatus, RetryPolicy};
pub use client::{StorefrontClient, StorefrontClientBuilder};
pub use composite::CompositeOutcome;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use notice::{Notice, NoticeLevel};
pub use session::{SessionData, SessionStore};
pub use transport::{ImageUpload, Transport};

// Re-export shared types for convenience
pub use shared::models::{
    Brand, BrandInput, Category, CategoryInput, PasswordChange, ProfileUpdate, Review,
    ReviewCreate, Role, User, Wishlist, WishlistCreate, WishlistRename,
};
pub use shared::{Page, PageRequest};
