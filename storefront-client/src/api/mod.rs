//! Typed API calls
//!
//! One method per remote operation, each issuing exactly one request
//! through [`HttpClient`](crate::http::HttpClient). Ids are sent as
//! percent-encoded path segments and write payloads are validated before
//! anything is sent. Nothing here caches.

mod brand;
mod category;
mod review;
mod user;
mod wishlist;
