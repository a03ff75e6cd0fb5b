//! Shared state of the mock server
//!
//! [`MockState`] holds the in-memory catalog, the issued tokens, and the
//! test controls (request counters, injected faults, artificial latency).
//! Clones share everything.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::http::{Method, StatusCode};
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Brand, Category, ProductSummary, Review, Role, User, Wishlist};
use tokio::sync::{Mutex, RwLock};

/// Token of the seeded administrator
pub const ADMIN_TOKEN: &str = "mock-admin-token";
/// Token of the seeded customer
pub const CUSTOMER_TOKEN: &str = "mock-customer-token";
/// Password every seeded user starts with
pub const SEED_PASSWORD: &str = "password";

pub const ADMIN_ID: &str = "user-admin";
pub const CUSTOMER_ID: &str = "user-customer";

/// Authenticated caller, resolved from the bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// In-memory tables
#[derive(Debug, Default)]
pub struct MockDb {
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
    pub products: Vec<ProductSummary>,
    pub reviews: Vec<Review>,
    pub wishlists: Vec<Wishlist>,
    pub users: Vec<User>,
    pub passwords: HashMap<String, String>,
}

impl MockDb {
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn product(&self, id: &str) -> Option<&ProductSummary> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Number of products carrying the brand's name
    pub fn brand_product_count(&self, name: &str) -> i64 {
        self.products.iter().filter(|p| p.brand == name).count() as i64
    }
}

/// Fail matching requests with a fixed status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fault {
    /// Method to match; any method when absent
    #[serde(default, with = "method_opt")]
    pub method: Option<Method>,
    /// Prefix of the full request path, e.g. `/api/brands`
    pub path_prefix: String,
    #[serde(with = "status_code")]
    pub status: StatusCode,
    /// How many matching requests fail before the fault is spent
    pub count: u32,
    /// Message placed in the error body; empty body when absent
    #[serde(default)]
    pub message: Option<String>,
}

impl Fault {
    pub fn new(method: Method, path_prefix: impl Into<String>, status: StatusCode, count: u32) -> Self {
        Self {
            method: Some(method),
            path_prefix: path_prefix.into(),
            status,
            count,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.count > 0
            && self.method.as_ref().is_none_or(|m| m == method)
            && path.starts_with(&self.path_prefix)
    }
}

#[derive(Debug, Default)]
struct Controls {
    by_route: HashMap<String, u64>,
    faults: Vec<Fault>,
    latency: Duration,
}

/// Snapshot of the request counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStats {
    pub total: u64,
    /// Keyed by `"<METHOD> <path>"`
    pub by_route: HashMap<String, u64>,
}

#[derive(Debug)]
struct Inner {
    db: RwLock<MockDb>,
    tokens: RwLock<HashMap<String, String>>,
    controls: Mutex<Controls>,
    total_requests: AtomicU64,
    next_id: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct MockState {
    inner: Arc<Inner>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    /// Two users (admin and customer) with fixed tokens, empty catalog
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Users plus a small sample catalog
    pub fn seeded() -> Self {
        Self::build(true)
    }

    fn build(with_catalog: bool) -> Self {
        let next_id = AtomicU64::new(1);
        let mut db = MockDb::default();
        seed_users(&mut db);
        if with_catalog {
            seed_catalog(&mut db, |prefix| {
                format!("{}-{}", prefix, next_id.fetch_add(1, Ordering::Relaxed))
            });
        }

        let tokens = HashMap::from([
            (ADMIN_TOKEN.to_string(), ADMIN_ID.to_string()),
            (CUSTOMER_TOKEN.to_string(), CUSTOMER_ID.to_string()),
        ]);

        Self {
            inner: Arc::new(Inner {
                db: RwLock::new(db),
                tokens: RwLock::new(tokens),
                controls: Mutex::new(Controls::default()),
                total_requests: AtomicU64::new(0),
                next_id,
            }),
        }
    }

    /// Fresh id with a readable prefix
    pub fn next_id(&self, prefix: &str) -> String {
        format!(
            "{}-{}",
            prefix,
            self.inner.next_id.fetch_add(1, Ordering::Relaxed)
        )
    }

    pub fn db(&self) -> &RwLock<MockDb> {
        &self.inner.db
    }

    /// Add a product that wishlists can reference
    pub async fn add_product(&self, name: &str, brand: &str, min_price: Decimal) -> ProductSummary {
        let product = ProductSummary {
            id: self.next_id("product"),
            name: name.to_string(),
            sku: name.to_uppercase().replace(' ', "-"),
            is_active: true,
            min_price,
            primary_image: None,
            brand: brand.to_string(),
        };
        self.inner.db.write().await.products.push(product.clone());
        product
    }

    /// Register a token for an existing user
    pub async fn issue_token(&self, user_id: &str) -> String {
        let token = format!("mock-{}", uuid::Uuid::new_v4().simple());
        self.inner
            .tokens
            .write()
            .await
            .insert(token.clone(), user_id.to_string());
        token
    }

    /// Resolve a bearer token to its user
    pub async fn authenticate(&self, token: &str) -> Option<CurrentUser> {
        let user_id = self.inner.tokens.read().await.get(token).cloned()?;
        let db = self.inner.db.read().await;
        db.user(&user_id).map(|u| CurrentUser {
            id: u.id.clone(),
            role: u.role.clone(),
        })
    }

    // ========== Test controls ==========

    /// Count a request and return the fault it should fail with, if any
    pub(crate) async fn observe(&self, method: &Method, path: &str) -> (Duration, Option<Fault>) {
        self.inner.total_requests.fetch_add(1, Ordering::SeqCst);
        let mut controls = self.inner.controls.lock().await;
        *controls
            .by_route
            .entry(format!("{} {}", method, path))
            .or_default() += 1;

        let fault = controls
            .faults
            .iter_mut()
            .find(|f| f.matches(method, path))
            .map(|f| {
                f.count -= 1;
                f.clone()
            });
        controls.faults.retain(|f| f.count > 0);
        (controls.latency, fault)
    }

    /// Requests received under `/api`
    pub fn request_count(&self) -> u64 {
        self.inner.total_requests.load(Ordering::SeqCst)
    }

    /// Requests received for one method and exact path
    pub async fn requests_to(&self, method: Method, path: &str) -> u64 {
        self.inner
            .controls
            .lock()
            .await
            .by_route
            .get(&format!("{} {}", method, path))
            .copied()
            .unwrap_or(0)
    }

    pub async fn stats(&self) -> RequestStats {
        RequestStats {
            total: self.request_count(),
            by_route: self.inner.controls.lock().await.by_route.clone(),
        }
    }

    pub async fn reset_counters(&self) {
        self.inner.total_requests.store(0, Ordering::SeqCst);
        self.inner.controls.lock().await.by_route.clear();
    }

    pub async fn inject_fault(&self, fault: Fault) {
        tracing::debug!(?fault, "fault injected");
        self.inner.controls.lock().await.faults.push(fault);
    }

    pub async fn clear_faults(&self) {
        self.inner.controls.lock().await.faults.clear();
    }

    /// Delay every API request by `latency`
    pub async fn set_latency(&self, latency: Duration) {
        self.inner.controls.lock().await.latency = latency;
    }
}

/// Current time without zone, as the API serializes it
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn seed_users(db: &mut MockDb) {
    let now = now();
    for (id, first, last, username, role) in [
        (ADMIN_ID, "Ada", "Admin", "admin", Role::Admin),
        (CUSTOMER_ID, "Carl", "Customer", "customer", Role::Customer),
    ] {
        db.users.push(User {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", username),
            username: username.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            role,
        });
        db.passwords.insert(id.to_string(), SEED_PASSWORD.to_string());
    }
}

fn seed_catalog(db: &mut MockDb, mut next_id: impl FnMut(&str) -> String) {
    let now = now();
    for (name, description, active) in [
        ("Acme", "Anvils, rockets and traps", true),
        ("Globex", "Everything, globally", true),
        ("Initech", "Enterprise staplers", false),
    ] {
        db.brands.push(Brand {
            id: Some(next_id("brand")),
            name: name.to_string(),
            description: description.to_string(),
            image_url: None,
            website: Some(format!("https://{}.example.com", name.to_lowercase())),
            is_active: active,
            created_at: Some(now),
            updated_at: Some(now),
            product_count: Some(0),
        });
    }

    let shoes = next_id("category");
    db.categories.push(Category {
        id: Some(shoes.clone()),
        name: "Shoes".to_string(),
        slug: Some("shoes".to_string()),
        image_url: None,
        description: Some("Everything for your feet".to_string()),
        product_count: Some(0),
        parent: None,
    });
    db.categories.push(Category {
        id: Some(next_id("category")),
        name: "Running Shoes".to_string(),
        slug: Some("running-shoes".to_string()),
        image_url: None,
        description: None,
        product_count: Some(0),
        parent: Some(shoes),
    });

    for (name, sku, price, brand) in [
        ("Road Runner 2", "RR-2", Decimal::new(12999, 2), "Acme"),
        ("Trail Blazer", "TB-1", Decimal::new(8950, 2), "Acme"),
        ("Everyday Sneaker", "ES-7", Decimal::new(4900, 2), "Globex"),
    ] {
        db.products.push(ProductSummary {
            id: next_id("product"),
            name: name.to_string(),
            sku: sku.to_string(),
            is_active: true,
            min_price: price,
            primary_image: None,
            brand: brand.to_string(),
        });
    }

    let counts: Vec<i64> = db
        .brands
        .iter()
        .map(|b| db.brand_product_count(&b.name))
        .collect();
    for (brand, count) in db.brands.iter_mut().zip(counts) {
        brand.product_count = Some(count);
    }
}

mod method_opt {
    use axum::http::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(method: &Option<Method>, s: S) -> Result<S::Ok, S::Error> {
        match method {
            Some(m) => s.serialize_some(m.as_str()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Method>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|m| {
                Method::from_bytes(m.to_uppercase().as_bytes()).map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}

mod status_code {
    use axum::http::StatusCode;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u16(status.as_u16())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<StatusCode, D::Error> {
        StatusCode::from_u16(u16::deserialize(d)?).map_err(serde::de::Error::custom)
    }
}
