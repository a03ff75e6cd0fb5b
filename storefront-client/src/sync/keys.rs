//! Cache keys per resource
//!
//! List keys are `(resource, page, size, sort)`; entity keys are
//! `(resource, id)`. Invalidating a namespace such as [`brands`] covers
//! every list page under it.

use shared::PageRequest;

use crate::cache::QueryKey;

fn page_key(key: QueryKey, page: &PageRequest) -> QueryKey {
    key.with(page.page).with(page.size).with(&page.sort)
}

pub fn brands() -> QueryKey {
    QueryKey::from(["brands"])
}

pub fn brand_page(page: &PageRequest) -> QueryKey {
    page_key(brands(), page)
}

pub fn active_brand_page(page: &PageRequest) -> QueryKey {
    page_key(brands().with("active"), page)
}

pub fn brand(id: &str) -> QueryKey {
    QueryKey::from(["brand", id])
}

pub fn categories() -> QueryKey {
    QueryKey::from(["categories"])
}

pub fn category_page(page: &PageRequest) -> QueryKey {
    page_key(categories(), page)
}

pub fn root_category_page(page: &PageRequest) -> QueryKey {
    page_key(categories().with("root"), page)
}

pub fn category_by_id(id: &str) -> QueryKey {
    QueryKey::from(["category", "id", id])
}

/// Prefix of every slug-keyed category
pub fn category_slugs() -> QueryKey {
    QueryKey::from(["category", "slug"])
}

pub fn category_by_slug(slug: &str) -> QueryKey {
    category_slugs().with(slug)
}

pub fn reviews() -> QueryKey {
    QueryKey::from(["reviews"])
}

pub fn product_reviews(product_id: &str) -> QueryKey {
    reviews().with(product_id)
}

pub fn review_page(product_id: &str, page: u32, size: u32) -> QueryKey {
    product_reviews(product_id).with(page).with(size)
}

pub fn wishlists() -> QueryKey {
    QueryKey::from(["wishlists"])
}

pub fn wishlist(id: &str) -> QueryKey {
    QueryKey::from(["wishlist", id])
}

pub fn wishlist_membership(id: &str, product_id: &str) -> QueryKey {
    wishlist(id).with("product").with(product_id)
}

pub fn user(id: &str) -> QueryKey {
    QueryKey::from(["user", id])
}

/// Namespaces whose entries belong to one signed-in session
pub fn session_scoped() -> [QueryKey; 4] {
    [
        wishlists(),
        QueryKey::from(["wishlist"]),
        reviews(),
        QueryKey::from(["user"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_keys_sit_under_their_namespace() {
        let page = PageRequest::new(0, 12).with_sort("name,asc");
        assert_eq!(
            brand_page(&page),
            QueryKey::from(["brands", "0", "12", "name,asc"])
        );
        assert!(active_brand_page(&page).starts_with(&brands()));
        assert!(root_category_page(&page).starts_with(&categories()));
        assert!(!brand("1").starts_with(&brands()));
    }

    #[test]
    fn test_membership_sits_under_wishlist() {
        assert!(wishlist_membership("w-1", "p-9").starts_with(&wishlist("w-1")));
        assert!(review_page("p-1", 0, 5).starts_with(&product_reviews("p-1")));
        assert_ne!(category_by_id("shoes"), category_by_slug("shoes"));
    }

    #[test]
    fn test_session_scoped_namespaces() {
        let scoped = session_scoped();
        let covered = |key: &QueryKey| scoped.iter().any(|ns| key.starts_with(ns));
        assert!(covered(&wishlists()));
        assert!(covered(&wishlist_membership("w-1", "p-1")));
        assert!(covered(&review_page("p-1", 0, 5)));
        assert!(covered(&user("u-1")));
        assert!(!covered(&brand_page(&PageRequest::default())));
        assert!(!covered(&category_by_slug("shoes")));
    }
}
