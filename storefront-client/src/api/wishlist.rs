use shared::models::{Wishlist, WishlistAddProduct, WishlistCreate, WishlistRename};

use crate::error::ClientResult;
use crate::http::HttpClient;

impl HttpClient {
    pub async fn fetch_wishlists(&self) -> ClientResult<Vec<Wishlist>> {
        self.get("Fetch wishlists", "/wishlists")
            .protected()
            .send()
            .await
    }

    pub async fn fetch_wishlist(&self, id: &str) -> ClientResult<Wishlist> {
        self.get("Fetch wishlist", "/wishlists")
            .protected()
            .segment("Wishlist", id)
            .send()
            .await
    }

    pub async fn create_wishlist(&self, input: &WishlistCreate) -> ClientResult<Wishlist> {
        self.post("Create wishlist", "/wishlists")
            .validated_json(input)
            .send()
            .await
    }

    pub async fn add_to_wishlist(&self, id: &str, product_id: &str) -> ClientResult<Wishlist> {
        let body = WishlistAddProduct {
            product_id: product_id.to_string(),
        };
        self.post("Add to wishlist", "/wishlists")
            .segment("Wishlist", id)
            .join("add")
            .validated_json(&body)
            .send()
            .await
    }

    /// Remove a product; removing an absent product is not an error
    pub async fn remove_from_wishlist(&self, id: &str, product_id: &str) -> ClientResult<Wishlist> {
        self.delete("Remove from wishlist", "/wishlists")
            .segment("Wishlist", id)
            .join("products")
            .segment("Product", product_id)
            .send()
            .await
    }

    pub async fn rename_wishlist(&self, id: &str, input: &WishlistRename) -> ClientResult<Wishlist> {
        self.put("Rename wishlist", "/wishlists")
            .segment("Wishlist", id)
            .validated_json(input)
            .send()
            .await
    }

    pub async fn delete_wishlist(&self, id: &str) -> ClientResult<()> {
        self.delete("Delete wishlist", "/wishlists")
            .segment("Wishlist", id)
            .send_empty()
            .await
    }

    /// Whether the wishlist holds the product
    ///
    /// Anonymous sessions get `false` without a request; a 404 also reads
    /// as `false`.
    pub async fn wishlist_contains(&self, id: &str, product_id: &str) -> ClientResult<bool> {
        if !self.session().is_authenticated() {
            return Ok(false);
        }
        let found = self
            .get("Check wishlist", "/wishlists")
            .protected()
            .segment("Wishlist", id)
            .join("products")
            .segment("Product", product_id)
            .join("check")
            .send_optional::<bool>()
            .await?;
        Ok(found.unwrap_or(false))
    }
}
