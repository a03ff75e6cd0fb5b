use shared::models::{Wishlist, WishlistCreate, WishlistRename};

use super::{SyncContext, keys};
use crate::error::ClientResult;

/// The signed-in user's wishlists
#[derive(Debug, Clone)]
pub struct Wishlists {
    ctx: SyncContext,
}

impl Wishlists {
    pub(crate) fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn list_mine(&self) -> ClientResult<Vec<Wishlist>> {
        self.ctx
            .read_protected(keys::wishlists(), |http| async move {
                http.fetch_wishlists().await
            })
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Wishlist> {
        let wishlist_id = id.to_string();
        self.ctx
            .read_protected(keys::wishlist(id), move |http| {
                let wishlist_id = wishlist_id.clone();
                async move { http.fetch_wishlist(&wishlist_id).await }
            })
            .await
    }

    /// Membership check; `false` without a request when signed out
    pub async fn contains(&self, id: &str, product_id: &str) -> ClientResult<bool> {
        if !self.ctx.http.session().is_authenticated() {
            return Ok(false);
        }
        let (wishlist_id, product) = (id.to_string(), product_id.to_string());
        self.ctx
            .read_protected(keys::wishlist_membership(id, product_id), move |http| {
                let (wishlist_id, product) = (wishlist_id.clone(), product.clone());
                async move { http.wishlist_contains(&wishlist_id, &product).await }
            })
            .await
    }

    pub async fn create(&self, input: &WishlistCreate) -> ClientResult<Wishlist> {
        let wishlist = self.ctx.http.create_wishlist(input).await?;
        self.ctx.invalidate(&[keys::wishlists()]);
        Ok(wishlist)
    }

    pub async fn add_product(&self, id: &str, product_id: &str) -> ClientResult<Wishlist> {
        let wishlist = self.ctx.http.add_to_wishlist(id, product_id).await?;
        self.ctx.invalidate(&[keys::wishlist(id), keys::wishlists()]);
        Ok(wishlist)
    }

    /// Remove a product; the server's returned state is trusted as is
    pub async fn remove_product(&self, id: &str, product_id: &str) -> ClientResult<Wishlist> {
        let wishlist = self.ctx.http.remove_from_wishlist(id, product_id).await?;
        self.ctx.invalidate(&[keys::wishlist(id), keys::wishlists()]);
        Ok(wishlist)
    }

    pub async fn rename(&self, id: &str, input: &WishlistRename) -> ClientResult<Wishlist> {
        let wishlist = self.ctx.http.rename_wishlist(id, input).await?;
        self.ctx.invalidate(&[keys::wishlists(), keys::wishlist(id)]);
        Ok(wishlist)
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.ctx.http.delete_wishlist(id).await?;
        self.ctx.invalidate(&[keys::wishlists()]);
        self.ctx.remove(&[keys::wishlist(id)]);
        Ok(())
    }
}
