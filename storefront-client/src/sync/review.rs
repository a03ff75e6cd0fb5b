use shared::Page;
use shared::models::{Review, ReviewCreate};

use super::{SyncContext, keys};
use crate::error::ClientResult;

/// Product reviews (all calls need a session)
#[derive(Debug, Clone)]
pub struct Reviews {
    ctx: SyncContext,
}

impl Reviews {
    pub(crate) fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn list_for_product(
        &self,
        product_id: &str,
        page: u32,
        size: u32,
    ) -> ClientResult<Page<Review>> {
        let product = product_id.to_string();
        self.ctx
            .read_protected(keys::review_page(product_id, page, size), move |http| {
                let product = product.clone();
                async move { http.fetch_product_reviews(&product, page, size).await }
            })
            .await
    }

    pub async fn create(&self, review: &ReviewCreate) -> ClientResult<Review> {
        let created = self.ctx.http.create_review(review).await?;
        self.ctx
            .invalidate(&[keys::product_reviews(&created.product_id)]);
        Ok(created)
    }

    /// Delete a review; every review page is refetched on next read
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.ctx.http.delete_review(id).await?;
        self.ctx.invalidate(&[keys::reviews()]);
        Ok(())
    }
}
