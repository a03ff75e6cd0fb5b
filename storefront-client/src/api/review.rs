use shared::models::{Review, ReviewCreate};
use shared::{Page, PageRequest};

use crate::error::ClientResult;
use crate::http::HttpClient;

impl HttpClient {
    /// Reviews of one product, newest page first as the server orders them
    pub async fn fetch_product_reviews(
        &self,
        product_id: &str,
        page: u32,
        size: u32,
    ) -> ClientResult<Page<Review>> {
        self.get("Fetch reviews", "/review")
            .protected()
            .segment("Product", product_id)
            .join("reviews")
            .page(&PageRequest::new(page, size))
            .send()
            .await
    }

    pub async fn create_review(&self, review: &ReviewCreate) -> ClientResult<Review> {
        self.post("Create review", "/review/review/create")
            .validated_json(review)
            .send()
            .await
    }

    pub async fn delete_review(&self, id: &str) -> ClientResult<()> {
        self.delete("Delete review", "/review/review")
            .segment("Review", id)
            .send_empty()
            .await
    }
}
