use shared::models::{Brand, BrandInput};
use shared::{Page, PageRequest};

use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::transport::ImageUpload;

impl HttpClient {
    pub async fn fetch_brands(&self, page: &PageRequest) -> ClientResult<Page<Brand>> {
        self.get("Fetch brands", "/brands").page(page).send().await
    }

    pub async fn fetch_active_brands(&self, page: &PageRequest) -> ClientResult<Page<Brand>> {
        self.get("Fetch active brands", "/brands/active")
            .page(page)
            .send()
            .await
    }

    pub async fn fetch_brand(&self, id: &str) -> ClientResult<Brand> {
        self.get("Fetch brand", "/brands")
            .segment("Brand", id)
            .send()
            .await
    }

    pub async fn create_brand(&self, input: &BrandInput) -> ClientResult<Brand> {
        self.post("Create brand", "/brands")
            .validated_json(input)
            .send()
            .await
    }

    pub async fn update_brand(&self, id: &str, input: &BrandInput) -> ClientResult<Brand> {
        self.put("Update brand", "/brands")
            .segment("Brand", id)
            .validated_json(input)
            .send()
            .await
    }

    pub async fn delete_brand(&self, id: &str) -> ClientResult<()> {
        self.delete("Delete brand", "/brands")
            .segment("Brand", id)
            .send_empty()
            .await
    }

    /// Attach an image to an existing brand
    pub async fn upload_brand_image(&self, id: &str, image: ImageUpload) -> ClientResult<Brand> {
        self.post("Upload brand image", "/brands")
            .segment("Brand", id)
            .join("image")
            .image(image)
            .send()
            .await
    }

    pub async fn delete_brand_image(&self, id: &str) -> ClientResult<Brand> {
        self.delete("Delete brand image", "/brands")
            .segment("Brand", id)
            .join("image")
            .send()
            .await
    }
}
