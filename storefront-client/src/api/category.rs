use shared::models::{Category, CategoryInput};
use shared::{Page, PageRequest};

use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::transport::ImageUpload;

impl HttpClient {
    pub async fn fetch_categories(&self, page: &PageRequest) -> ClientResult<Page<Category>> {
        self.get("Fetch categories", "/categories")
            .page(page)
            .send()
            .await
    }

    /// Categories without a parent
    pub async fn fetch_root_categories(&self, page: &PageRequest) -> ClientResult<Page<Category>> {
        self.get("Fetch root categories", "/categories/root")
            .page(page)
            .send()
            .await
    }

    pub async fn fetch_category(&self, id: &str) -> ClientResult<Category> {
        self.get("Fetch category", "/categories")
            .segment("Category", id)
            .send()
            .await
    }

    pub async fn fetch_category_by_slug(&self, slug: &str) -> ClientResult<Category> {
        self.get("Fetch category", "/categories/slug")
            .segment("Category slug", slug)
            .send()
            .await
    }

    pub async fn create_category(&self, input: &CategoryInput) -> ClientResult<Category> {
        self.post("Create category", "/categories")
            .validated_json(input)
            .send()
            .await
    }

    /// Update a category; a category cannot be its own parent
    pub async fn update_category(&self, id: &str, input: &CategoryInput) -> ClientResult<Category> {
        let mut request = self
            .put("Update category", "/categories")
            .segment("Category", id)
            .validated_json(input);
        if input.parent.as_deref() == Some(id) {
            request = request.reject(ClientError::Validation(
                "A category cannot be its own parent".to_string(),
            ));
        }
        request.send().await
    }

    pub async fn delete_category(&self, id: &str) -> ClientResult<()> {
        self.delete("Delete category", "/categories")
            .segment("Category", id)
            .send_empty()
            .await
    }

    pub async fn upload_category_image(
        &self,
        id: &str,
        image: ImageUpload,
    ) -> ClientResult<Category> {
        self.post("Upload category image", "/categories")
            .segment("Category", id)
            .join("image")
            .image(image)
            .send()
            .await
    }

    pub async fn delete_category_image(&self, id: &str) -> ClientResult<Category> {
        self.delete("Delete category image", "/categories")
            .segment("Category", id)
            .join("image")
            .send()
            .await
    }
}
