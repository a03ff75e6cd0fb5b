use shared::models::{Brand, BrandInput};
use shared::{Page, PageRequest};

use super::{SyncContext, keys};
use crate::composite::{CompositeOutcome, write_with_image};
use crate::error::ClientResult;
use crate::transport::ImageUpload;

/// Brand reads and writes
#[derive(Debug, Clone)]
pub struct Brands {
    ctx: SyncContext,
}

impl Brands {
    pub(crate) fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, page: &PageRequest) -> ClientResult<Page<Brand>> {
        let request = page.clone();
        self.ctx
            .read(keys::brand_page(page), move |http| {
                let request = request.clone();
                async move { http.fetch_brands(&request).await }
            })
            .await
    }

    pub async fn list_active(&self, page: &PageRequest) -> ClientResult<Page<Brand>> {
        let request = page.clone();
        self.ctx
            .read(keys::active_brand_page(page), move |http| {
                let request = request.clone();
                async move { http.fetch_active_brands(&request).await }
            })
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Brand> {
        let brand_id = id.to_string();
        self.ctx
            .read(keys::brand(id), move |http| {
                let brand_id = brand_id.clone();
                async move { http.fetch_brand(&brand_id).await }
            })
            .await
    }

    pub async fn create(&self, input: &BrandInput) -> ClientResult<Brand> {
        let brand = self.ctx.http.create_brand(input).await?;
        self.ctx.invalidate(&[keys::brands()]);
        Ok(brand)
    }

    pub async fn update(&self, id: &str, input: &BrandInput) -> ClientResult<Brand> {
        let brand = self.ctx.http.update_brand(id, input).await?;
        self.ctx.invalidate(&[keys::brands(), keys::brand(id)]);
        Ok(brand)
    }

    /// Delete a brand; its entity key is dropped, not refetched
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.ctx.http.delete_brand(id).await?;
        self.ctx.invalidate(&[keys::brands()]);
        self.ctx.remove(&[keys::brand(id)]);
        Ok(())
    }

    pub async fn upload_image(&self, id: &str, image: ImageUpload) -> ClientResult<Brand> {
        let brand = self.ctx.http.upload_brand_image(id, image).await?;
        self.ctx.invalidate(&[keys::brands(), keys::brand(id)]);
        Ok(brand)
    }

    pub async fn delete_image(&self, id: &str) -> ClientResult<Brand> {
        let brand = self.ctx.http.delete_brand_image(id).await?;
        self.ctx.invalidate(&[keys::brands(), keys::brand(id)]);
        Ok(brand)
    }

    /// Create a brand, then attach its logo
    pub async fn create_with_image(
        &self,
        input: &BrandInput,
        image: Option<ImageUpload>,
    ) -> CompositeOutcome<Brand> {
        let http = &self.ctx.http;
        write_with_image(
            http.create_brand(input),
            image,
            |id, image| async move { http.upload_brand_image(&id, image).await },
            |brand| self.invalidate_brand(brand),
        )
        .await
    }

    /// Update a brand, then replace its logo when one is given
    pub async fn update_with_image(
        &self,
        id: &str,
        input: &BrandInput,
        image: Option<ImageUpload>,
    ) -> CompositeOutcome<Brand> {
        let http = &self.ctx.http;
        write_with_image(
            http.update_brand(id, input),
            image,
            |id, image| async move { http.upload_brand_image(&id, image).await },
            |brand| self.invalidate_brand(brand),
        )
        .await
    }

    fn invalidate_brand(&self, brand: &Brand) {
        self.ctx.invalidate(&[keys::brands()]);
        if let Some(id) = brand.id.as_deref() {
            self.ctx.invalidate(&[keys::brand(id)]);
        }
    }
}
