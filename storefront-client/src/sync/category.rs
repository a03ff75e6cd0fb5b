use shared::models::{Category, CategoryInput};
use shared::{Page, PageRequest};

use super::{SyncContext, keys};
use crate::cache::QueryKey;
use crate::composite::{CompositeOutcome, write_with_image};
use crate::error::ClientResult;
use crate::transport::ImageUpload;

/// Category reads and writes
///
/// A category is cached under two entity keys, by id and by slug. Writes
/// take the slug the caller last saw; slug keys already holding the
/// category are found in the cache, so a renamed category's old slug key
/// is invalidated along with the new one.
#[derive(Debug, Clone)]
pub struct Categories {
    ctx: SyncContext,
}

impl Categories {
    pub(crate) fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, page: &PageRequest) -> ClientResult<Page<Category>> {
        let request = page.clone();
        self.ctx
            .read(keys::category_page(page), move |http| {
                let request = request.clone();
                async move { http.fetch_categories(&request).await }
            })
            .await
    }

    pub async fn list_roots(&self, page: &PageRequest) -> ClientResult<Page<Category>> {
        let request = page.clone();
        self.ctx
            .read(keys::root_category_page(page), move |http| {
                let request = request.clone();
                async move { http.fetch_root_categories(&request).await }
            })
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Category> {
        let category_id = id.to_string();
        self.ctx
            .read(keys::category_by_id(id), move |http| {
                let category_id = category_id.clone();
                async move { http.fetch_category(&category_id).await }
            })
            .await
    }

    pub async fn get_by_slug(&self, slug: &str) -> ClientResult<Category> {
        let category_slug = slug.to_string();
        self.ctx
            .read(keys::category_by_slug(slug), move |http| {
                let category_slug = category_slug.clone();
                async move { http.fetch_category_by_slug(&category_slug).await }
            })
            .await
    }

    pub async fn create(&self, input: &CategoryInput) -> ClientResult<Category> {
        let category = self.ctx.http.create_category(input).await?;
        self.ctx.invalidate(&[keys::categories()]);
        Ok(category)
    }

    pub async fn update(
        &self,
        id: &str,
        previous_slug: Option<&str>,
        input: &CategoryInput,
    ) -> ClientResult<Category> {
        let previous_slug = self.known_slug(id, previous_slug);
        let category = self.ctx.http.update_category(id, input).await?;
        self.invalidate_category(id, previous_slug.as_deref(), &category);
        Ok(category)
    }

    /// Delete a category; its id and slug keys are dropped, not refetched
    pub async fn delete(&self, id: &str, slug: Option<&str>) -> ClientResult<()> {
        let slug = self.known_slug(id, slug);
        self.ctx.http.delete_category(id).await?;
        self.ctx.invalidate(&[keys::categories()]);
        let mut gone = vec![keys::category_by_id(id)];
        gone.extend(slug.as_deref().map(keys::category_by_slug));
        gone.extend(self.cached_slug_keys(id));
        self.ctx.remove(&gone);
        Ok(())
    }

    pub async fn upload_image(&self, id: &str, image: ImageUpload) -> ClientResult<Category> {
        let category = self.ctx.http.upload_category_image(id, image).await?;
        self.invalidate_category(id, None, &category);
        Ok(category)
    }

    pub async fn delete_image(&self, id: &str) -> ClientResult<Category> {
        let category = self.ctx.http.delete_category_image(id).await?;
        self.invalidate_category(id, None, &category);
        Ok(category)
    }

    /// Create a category, then attach its image
    pub async fn create_with_image(
        &self,
        input: &CategoryInput,
        image: Option<ImageUpload>,
    ) -> CompositeOutcome<Category> {
        let http = &self.ctx.http;
        write_with_image(
            http.create_category(input),
            image,
            |id, image| async move { http.upload_category_image(&id, image).await },
            |category| {
                if let Some(id) = category.id.as_deref() {
                    self.invalidate_category(id, None, category);
                }
            },
        )
        .await
    }

    /// Update a category, then replace its image when one is given
    pub async fn update_with_image(
        &self,
        id: &str,
        previous_slug: Option<&str>,
        input: &CategoryInput,
        image: Option<ImageUpload>,
    ) -> CompositeOutcome<Category> {
        let http = &self.ctx.http;
        let previous_slug = self.known_slug(id, previous_slug);
        write_with_image(
            http.update_category(id, input),
            image,
            |id, image| async move { http.upload_category_image(&id, image).await },
            |category| self.invalidate_category(id, previous_slug.as_deref(), category),
        )
        .await
    }

    /// Slug given by the caller, else the one cached under the id key
    fn known_slug(&self, id: &str, given: Option<&str>) -> Option<String> {
        given.map(str::to_string).or_else(|| {
            self.ctx
                .cache
                .peek::<Category>(&keys::category_by_id(id))
                .and_then(|c| c.slug)
        })
    }

    /// Slug keys whose cached category carries `id`
    fn cached_slug_keys(&self, id: &str) -> Vec<QueryKey> {
        self.ctx
            .cache
            .matching::<Category>(&keys::category_slugs(), |c| c.id.as_deref() == Some(id))
    }

    fn invalidate_category(&self, id: &str, previous_slug: Option<&str>, category: &Category) {
        let mut affected: Vec<QueryKey> = vec![keys::categories(), keys::category_by_id(id)];
        affected.extend(previous_slug.map(keys::category_by_slug));
        if let Some(slug) = category.slug.as_deref() {
            if Some(slug) != previous_slug {
                affected.push(keys::category_by_slug(slug));
            }
        }
        for key in self.cached_slug_keys(id) {
            if !affected.contains(&key) {
                affected.push(key);
            }
        }
        self.ctx.invalidate(&affected);
    }
}
