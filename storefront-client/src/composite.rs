//! Two-phase writes: metadata first, then an image attached to the saved
//! entity.

use std::future::Future;

use shared::models::{Brand, Category};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::transport::ImageUpload;

/// Result of a metadata write followed by an optional image upload
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeOutcome<T> {
    /// Every step succeeded
    Success(T),
    /// The entity was saved but its image was not
    PartialSuccess { entity: T, image_error: ClientError },
    /// Nothing was saved
    Failure(ClientError),
}

impl<T> CompositeOutcome<T> {
    /// Saved entity, if any step succeeded
    pub fn entity(&self) -> Option<&T> {
        match self {
            Self::Success(entity) | Self::PartialSuccess { entity, .. } => Some(entity),
            Self::Failure(_) => None,
        }
    }

    pub fn into_entity(self) -> Option<T> {
        match self {
            Self::Success(entity) | Self::PartialSuccess { entity, .. } => Some(entity),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Success(_) => None,
            Self::PartialSuccess { image_error, .. } => Some(image_error),
            Self::Failure(err) => Some(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::PartialSuccess { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CompositeOutcome<U> {
        match self {
            Self::Success(entity) => CompositeOutcome::Success(f(entity)),
            Self::PartialSuccess {
                entity,
                image_error,
            } => CompositeOutcome::PartialSuccess {
                entity: f(entity),
                image_error,
            },
            Self::Failure(err) => CompositeOutcome::Failure(err),
        }
    }
}

/// Entities that take an image once they exist remotely
pub trait ImageTarget {
    /// Label used in logs ("brand", "category")
    const KIND: &'static str;

    /// Server-assigned id
    fn entity_id(&self) -> Option<&str>;
}

impl ImageTarget for Brand {
    const KIND: &'static str = "brand";

    fn entity_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl ImageTarget for Category {
    const KIND: &'static str = "category";

    fn entity_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Run a two-phase write
///
/// `metadata` is awaited first. Its entity must carry an id; the image, if
/// any, is then uploaded with `upload(id, image)`. `invalidate` runs after
/// the metadata step succeeds and again after a successful upload. An
/// upload failure is neither retried nor rolled back.
pub async fn write_with_image<T, M, U, UFut, I>(
    metadata: M,
    image: Option<ImageUpload>,
    upload: U,
    invalidate: I,
) -> CompositeOutcome<T>
where
    T: ImageTarget,
    M: Future<Output = ClientResult<T>>,
    U: FnOnce(String, ImageUpload) -> UFut,
    UFut: Future<Output = ClientResult<T>>,
    I: Fn(&T),
{
    let entity = match metadata.await {
        Ok(entity) => entity,
        Err(err) => {
            warn!(kind = T::KIND, error = %err, "metadata write failed");
            return CompositeOutcome::Failure(err);
        }
    };

    let Some(id) = entity.entity_id().map(str::to_string) else {
        warn!(kind = T::KIND, "saved entity has no id");
        return CompositeOutcome::Failure(ClientError::InvalidResponse(format!(
            "Saved {} has no id",
            T::KIND
        )));
    };
    invalidate(&entity);

    let Some(image) = image else {
        info!(kind = T::KIND, id = %id, "saved without image");
        return CompositeOutcome::Success(entity);
    };

    match upload(id.clone(), image).await {
        Ok(updated) => {
            invalidate(&updated);
            info!(kind = T::KIND, id = %id, "saved with image");
            CompositeOutcome::Success(updated)
        }
        Err(image_error) => {
            warn!(kind = T::KIND, id = %id, error = %image_error, "image upload failed after save");
            CompositeOutcome::PartialSuccess {
                entity,
                image_error,
            }
        }
    }
}
