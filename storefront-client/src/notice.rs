//! User-facing notices for write outcomes

use serde::Serialize;

use crate::composite::CompositeOutcome;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Title and message describing how a write went
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Notice for a failed call
    pub fn from_error(err: &ClientError) -> Self {
        match err {
            ClientError::AuthenticationRequired => {
                Self::error("Authentication Required", "Please sign in to continue")
            }
            err => Self::error("Error", err.to_string()),
        }
    }

    /// Notice for a two-phase write
    ///
    /// `entity` and `action` name what happened, e.g. `("Brand", "created")`.
    pub fn from_outcome<T>(entity: &str, action: &str, outcome: &CompositeOutcome<T>) -> Self {
        let title = format!("{} {}", entity, capitalize(action));
        match outcome {
            CompositeOutcome::Success(_) => Self::success(
                title,
                format!("The {} has been successfully {}", entity.to_lowercase(), action),
            ),
            CompositeOutcome::PartialSuccess { image_error, .. } => Self::warning(
                title,
                format!(
                    "{} {} successfully, but the image upload failed ({}). You can add an image later by editing the {}.",
                    entity,
                    action,
                    image_error,
                    entity.to_lowercase()
                ),
            ),
            CompositeOutcome::Failure(err) => Self::from_error(err),
        }
    }

    /// Notice for a single-phase write
    pub fn from_result<T>(title: &str, message: &str, result: &ClientResult<T>) -> Self {
        match result {
            Ok(_) => Self::success(title, message),
            Err(err) => Self::from_error(err),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
