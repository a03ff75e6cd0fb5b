use shared::models::{PasswordChange, ProfileUpdate, User};

use super::{SyncContext, keys};
use crate::error::ClientResult;

/// User profiles
#[derive(Debug, Clone)]
pub struct Users {
    ctx: SyncContext,
}

impl Users {
    pub(crate) fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn get(&self, id: &str) -> ClientResult<User> {
        let user_id = id.to_string();
        self.ctx
            .read_protected(keys::user(id), move |http| {
                let user_id = user_id.clone();
                async move { http.fetch_user(&user_id).await }
            })
            .await
    }

    pub async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> ClientResult<User> {
        let user = self.ctx.http.update_profile(id, update).await?;
        self.ctx.invalidate(&[keys::user(id)]);
        Ok(user)
    }

    pub async fn change_password(&self, change: &PasswordChange) -> ClientResult<()> {
        self.ctx.http.change_password(change).await
    }
}
