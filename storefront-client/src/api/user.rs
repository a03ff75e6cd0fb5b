use shared::models::{PasswordChange, ProfileUpdate, User};

use crate::error::ClientResult;
use crate::http::HttpClient;

impl HttpClient {
    pub async fn fetch_user(&self, id: &str) -> ClientResult<User> {
        self.get("Fetch user", "/user")
            .protected()
            .segment("User", id)
            .send()
            .await
    }

    pub async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> ClientResult<User> {
        self.put("Update profile", "/user")
            .segment("User", id)
            .validated_json(update)
            .send()
            .await
    }

    /// The server answers with a plain-text confirmation, which is ignored
    pub async fn change_password(&self, change: &PasswordChange) -> ClientResult<()> {
        self.post("Change password", "/users/change-password")
            .validated_json(change)
            .send_empty()
            .await
    }
}
