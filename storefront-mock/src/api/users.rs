//! User profile handlers

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use shared::Validate;
use shared::models::{PasswordChange, ProfileUpdate, User};

use crate::error::{MockError, MockResult};
use crate::state::{CurrentUser, MockState, now};

pub fn routes() -> Router<MockState> {
    Router::new()
        .route("/user/{id}", get(get_by_id).put(update_profile))
        .route("/users/change-password", post(change_password))
}

fn require_self_or_admin(user: &CurrentUser, id: &str) -> MockResult<()> {
    if user.id == id || user.is_admin() {
        Ok(())
    } else {
        Err(MockError::Forbidden(
            "You can only access your own profile".to_string(),
        ))
    }
}

/// GET /api/user/{id}
async fn get_by_id(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> MockResult<Json<User>> {
    require_self_or_admin(&user, &id)?;
    let db = state.db().read().await;
    db.user(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::not_found("User", &id))
}

/// PUT /api/user/{id}
async fn update_profile(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> MockResult<Json<User>> {
    require_self_or_admin(&user, &id)?;
    update.validate()?;

    let mut db = state.db().write().await;
    if db
        .users
        .iter()
        .any(|u| u.id != id && (u.email == update.email || u.username == update.username))
    {
        return Err(MockError::Conflict(
            "Email or username is already taken".to_string(),
        ));
    }
    let profile = db
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| MockError::not_found("User", &id))?;
    profile.first_name = update.first_name;
    profile.last_name = update.last_name;
    profile.username = update.username;
    profile.email = update.email;
    profile.updated_at = Some(now());
    Ok(Json(profile.clone()))
}

/// POST /api/users/change-password; answers with plain text
async fn change_password(
    State(state): State<MockState>,
    Extension(user): Extension<CurrentUser>,
    Json(change): Json<PasswordChange>,
) -> MockResult<&'static str> {
    change.validate()?;
    let mut db = state.db().write().await;
    if db.passwords.get(&user.id) != Some(&change.current_password) {
        return Err(MockError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }
    db.passwords.insert(user.id.clone(), change.new_password);
    Ok("Password changed successfully")
}
