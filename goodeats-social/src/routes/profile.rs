use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use goodeats_shared::errors::AppResult;
use goodeats_shared::middleware::ValidJson;
use goodeats_shared::types::auth::AuthUser;
use goodeats_shared::types::ApiResponse;

use crate::models::{EventSummary, NewUser, ProfileChanges, PublicProfile, User};
use crate::services::profile_service::{self, ProfileStats};
use crate::AppState;

// --- POST /profile ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProfileRequest {
    pub username: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
}

impl CreateProfileRequest {
    pub fn into_new_user(self, id: Uuid) -> AppResult<NewUser> {
        self.validate()?;
        Ok(NewUser {
            id,
            username: profile_service::validate_username(&self.username)?,
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
        })
    }
}

pub async fn create_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let new_user = req.into_new_user(user.id)?;
    let created = profile_service::create_profile(&state.db, &new_user)?;
    Ok(Json(ApiResponse::ok_with_message(created, "Welcome to GoodEats!")))
}

// --- GET /me ---

pub async fn get_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<User>>> {
    let profile = profile_service::find_user(&state.db, user.id)?;
    Ok(Json(ApiResponse::ok(profile)))
}

// --- PATCH /me ---

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    #[validate(length(max = 120))]
    pub location: Option<String>,
    #[validate(length(max = 20))]
    pub dietary_preferences: Option<Vec<String>>,
}

impl UpdateProfileRequest {
    pub fn into_changes(self) -> AppResult<ProfileChanges> {
        self.validate()?;
        Ok(ProfileChanges {
            full_name: self.full_name.map(|n| n.trim().to_string()),
            bio: self.bio,
            avatar_url: self.avatar_url,
            location: self.location,
            dietary_preferences: self.dietary_preferences.map(serde_json::Value::from),
        })
    }
}

pub async fn update_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let changes = req.into_changes()?;
    let updated = profile_service::update_profile(&state.db, user.id, &changes)?;
    Ok(Json(ApiResponse::ok_with_message(updated, "Profile updated!")))
}

// --- GET /me/stats ---

pub async fn get_stats(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<ProfileStats>>> {
    let stats = profile_service::stats(&state.db, user.id)?;
    Ok(Json(ApiResponse::ok(stats)))
}

// --- GET /me/upcoming ---

pub async fn get_upcoming(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<EventSummary>>>> {
    let today = Utc::now().date_naive();
    let events = profile_service::upcoming_events(&state.db, user.id, today)?;
    Ok(Json(ApiResponse::ok(events)))
}

// --- GET /users/:id ---

pub async fn get_public_profile(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PublicProfile>>> {
    let profile = profile_service::find_user(&state.db, id)?;
    Ok(Json(ApiResponse::ok(PublicProfile::from(profile))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use goodeats_shared::errors::ErrorCode;

    #[test]
    fn sign_up_normalises_fields() {
        let id = Uuid::new_v4();
        let req = CreateProfileRequest {
            username: " chef_ana ".into(),
            full_name: "Ana Souza ".into(),
            email: "Ana@Example.com".into(),
        };

        let user = req.into_new_user(id).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "chef_ana");
        assert_eq!(user.full_name, "Ana Souza");
        assert_eq!(user.email, "ana@example.com");
    }

    #[test]
    fn sign_up_rejects_bad_email_and_username() {
        let bad_email = CreateProfileRequest {
            username: "chef_ana".into(),
            full_name: "Ana".into(),
            email: "not-an-email".into(),
        };
        assert_eq!(bad_email.into_new_user(Uuid::new_v4()).unwrap_err().code(), ErrorCode::ValidationError);

        let bad_name = CreateProfileRequest {
            username: "a!".into(),
            full_name: "Ana".into(),
            email: "ana@example.com".into(),
        };
        assert_eq!(bad_name.into_new_user(Uuid::new_v4()).unwrap_err().code(), ErrorCode::InvalidUsername);
    }

    #[test]
    fn dietary_preferences_are_stored_as_json_array() {
        let req: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({ "dietary_preferences": ["vegan", "nut-free"] })).unwrap();
        let changes = req.into_changes().unwrap();
        assert_eq!(changes.dietary_preferences, Some(serde_json::json!(["vegan", "nut-free"])));
        assert!(changes.full_name.is_none());
    }
}
