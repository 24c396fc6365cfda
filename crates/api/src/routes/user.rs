use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use labdesk_db::models::Role;
use serde::Deserialize;
use std::str::FromStr;

use super::auth::UserResponse;
use crate::{error::ApiError, extractors::auth::AdminUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct ManualUserRequest {
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
}

pub async fn list(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list_all(auth.role()).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Changes a user's role. Demoting the root admin is rejected with 409.
pub async fn change_role(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
    Path(user_id): Path<String>,
    Json(body): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = ObjectId::parse_str(&user_id)
        .map_err(|_| ApiError::BadRequest("Invalid user id".to_string()))?;
    let role = Role::from_str(&body.role).map_err(ApiError::BadRequest)?;

    let user = state.users.change_role(id, role, auth.role()).await?;
    Ok(Json(user.into()))
}

/// Creates or updates a user by email before they have ever logged in.
/// Supplying the root-admin email coerces the role to admin.
pub async fn upsert_manual(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
    Json(body): Json<ManualUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let role = Role::from_str(&body.role).map_err(ApiError::BadRequest)?;

    let user = state
        .users
        .upsert_by_email(&body.email, body.display_name, role, auth.role())
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}
