use axum::{Json, extract::State, http::StatusCode};
use labdesk_db::models::User;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id_token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub role: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub mobile: Option<String>,
    pub student_id: Option<String>,
    pub student_email: Option<String>,
    pub lead: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            display_name: user.display_name,
            role: user.role.to_string(),
            mobile: user.mobile,
            student_id: user.student_id,
            student_email: user.student_email,
            lead: user.lead.map(|id| id.to_hex()),
        }
    }
}

/// Exchanges an identity-provider token for the internal user record,
/// creating or linking it on first login.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    if body.id_token.is_empty() {
        return Err(ApiError::BadRequest("ID token is required".to_string()));
    }

    let identity = state.auth.verify_identity_token(&body.id_token)?;
    let user = state.users.resolve_identity(&identity).await?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            role: user.role.to_string(),
            user: user.into(),
        }),
    ))
}

pub async fn me(auth: AuthUser) -> Json<UserResponse> {
    Json(auth.user.into())
}
