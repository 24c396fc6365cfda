use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use bson::{doc, oid::ObjectId};
use labdesk_db::models::{Role, User};
use labdesk_services::authz;

use crate::{error::ApiError, state::AppState};

/// The authenticated actor: identity token verified, user record reloaded
/// from the database on every request so a role change takes effect
/// immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub user: User,
}

impl AuthUser {
    pub fn role(&self) -> Role {
        self.user.role
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Try Authorization header first
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|s| s.to_string())
            // Then try cookie
            .or_else(|| {
                parts
                    .headers
                    .get(header::COOKIE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|cookies| {
                        cookies.split(';').find_map(|cookie| {
                            let cookie = cookie.trim();
                            cookie
                                .strip_prefix("access_token=")
                                .map(|s| s.to_string())
                        })
                    })
            })
            .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

        let identity = app_state.auth.verify_identity_token(&token)?;

        let user = app_state
            .users
            .base
            .find_one(doc! { "uid": &identity.subject })
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        let user_id = user
            .id
            .ok_or_else(|| ApiError::Internal("user without id".to_string()))?;

        Ok(AuthUser { user_id, user })
    }
}

/// An authenticated actor that passed the admin-area predicate.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !authz::can_access_admin_area(auth.role()) {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(auth))
    }
}

/// An authenticated actor that passed the lead predicate. Admins do not
/// pass: lead-scoped data belongs to the owning lead only.
#[derive(Debug, Clone)]
pub struct LeadUser(pub AuthUser);

impl<S> FromRequestParts<S> for LeadUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !authz::can_act_as_lead(auth.role()) {
            return Err(ApiError::Forbidden("Lead role required".to_string()));
        }
        Ok(LeadUser(auth))
    }
}

/// Helper trait for extracting AppState from composite state types
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AppState> for AppState {
    fn from_ref(input: &AppState) -> Self {
        input.clone()
    }
}
