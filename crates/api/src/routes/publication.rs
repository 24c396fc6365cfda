use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use labdesk_db::models::Publication;
use labdesk_services::dao::publication::PublicationContent;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::auth::{AdminUser, LeadUser},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct PublicationResponse {
    pub id: String,
    pub meta: Option<String>,
    pub title: String,
    pub authors: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub link: Option<String>,
    pub link_label: Option<String>,
    pub status: String,
    pub created_by: String,
}

impl From<Publication> for PublicationResponse {
    fn from(p: Publication) -> Self {
        Self {
            id: p.id.map(|id| id.to_hex()).unwrap_or_default(),
            meta: p.meta,
            title: p.title,
            authors: p.authors,
            description: p.description,
            tag: p.tag,
            link: p.link,
            link_label: p.link_label,
            status: p.status.to_string(),
            created_by: p.created_by.to_hex(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Public homepage feed: approved publications only, no authentication.
pub async fn list_approved(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicationResponse>>, ApiError> {
    let publications = state.publications.list_approved().await?;
    Ok(Json(publications.into_iter().map(Into::into).collect()))
}

pub async fn list_all(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
) -> Result<Json<Vec<PublicationResponse>>, ApiError> {
    let publications = state.publications.list_all(auth.role()).await?;
    Ok(Json(publications.into_iter().map(Into::into).collect()))
}

/// Admin submission: created directly in approved state.
pub async fn create_as_admin(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
    Json(content): Json<PublicationContent>,
) -> Result<(StatusCode, Json<PublicationResponse>), ApiError> {
    let publication = state
        .publications
        .create(content, auth.user_id, true)
        .await?;
    Ok((StatusCode::CREATED, Json(publication.into())))
}

/// Lead submission: always starts pending, whatever the client sent.
pub async fn submit_as_lead(
    State(state): State<AppState>,
    LeadUser(auth): LeadUser,
    Json(content): Json<PublicationContent>,
) -> Result<(StatusCode, Json<PublicationResponse>), ApiError> {
    let publication = state
        .publications
        .create(content, auth.user_id, false)
        .await?;
    Ok((StatusCode::CREATED, Json(publication.into())))
}

pub async fn set_status(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<PublicationResponse>, ApiError> {
    let id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid publication id".to_string()))?;

    let publication = state
        .publications
        .set_status(id, &body.status, auth.role())
        .await?;
    Ok(Json(publication.into()))
}

pub async fn edit_content(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
    Path(id): Path<String>,
    Json(content): Json<PublicationContent>,
) -> Result<Json<PublicationResponse>, ApiError> {
    let id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid publication id".to_string()))?;

    let publication = state
        .publications
        .edit_content(id, content, auth.role())
        .await?;
    Ok(Json(publication.into()))
}
