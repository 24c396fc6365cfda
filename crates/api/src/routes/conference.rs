use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use labdesk_db::models::{Conference, ConferenceStatus, User};
use labdesk_services::dao::conference::ConferencePatch;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::auth::{AdminUser, LeadUser},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateConferenceRequest {
    pub title: String,
    pub date: Option<String>,
    pub link: Option<String>,
    pub status: Option<ConferenceStatus>,
    #[serde(default)]
    pub author_ids: Vec<String>,
}

/// Admin variant: creates the conference on behalf of any lead.
#[derive(Debug, Deserialize)]
pub struct AdminCreateConferenceRequest {
    pub lead_id: String,
    #[serde(flatten)]
    pub fields: CreateConferenceRequest,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConferenceRequest {
    pub title: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
    pub status: Option<ConferenceStatus>,
    pub author_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AuthorRef {
    pub id: String,
    pub display_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ConferenceResponse {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    pub link: Option<String>,
    pub status: String,
    pub lead: String,
    pub authors: Vec<AuthorRef>,
}

fn to_response(conference: Conference, authors: Vec<User>) -> ConferenceResponse {
    ConferenceResponse {
        id: conference.id.map(|id| id.to_hex()).unwrap_or_default(),
        title: conference.title,
        date: conference.date,
        link: conference.link,
        status: conference.status.to_string(),
        lead: conference.lead.to_hex(),
        authors: authors
            .into_iter()
            .map(|u| AuthorRef {
                id: u.id.map(|id| id.to_hex()).unwrap_or_default(),
                display_name: u.display_name,
                email: u.email,
            })
            .collect(),
    }
}

fn parse_ids(ids: &[String], what: &str) -> Result<Vec<ObjectId>, ApiError> {
    ids.iter()
        .map(|s| ObjectId::parse_str(s))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {what}")))
}

async fn respond(state: &AppState, conference: Conference) -> Result<ConferenceResponse, ApiError> {
    let authors = state.conferences.resolve_authors(&conference.authors).await?;
    Ok(to_response(conference, authors))
}

pub async fn list_mine(
    State(state): State<AppState>,
    LeadUser(auth): LeadUser,
) -> Result<Json<Vec<ConferenceResponse>>, ApiError> {
    let conferences = state.conferences.list_for_lead(auth.user_id).await?;

    let mut items = Vec::with_capacity(conferences.len());
    for conference in conferences {
        items.push(respond(&state, conference).await?);
    }
    Ok(Json(items))
}

pub async fn create_as_lead(
    State(state): State<AppState>,
    LeadUser(auth): LeadUser,
    Json(body): Json<CreateConferenceRequest>,
) -> Result<(StatusCode, Json<ConferenceResponse>), ApiError> {
    let author_ids = parse_ids(&body.author_ids, "author id")?;

    let conference = state
        .conferences
        .create(body.title, body.date, body.link, body.status, auth.user_id, author_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(respond(&state, conference).await?)))
}

pub async fn update_as_lead(
    State(state): State<AppState>,
    LeadUser(auth): LeadUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateConferenceRequest>,
) -> Result<Json<ConferenceResponse>, ApiError> {
    let id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid conference id".to_string()))?;
    let patch = to_patch(body)?;

    let conference = state
        .conferences
        .update(id, patch, auth.user_id, auth.role())
        .await?;
    Ok(Json(respond(&state, conference).await?))
}

pub async fn list_all(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
) -> Result<Json<Vec<ConferenceResponse>>, ApiError> {
    let conferences = state.conferences.list_all(auth.role()).await?;

    let mut items = Vec::with_capacity(conferences.len());
    for conference in conferences {
        items.push(respond(&state, conference).await?);
    }
    Ok(Json(items))
}

pub async fn create_as_admin(
    State(state): State<AppState>,
    AdminUser(_auth): AdminUser,
    Json(body): Json<AdminCreateConferenceRequest>,
) -> Result<(StatusCode, Json<ConferenceResponse>), ApiError> {
    let lead_id = ObjectId::parse_str(&body.lead_id)
        .map_err(|_| ApiError::BadRequest("Invalid lead_id".to_string()))?;
    let author_ids = parse_ids(&body.fields.author_ids, "author id")?;

    let conference = state
        .conferences
        .create(
            body.fields.title,
            body.fields.date,
            body.fields.link,
            body.fields.status,
            lead_id,
            author_ids,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(respond(&state, conference).await?)))
}

pub async fn update_as_admin(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateConferenceRequest>,
) -> Result<Json<ConferenceResponse>, ApiError> {
    let id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid conference id".to_string()))?;
    let patch = to_patch(body)?;

    let conference = state
        .conferences
        .update(id, patch, auth.user_id, auth.role())
        .await?;
    Ok(Json(respond(&state, conference).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(auth): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid conference id".to_string()))?;

    state.conferences.delete(id, auth.role()).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn to_patch(body: UpdateConferenceRequest) -> Result<ConferencePatch, ApiError> {
    let authors = body
        .author_ids
        .as_deref()
        .map(|ids| parse_ids(ids, "author id"))
        .transpose()?;

    Ok(ConferencePatch {
        title: body.title,
        date: body.date,
        link: body.link,
        status: body.status,
        authors,
    })
}
