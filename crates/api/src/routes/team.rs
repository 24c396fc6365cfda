use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use labdesk_db::models::User;
use labdesk_services::{authz, dao::user::MemberProfilePatch};
use serde::{Deserialize, Serialize};

use super::auth::UserResponse;
use crate::{
    error::ApiError,
    extractors::auth::{AdminUser, LeadUser},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub member_id: String,
    pub lead_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UnassignRequest {
    pub member_id: String,
}

#[derive(Debug, Serialize)]
pub struct LeadCard {
    pub id: String,
    pub display_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub display_name: Option<String>,
    pub email: String,
    pub mobile: Option<String>,
    pub student_id: Option<String>,
    pub student_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub lead: LeadCard,
    pub members: Vec<MemberResponse>,
}

fn lead_card(user: &User) -> LeadCard {
    LeadCard {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        display_name: user.display_name.clone(),
        email: user.email.clone(),
    }
}

fn member_response(user: User) -> MemberResponse {
    MemberResponse {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        display_name: user.display_name,
        email: user.email,
        mobile: user.mobile,
        student_id: user.student_id,
        student_email: user.student_email,
    }
}

/// Puts a member on a lead's team, overwriting any previous assignment.
pub async fn assign(
    State(state): State<AppState>,
    AdminUser(_auth): AdminUser,
    Json(body): Json<AssignRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let member_id = ObjectId::parse_str(&body.member_id)
        .map_err(|_| ApiError::BadRequest("Invalid member_id".to_string()))?;
    let lead_id = ObjectId::parse_str(&body.lead_id)
        .map_err(|_| ApiError::BadRequest("Invalid lead_id".to_string()))?;

    let user = state.users.assign(member_id, lead_id).await?;
    Ok(Json(user.into()))
}

/// Takes a member off their team. The account itself survives.
pub async fn unassign(
    State(state): State<AppState>,
    AdminUser(_auth): AdminUser,
    Json(body): Json<UnassignRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let member_id = ObjectId::parse_str(&body.member_id)
        .map_err(|_| ApiError::BadRequest("Invalid member_id".to_string()))?;

    let user = state.users.unassign(member_id).await?;
    Ok(Json(user.into()))
}

/// Team overview: every lead with their member set, empty teams included.
pub async fn grouped(
    State(state): State<AppState>,
    AdminUser(_auth): AdminUser,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let groups = state.users.grouped_by_lead().await?;

    let response = groups
        .into_iter()
        .map(|group| TeamResponse {
            lead: lead_card(&group.lead),
            members: group.members.into_iter().map(member_response).collect(),
        })
        .collect();
    Ok(Json(response))
}

/// A lead's own team view.
pub async fn my_team(
    State(state): State<AppState>,
    LeadUser(auth): LeadUser,
) -> Result<Json<TeamResponse>, ApiError> {
    let members = state.users.members_of(auth.user_id).await?;

    Ok(Json(TeamResponse {
        lead: lead_card(&auth.user),
        members: members.into_iter().map(member_response).collect(),
    }))
}

/// Profile update for a member of the calling lead's own team.
pub async fn update_member_profile(
    State(state): State<AppState>,
    LeadUser(auth): LeadUser,
    Path(member_id): Path<String>,
    Json(patch): Json<MemberProfilePatch>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member_id = ObjectId::parse_str(&member_id)
        .map_err(|_| ApiError::BadRequest("Invalid member id".to_string()))?;

    let member = state.users.base.find_by_id(member_id).await?;
    if !authz::manages_member(auth.user_id, &member) {
        return Err(ApiError::Forbidden(
            "Member belongs to another team".to_string(),
        ));
    }

    let updated = state.users.update_profile(member_id, patch).await?;
    Ok(Json(member_response(updated)))
}
