use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use serde::Deserialize;
use tracing::info;

use labdesk_db::models::{Role, User};

use super::base::{BaseDao, DaoError, DaoResult};
use crate::auth::VerifiedIdentity;
use crate::authz;

/// Partial update for a member's profile. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberProfilePatch {
    pub display_name: Option<String>,
    pub mobile: Option<String>,
    pub student_id: Option<String>,
    pub student_email: Option<String>,
}

/// A lead together with the members assigned to them.
#[derive(Debug, Clone)]
pub struct TeamGroup {
    pub lead: User,
    pub members: Vec<User>,
}

pub struct UserDao {
    pub base: BaseDao<User>,
    root_admin_email: String,
}

impl UserDao {
    pub fn new(db: &Database, root_admin_email: String) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
            root_admin_email,
        }
    }

    pub fn root_admin_email(&self) -> &str {
        &self.root_admin_email
    }

    /// Maps a verified external identity to the internal user record,
    /// creating one on first sight.
    ///
    /// Lookup order: by external subject first; on a miss this is the
    /// account's first login, so a manually pre-provisioned placeholder with
    /// the same email gets the subject bound to it, otherwise a fresh user
    /// is created. The root-admin role self-heals on every login.
    pub async fn resolve_identity(&self, identity: &VerifiedIdentity) -> DaoResult<User> {
        let email = identity
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| DaoError::Identity("verified identity has no email".into()))?;

        let existing = self
            .base
            .find_one(doc! { "uid": &identity.subject })
            .await?;

        let user = match existing {
            Some(user) => user,
            None => match self.base.find_one(doc! { "email": email }).await? {
                Some(placeholder) => {
                    // First login of a pre-provisioned account: bind the
                    // external subject, keep the pre-assigned role.
                    let id = placeholder.id.ok_or(DaoError::NotFound)?;
                    self.base
                        .update_by_id(id, doc! { "$set": { "uid": &identity.subject } })
                        .await?;
                    info!(%email, "Linked placeholder user to external identity");
                    self.base.find_by_id(id).await?
                }
                None => {
                    let role = if authz::is_root_admin(email, &self.root_admin_email) {
                        Role::Admin
                    } else {
                        Role::Member
                    };
                    let user = self
                        .insert_user(Some(identity.subject.clone()), email, identity.display_name.clone(), role)
                        .await?;
                    info!(%email, role = %role, "New user created on first login");
                    return Ok(user);
                }
            },
        };

        // Self-heal the root-admin invariant and backfill the display name.
        let mut set = bson::Document::new();
        if authz::is_root_admin(&user.email, &self.root_admin_email) && user.role != Role::Admin {
            set.insert("role", Role::Admin.as_str());
            info!(email = %user.email, "Root admin role restored");
        }
        if user.display_name.is_none() {
            if let Some(name) = &identity.display_name {
                set.insert("display_name", name.as_str());
            }
        }

        let id = user.id.ok_or(DaoError::NotFound)?;
        if !set.is_empty() {
            self.base.update_by_id(id, doc! { "$set": set }).await?;
            return self.base.find_by_id(id).await;
        }
        Ok(user)
    }

    /// Changes a user's role. The root-admin account rejects any role other
    /// than admin; the guard runs before anything is written.
    pub async fn change_role(
        &self,
        target_id: ObjectId,
        new_role: Role,
        actor_role: Role,
    ) -> DaoResult<User> {
        if !authz::can_access_admin_area(actor_role) {
            return Err(DaoError::Forbidden("admin role required".into()));
        }

        let target = self.base.find_by_id(target_id).await?;
        let effective = authz::guard_role_change(&target.email, &self.root_admin_email, new_role)?;

        self.base
            .update_by_id(target_id, doc! { "$set": { "role": effective.as_str() } })
            .await?;
        self.base.find_by_id(target_id).await
    }

    /// Creates or updates a user by email, for manual provisioning. A user
    /// that has never logged in stays a placeholder (no external subject).
    /// Supplying the root-admin email coerces the role to admin.
    pub async fn upsert_by_email(
        &self,
        email: &str,
        display_name: Option<String>,
        role: Role,
        actor_role: Role,
    ) -> DaoResult<User> {
        if !authz::can_access_admin_area(actor_role) {
            return Err(DaoError::Forbidden("admin role required".into()));
        }
        if email.is_empty() {
            return Err(DaoError::Validation("email is required".into()));
        }

        let effective = authz::coerce_role_for_email(email, &self.root_admin_email, role);

        match self.base.find_one(doc! { "email": email }).await? {
            Some(user) => {
                let id = user.id.ok_or(DaoError::NotFound)?;
                let mut set = doc! { "role": effective.as_str() };
                if let Some(name) = display_name {
                    set.insert("display_name", name);
                }
                self.base.update_by_id(id, doc! { "$set": set }).await?;
                self.base.find_by_id(id).await
            }
            None => {
                let user = self.insert_user(None, email, display_name, effective).await?;
                info!(%email, role = %effective, "Placeholder user created");
                Ok(user)
            }
        }
    }

    pub async fn list_all(&self, actor_role: Role) -> DaoResult<Vec<User>> {
        if !authz::can_access_admin_area(actor_role) {
            return Err(DaoError::Forbidden("admin role required".into()));
        }
        self.base.find_many(doc! {}, Some(doc! { "email": 1 })).await
    }

    /// Assigns a member to a lead, overwriting any previous assignment.
    /// Both ids must resolve and carry the expected roles.
    pub async fn assign(&self, member_id: ObjectId, lead_id: ObjectId) -> DaoResult<User> {
        let member = self.base.find_by_id(member_id).await?;
        let lead = self.base.find_by_id(lead_id).await?;

        if member.role != Role::Member {
            return Err(DaoError::Validation(format!(
                "user {} is not a member",
                member.email
            )));
        }
        if lead.role != Role::Lead {
            return Err(DaoError::Validation(format!(
                "user {} is not a lead",
                lead.email
            )));
        }

        self.base
            .update_by_id(member_id, doc! { "$set": { "lead": lead_id } })
            .await?;
        self.base.find_by_id(member_id).await
    }

    /// Removes a member from their team. The user record survives; only the
    /// lead back-reference is cleared.
    pub async fn unassign(&self, member_id: ObjectId) -> DaoResult<User> {
        // Resolve first so an unknown id surfaces as NotFound.
        self.base.find_by_id(member_id).await?;
        self.base
            .update_by_id(member_id, doc! { "$unset": { "lead": "" } })
            .await?;
        self.base.find_by_id(member_id).await
    }

    pub async fn update_profile(
        &self,
        member_id: ObjectId,
        patch: MemberProfilePatch,
    ) -> DaoResult<User> {
        self.base.find_by_id(member_id).await?;

        let mut set = bson::Document::new();
        if let Some(name) = patch.display_name {
            set.insert("display_name", name);
        }
        if let Some(mobile) = patch.mobile {
            set.insert("mobile", mobile);
        }
        if let Some(student_id) = patch.student_id {
            set.insert("student_id", student_id);
        }
        if let Some(student_email) = patch.student_email {
            set.insert("student_email", student_email);
        }

        if !set.is_empty() {
            self.base
                .update_by_id(member_id, doc! { "$set": set })
                .await?;
        }
        self.base.find_by_id(member_id).await
    }

    pub async fn members_of(&self, lead_id: ObjectId) -> DaoResult<Vec<User>> {
        self.base
            .find_many(doc! { "lead": lead_id }, Some(doc! { "email": 1 }))
            .await
    }

    /// Every lead with their (possibly empty) member set, for the team
    /// overview. One query per side, grouped in memory.
    pub async fn grouped_by_lead(&self) -> DaoResult<Vec<TeamGroup>> {
        let leads = self
            .base
            .find_many(doc! { "role": Role::Lead.as_str() }, Some(doc! { "email": 1 }))
            .await?;
        let assigned = self
            .base
            .find_many(
                doc! { "lead": { "$exists": true, "$ne": null } },
                Some(doc! { "email": 1 }),
            )
            .await?;

        let groups = leads
            .into_iter()
            .map(|lead| {
                let lead_id = lead.id;
                let members = assigned
                    .iter()
                    .filter(|m| m.lead.is_some() && m.lead == lead_id)
                    .cloned()
                    .collect();
                TeamGroup { lead, members }
            })
            .collect();
        Ok(groups)
    }

    async fn insert_user(
        &self,
        uid: Option<String>,
        email: &str,
        display_name: Option<String>,
        role: Role,
    ) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            uid,
            email: email.to_string(),
            display_name,
            role,
            mobile: None,
            student_id: None,
            student_email: None,
            lead: None,
            created_at: now,
            updated_at: now,
        };
        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }
}
