use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use serde::Deserialize;
use tracing::info;

use labdesk_db::models::{Conference, ConferenceStatus, Role, User};

use super::base::{BaseDao, DaoError, DaoResult};
use crate::authz;

/// Partial update for a conference. Only `Some` fields are applied; the
/// transition graph is unordered so any status value from the closed set
/// is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConferencePatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
    pub status: Option<ConferenceStatus>,
    pub authors: Option<Vec<ObjectId>>,
}

pub struct ConferenceDao {
    pub base: BaseDao<Conference>,
    users: BaseDao<User>,
}

impl ConferenceDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Conference::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
        }
    }

    /// Creates a conference owned by `lead_id`. Every author must be one of
    /// that lead's currently assigned members.
    pub async fn create(
        &self,
        title: String,
        date: Option<String>,
        link: Option<String>,
        status: Option<ConferenceStatus>,
        lead_id: ObjectId,
        author_ids: Vec<ObjectId>,
    ) -> DaoResult<Conference> {
        self.check_authors(lead_id, &author_ids).await?;

        let now = DateTime::now();
        let conference = Conference {
            id: None,
            title,
            date,
            link,
            status: status.unwrap_or_default(),
            lead: lead_id,
            authors: author_ids,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&conference).await?;
        info!(%id, lead = %lead_id, "Conference created");
        self.base.find_by_id(id).await
    }

    /// Applies a partial update. Leads may only touch conferences they own;
    /// admins are unconditional. A failed check leaves the record unchanged.
    pub async fn update(
        &self,
        id: ObjectId,
        patch: ConferencePatch,
        actor_id: ObjectId,
        actor_role: Role,
    ) -> DaoResult<Conference> {
        let conference = self.base.find_by_id(id).await?;

        match actor_role {
            Role::Admin => {}
            Role::Lead => {
                if !authz::owns_conference(actor_id, &conference) {
                    return Err(DaoError::Forbidden(
                        "conference belongs to another lead".into(),
                    ));
                }
            }
            _ => return Err(DaoError::Forbidden("lead or admin role required".into())),
        }

        let mut set = bson::Document::new();
        if let Some(title) = patch.title {
            set.insert("title", title);
        }
        if let Some(date) = patch.date {
            set.insert("date", date);
        }
        if let Some(link) = patch.link {
            set.insert("link", link);
        }
        if let Some(status) = patch.status {
            set.insert("status", status.as_str());
        }
        if let Some(authors) = patch.authors {
            self.check_authors(conference.lead, &authors).await?;
            set.insert("authors", authors);
        }

        if !set.is_empty() {
            self.base.update_by_id(id, doc! { "$set": set }).await?;
        }
        self.base.find_by_id(id).await
    }

    pub async fn delete(&self, id: ObjectId, actor_role: Role) -> DaoResult<()> {
        if !authz::can_access_admin_area(actor_role) {
            return Err(DaoError::Forbidden("admin role required".into()));
        }
        let deleted = self.base.hard_delete(doc! { "_id": id }).await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        info!(%id, "Conference deleted");
        Ok(())
    }

    pub async fn find_for_lead(&self, id: ObjectId, lead_id: ObjectId) -> DaoResult<Conference> {
        let conference = self.base.find_by_id(id).await?;
        if !authz::owns_conference(lead_id, &conference) {
            return Err(DaoError::Forbidden(
                "conference belongs to another lead".into(),
            ));
        }
        Ok(conference)
    }

    pub async fn list_for_lead(&self, lead_id: ObjectId) -> DaoResult<Vec<Conference>> {
        self.base
            .find_many(doc! { "lead": lead_id }, Some(doc! { "created_at": -1 }))
            .await
    }

    pub async fn list_all(&self, actor_role: Role) -> DaoResult<Vec<Conference>> {
        if !authz::can_access_admin_area(actor_role) {
            return Err(DaoError::Forbidden("admin role required".into()));
        }
        self.base
            .find_many(doc! {}, Some(doc! { "created_at": -1 }))
            .await
    }

    /// Resolves author users for response embedding (display name + email).
    pub async fn resolve_authors(&self, author_ids: &[ObjectId]) -> DaoResult<Vec<User>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.users
            .find_many(
                doc! { "_id": { "$in": author_ids } },
                Some(doc! { "email": 1 }),
            )
            .await
    }

    async fn check_authors(&self, lead_id: ObjectId, author_ids: &[ObjectId]) -> DaoResult<()> {
        if author_ids.is_empty() {
            return Ok(());
        }
        let matching = self
            .users
            .count(doc! { "_id": { "$in": author_ids }, "lead": lead_id })
            .await?;
        if matching != author_ids.len() as u64 {
            return Err(DaoError::Validation(
                "every author must be a member of the lead's team".into(),
            ));
        }
        Ok(())
    }
}
