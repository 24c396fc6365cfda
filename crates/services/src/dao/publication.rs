use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use serde::Deserialize;
use std::str::FromStr;
use tracing::info;

use labdesk_db::models::{Publication, PublicationStatus, Role};

use super::base::{BaseDao, DaoError, DaoResult};
use crate::authz;

/// Full content of a publication. `edit_content` replaces all of it;
/// status is carried separately and never touched by a content edit.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicationContent {
    pub meta: Option<String>,
    pub title: String,
    pub authors: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub link: Option<String>,
    pub link_label: Option<String>,
}

pub struct PublicationDao {
    pub base: BaseDao<Publication>,
}

impl PublicationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Publication::COLLECTION),
        }
    }

    /// Creates a publication. Admin submissions are pre-approved; lead
    /// submissions always start pending, whatever the client sent.
    pub async fn create(
        &self,
        content: PublicationContent,
        created_by: ObjectId,
        as_admin: bool,
    ) -> DaoResult<Publication> {
        let status = if as_admin {
            PublicationStatus::Approved
        } else {
            PublicationStatus::Pending
        };

        let now = DateTime::now();
        let publication = Publication {
            id: None,
            meta: content.meta,
            title: content.title,
            authors: content.authors,
            description: content.description,
            tag: content.tag,
            link: content.link,
            link_label: content.link_label,
            status,
            created_by,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&publication).await?;
        info!(%id, status = %status, "Publication created");
        self.base.find_by_id(id).await
    }

    /// Admin-only status transition. Any of the three states is reachable
    /// from any other; the value itself is validated against the closed set.
    pub async fn set_status(
        &self,
        id: ObjectId,
        status: &str,
        actor_role: Role,
    ) -> DaoResult<Publication> {
        if !authz::can_access_admin_area(actor_role) {
            return Err(DaoError::Forbidden("admin role required".into()));
        }
        let status = PublicationStatus::from_str(status)
            .map_err(DaoError::InvalidStatus)?;

        self.base.find_by_id(id).await?;
        self.base
            .update_by_id(id, doc! { "$set": { "status": status.as_str() } })
            .await?;
        self.base.find_by_id(id).await
    }

    /// Admin-only full content replace. Status is left as is.
    pub async fn edit_content(
        &self,
        id: ObjectId,
        content: PublicationContent,
        actor_role: Role,
    ) -> DaoResult<Publication> {
        if !authz::can_edit_publication_content(actor_role) {
            return Err(DaoError::Forbidden("admin role required".into()));
        }

        self.base.find_by_id(id).await?;
        self.base
            .update_by_id(
                id,
                doc! { "$set": {
                    "meta": content.meta,
                    "title": content.title,
                    "authors": content.authors,
                    "description": content.description,
                    "tag": content.tag,
                    "link": content.link,
                    "link_label": content.link_label,
                } },
            )
            .await?;
        self.base.find_by_id(id).await
    }

    /// Public read path: approved publications only.
    pub async fn list_approved(&self) -> DaoResult<Vec<Publication>> {
        self.base
            .find_many(
                doc! { "status": PublicationStatus::Approved.as_str() },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    pub async fn list_all(&self, actor_role: Role) -> DaoResult<Vec<Publication>> {
        if !authz::can_access_admin_area(actor_role) {
            return Err(DaoError::Forbidden("admin role required".into()));
        }
        self.base
            .find_many(doc! {}, Some(doc! { "created_at": -1 }))
            .await
    }
}
