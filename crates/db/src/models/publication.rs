use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Free-text period/venue tag, e.g. "CHI '25".
    pub meta: Option<String>,
    pub title: String,
    pub authors: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub link: Option<String>,
    pub link_label: Option<String>,
    #[serde(default)]
    pub status: PublicationStatus,
    pub created_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStatus::Pending => "pending",
            PublicationStatus::Approved => "approved",
            PublicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PublicationStatus::Pending),
            "approved" => Ok(PublicationStatus::Approved),
            "rejected" => Ok(PublicationStatus::Rejected),
            other => Err(format!("unknown publication status: {other}")),
        }
    }
}

impl Publication {
    pub const COLLECTION: &'static str = "publications";
}
