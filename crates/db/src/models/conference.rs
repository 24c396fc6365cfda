use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conference {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub date: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub status: ConferenceStatus,
    /// Owning lead. Only this lead (or an admin) may read/mutate the record.
    pub lead: ObjectId,
    #[serde(default)]
    pub authors: Vec<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Progress pipeline. Transitions are deliberately unordered: a conference
/// can move between any two states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConferenceStatus {
    #[default]
    Submitted,
    Accepted,
    Presented,
    Published,
}

impl ConferenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConferenceStatus::Submitted => "submitted",
            ConferenceStatus::Accepted => "accepted",
            ConferenceStatus::Presented => "presented",
            ConferenceStatus::Published => "published",
        }
    }
}

impl fmt::Display for ConferenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConferenceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ConferenceStatus::Submitted),
            "accepted" => Ok(ConferenceStatus::Accepted),
            "presented" => Ok(ConferenceStatus::Presented),
            "published" => Ok(ConferenceStatus::Published),
            other => Err(format!("unknown conference status: {other}")),
        }
    }
}

impl Conference {
    pub const COLLECTION: &'static str = "conferences";
}
