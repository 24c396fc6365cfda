use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// External identity subject. None for accounts pre-provisioned by an
    /// admin before the person's first login; bound on first login by
    /// matching email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub email: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    // Member-only profile extras.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_email: Option<String>,
    /// Team back-reference: the lead this member is assigned to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Lead,
    Advisor,
    Director,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Lead => "lead",
            Role::Advisor => "advisor",
            Role::Director => "director",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "lead" => Ok(Role::Lead),
            "advisor" => Ok(Role::Advisor),
            "director" => Ok(Role::Director),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl User {
    pub const COLLECTION: &'static str = "users";

    /// True for accounts created manually by an admin/lead that have never
    /// logged in through the identity provider.
    pub fn is_placeholder(&self) -> bool {
        self.uid.is_none()
    }
}
