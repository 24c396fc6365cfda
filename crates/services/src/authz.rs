//! Authorization predicates and the root-admin guard.
//!
//! Every role/ownership decision in the system goes through one of these
//! functions; route handlers and DAOs never compare role strings ad hoc.
//! All functions are pure.

use bson::oid::ObjectId;
use labdesk_db::models::{Conference, Role, User};

use crate::dao::base::DaoError;

/// Admin dashboard and every `/api/admin` operation.
pub fn can_access_admin_area(role: Role) -> bool {
    role == Role::Admin
}

/// Lead-scoped data (own team, own conferences). Admins do not inherit
/// lead ownership; they have their own broader endpoints.
pub fn can_act_as_lead(role: Role) -> bool {
    role == Role::Lead
}

pub fn owns_conference(actor_id: ObjectId, conference: &Conference) -> bool {
    conference.lead == actor_id
}

/// A lead manages exactly the members whose `lead` back-reference is them.
pub fn manages_member(lead_id: ObjectId, member: &User) -> bool {
    member.lead == Some(lead_id)
}

pub fn can_edit_publication_content(role: Role) -> bool {
    role == Role::Admin
}

/// Guard for the single-user role-change path: a demotion of the root-admin
/// account is rejected outright, before anything is persisted.
pub fn guard_role_change(
    target_email: &str,
    root_admin_email: &str,
    requested: Role,
) -> Result<Role, DaoError> {
    if is_root_admin(target_email, root_admin_email) && requested != Role::Admin {
        return Err(DaoError::RootAdminLocked);
    }
    Ok(requested)
}

/// Guard for the upsert-by-email path: supplying the root-admin email with
/// any role silently coerces to admin instead of erroring.
pub fn coerce_role_for_email(email: &str, root_admin_email: &str, requested: Role) -> Role {
    if is_root_admin(email, root_admin_email) {
        Role::Admin
    } else {
        requested
    }
}

pub fn is_root_admin(email: &str, root_admin_email: &str) -> bool {
    !root_admin_email.is_empty() && email == root_admin_email
}
