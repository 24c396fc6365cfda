pub mod auth;
pub mod authz;
pub mod dao;

pub use auth::{AuthService, VerifiedIdentity};
pub use dao::*;
