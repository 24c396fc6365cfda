pub mod auth;
pub mod conference;
pub mod publication;
pub mod team;
pub mod user;
