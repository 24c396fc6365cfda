mod conference;
mod publication;
mod user;

pub use conference::{Conference, ConferenceStatus};
pub use publication::{Publication, PublicationStatus};
pub use user::{Role, User};
