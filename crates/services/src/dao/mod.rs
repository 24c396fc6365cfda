pub mod base;
pub mod conference;
pub mod publication;
pub mod user;

pub use base::BaseDao;
