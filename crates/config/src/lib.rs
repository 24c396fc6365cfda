mod settings;

pub use settings::{AppSettings, AuthSettings, DatabaseSettings, Settings};
