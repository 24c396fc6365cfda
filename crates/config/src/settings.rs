use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// Identity-token verification settings. The token secret/issuer/audience
/// must match whatever the external identity provider signs with; the
/// root-admin email pins that account's role to admin.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub token_secret: String,
    pub issuer: String,
    pub audience: String,
    pub root_admin_email: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("LABDESK"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 5001)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "labdesk")?
            .set_default("auth.token_secret", "change-me-in-production")?
            .set_default("auth.issuer", "labdesk-identity")?
            .set_default("auth.audience", "labdesk")?
            .set_default("auth.root_admin_email", "")?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
