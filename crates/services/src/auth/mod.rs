use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use labdesk_config::AuthSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims carried by an identity token. The external identity provider
/// signs these; we only ever verify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Output of token verification: the only thing the rest of the system
/// knows about the identity provider.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

pub struct AuthService {
    settings: AuthSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(settings: AuthSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.token_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(settings.token_secret.as_bytes());
        Self {
            settings,
            encoding_key,
            decoding_key,
        }
    }

    /// Verifies an identity token and extracts the verified triple.
    pub fn verify_identity_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.settings.issuer]);
        validation.set_audience(&[&self.settings.audience]);

        let token_data = decode::<IdentityClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        let claims = token_data.claims;
        Ok(VerifiedIdentity {
            subject: claims.sub,
            email: claims.email,
            display_name: claims.name,
        })
    }

    /// Mints an identity token with this service's own secret. Used by dev
    /// tooling and the test harness; production tokens come from the real
    /// provider.
    pub fn issue_identity_token(
        &self,
        subject: &str,
        email: Option<&str>,
        name: Option<&str>,
        ttl_secs: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: subject.to_string(),
            email: email.map(str::to_string),
            name: name.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
