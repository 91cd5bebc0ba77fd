use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::directory::{GroupRef, Role, UserRecord};
use crate::config::Config;
use crate::utils::unix_now;

/// Identity recovered from a verified session token. Also the JWT claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub role: Role,
    pub groups: Vec<GroupRef>,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token expired at {expires_at}")]
    Expired { expires_at: i64 },
}

/// Mints and checks HS256 session tokens with the server secret.
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl SessionIssuer {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiration().as_secs())
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn issue(&self, user: &UserRecord) -> Result<String, TokenError> {
        self.issue_at(user, unix_now())
    }

    /// Same input and `issued_at` always produce the same token.
    pub fn issue_at(&self, user: &UserRecord, issued_at: i64) -> Result<String, TokenError> {
        let session = Session {
            subject: user.email.clone(),
            user_id: user.id.clone(),
            role: user.role,
            groups: user.groups.clone(),
            issued_at,
            expires_at: issued_at.saturating_add(self.ttl_secs),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &session, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Session, TokenError> {
        self.verify_at(token, unix_now())
    }

    /// Checks signature and shape, then rejects once `now >= exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Session, TokenError> {
        let session = decode::<Session>(token, &self.decoding, &self.validation)?.claims;

        if now >= session.expires_at {
            return Err(TokenError::Expired {
                expires_at: session.expires_at,
            });
        }

        Ok(session)
    }
}
