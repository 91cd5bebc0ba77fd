//! Demo authentication: a fixed user table, stateless HS256 session tokens
//! and the cookie that carries them.

mod cookie;
mod directory;
mod session;

pub use cookie::{
    SESSION_COOKIE_NAME, clear_session_cookie, extract_session_token, session_cookie,
};
pub use directory::{GroupKind, GroupRef, Role, UserDirectory, UserRecord, UserSummary};
pub use session::{Session, SessionIssuer, TokenError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Checks the credentials and mints a session token for the matching user.
pub fn login<'a>(
    directory: &'a UserDirectory,
    sessions: &SessionIssuer,
    email: &str,
    password: &str,
) -> Result<(String, &'a UserRecord), AuthError> {
    let user = directory.authenticate(email, password)?;
    let token = sessions.issue(user)?;
    Ok((token, user))
}

impl From<&Session> for UserSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.user_id.clone(),
            email: session.subject.clone(),
            role: session.role,
            groups: session.groups.clone(),
        }
    }
}
