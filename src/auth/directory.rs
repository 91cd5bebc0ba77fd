use std::fmt;

use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::utils::{hash_password, verify_password};

// Fixture hashes use one fixed salt so the table is identical across restarts.
const FIXTURE_SALT: [u8; 16] = *b"vortex-demo-salt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Team,
    Organization,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Team => "team",
            GroupKind::Organization => "organization",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    #[serde(rename = "type")]
    pub kind: GroupKind,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub groups: Vec<GroupRef>,
}

/// Public view of a user: everything except the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub groups: Vec<GroupRef>,
}

impl From<&UserRecord> for UserSummary {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            groups: user.groups.clone(),
        }
    }
}

struct Fixture {
    id: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    groups: &'static [(GroupKind, &'static str, &'static str)],
}

const FIXTURES: [Fixture; 2] = [
    Fixture {
        id: "user-1",
        email: "admin@example.com",
        password: "password123",
        role: Role::Admin,
        groups: &[
            (GroupKind::Team, "team-1", "Engineering"),
            (GroupKind::Organization, "org-1", "Acme Corp"),
        ],
    },
    Fixture {
        id: "user-2",
        email: "user@example.com",
        password: "userpass",
        role: Role::User,
        groups: &[(GroupKind::Team, "team-1", "Engineering")],
    },
];

/// The fixed set of demo accounts. Read-only once seeded.
#[derive(Debug)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    /// Builds the two demo accounts, hashing their passwords at `cost`.
    pub fn seeded(cost: u32) -> Result<Self, bcrypt::BcryptError> {
        let users = FIXTURES
            .iter()
            .map(|fixture| {
                Ok(UserRecord {
                    id: fixture.id.to_string(),
                    email: fixture.email.to_string(),
                    password_hash: hash_password(fixture.password, cost, FIXTURE_SALT)?,
                    role: fixture.role,
                    groups: fixture
                        .groups
                        .iter()
                        .map(|(kind, id, name)| GroupRef {
                            kind: *kind,
                            id: id.to_string(),
                            name: name.to_string(),
                        })
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>, bcrypt::BcryptError>>()?;

        tracing::debug!("Seeded user directory with {} accounts", users.len());
        Ok(Self { users })
    }

    pub fn find_by_email(&self, email: &str) -> Result<&UserRecord, AuthError> {
        self.users
            .iter()
            .find(|user| user.email == email)
            .ok_or(AuthError::NotFound)
    }

    /// Looks up `email` and checks `password` against its bcrypt hash.
    ///
    /// A missing account and a wrong password both come back as
    /// [`AuthError::InvalidCredentials`].
    pub fn authenticate(&self, email: &str, password: &str) -> Result<&UserRecord, AuthError> {
        let Ok(user) = self.find_by_email(email) else {
            tracing::debug!("Login for unknown account {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            tracing::debug!("Password mismatch for {}", email);
            Err(AuthError::InvalidCredentials)
        }
    }

    pub fn summaries(&self) -> Vec<UserSummary> {
        self.users.iter().map(UserSummary::from).collect()
    }
}
