use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Session;

/// Identity handed to Vortex when minting a widget JWT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub identifiers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Vortex groups are `"<type>:<id>"` strings.
impl From<&Session> for JwtPayload {
    fn from(session: &Session) -> Self {
        let groups = session
            .groups
            .iter()
            .map(|group| Value::String(format!("{}:{}", group.kind.as_str(), group.id)))
            .collect();

        Self {
            user_id: session.user_id.clone(),
            identifiers: BTreeMap::from([("email".to_string(), session.subject.clone())]),
            groups: Some(groups),
            role: Some(session.role.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SignedPayload<'a> {
    #[serde(flatten)]
    pub payload: &'a JwtPayload,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationTarget {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AcceptInvitationsBody<'a> {
    #[serde(rename = "invitationIds")]
    pub invitation_ids: &'a [String],
    pub target: &'a InvitationTarget,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvitationList {
    #[serde(default)]
    pub invitations: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{GroupKind, GroupRef, Role};

    #[test]
    fn session_maps_to_vortex_identity() {
        let session = Session {
            subject: "admin@example.com".into(),
            user_id: "user-1".into(),
            role: Role::Admin,
            groups: vec![
                GroupRef {
                    kind: GroupKind::Team,
                    id: "team-1".into(),
                    name: "Engineering".into(),
                },
                GroupRef {
                    kind: GroupKind::Organization,
                    id: "org-1".into(),
                    name: "Acme Corp".into(),
                },
            ],
            issued_at: 0,
            expires_at: 1,
        };

        let payload = JwtPayload::from(&session);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "userId": "user-1",
                "identifiers": { "email": "admin@example.com" },
                "groups": ["team:team-1", "organization:org-1"],
                "role": "admin",
            })
        );
    }
}
