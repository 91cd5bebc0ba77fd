use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::vortex::{InvitationTarget, JwtPayload};

/// Optional explicit identity for `POST /api/vortex/jwt`. Used only when both
/// `user_id` and `identifiers` are present.
#[derive(Debug, Default, Deserialize)]
pub struct JwtRequest {
    pub user_id: Option<String>,
    pub identifiers: Option<BTreeMap<String, String>>,
    pub groups: Option<Vec<Value>>,
    pub role: Option<String>,
}

impl JwtRequest {
    pub fn into_payload(self) -> Option<JwtPayload> {
        match (self.user_id, self.identifiers) {
            (Some(user_id), Some(identifiers)) => Some(JwtPayload {
                user_id,
                identifiers,
                groups: self.groups,
                role: self.role,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtResponse {
    pub jwt: String,
}

#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    #[serde(rename = "targetType")]
    pub target_type: String,
    #[serde(rename = "targetValue")]
    pub target_value: String,
}

#[derive(Debug, Deserialize)]
pub struct AcceptInvitationsRequest {
    #[serde(rename = "invitationIds")]
    pub invitation_ids: Vec<String>,
    pub target: InvitationTarget,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvitationsResponse {
    pub invitations: Vec<Value>,
}
