use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;

use super::model::{
    AcceptInvitationsBody, InvitationList, InvitationTarget, JwtPayload, SignedPayload,
};
use crate::config::Config;
use crate::utils::unix_now;

const API_KEY_HEADER: &str = "x-api-key";
const WIDGET_JWT_TTL_SECS: i64 = 3600;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid Vortex base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("request to Vortex failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Vortex responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected Vortex response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to sign Vortex JWT: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Thin HTTP wrapper around the Vortex invitations API. Responses are passed
/// through as JSON; their shape belongs to Vortex.
pub struct VortexClient {
    http: Client,
    base_url: Url,
    api_key: String,
    signing_key: EncodingKey,
}

impl VortexClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, UpstreamError> {
        let parsed = Url::parse(base_url).map_err(|e| UpstreamError::BaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(UpstreamError::BaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: parsed,
            api_key: api_key.to_string(),
            signing_key: EncodingKey::from_secret(api_key.as_bytes()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(&config.vortex_api_base_url, &config.vortex_api_key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Signs a short-lived widget JWT locally with the API key.
    pub fn generate_jwt(&self, payload: &JwtPayload) -> Result<String, UpstreamError> {
        let iat = unix_now();
        let claims = SignedPayload {
            payload,
            iat,
            exp: iat + WIDGET_JWT_TTL_SECS,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.signing_key)?)
    }

    pub async fn invitations_by_target(
        &self,
        target_type: &str,
        target_value: &str,
    ) -> Result<Vec<Value>, UpstreamError> {
        let request = self
            .http
            .get(self.endpoint(&["invitations"]))
            .query(&[("targetType", target_type), ("targetValue", target_value)]);
        self.send_list(request).await
    }

    pub async fn invitations_by_group(
        &self,
        group_type: &str,
        group_id: &str,
    ) -> Result<Vec<Value>, UpstreamError> {
        let request = self
            .http
            .get(self.endpoint(&["invitations", "by-group", group_type, group_id]));
        self.send_list(request).await
    }

    pub async fn invitation(&self, invitation_id: &str) -> Result<Value, UpstreamError> {
        let request = self.http.get(self.endpoint(&["invitations", invitation_id]));
        self.send(request).await
    }

    pub async fn revoke_invitation(&self, invitation_id: &str) -> Result<Value, UpstreamError> {
        let request = self.http.delete(self.endpoint(&["invitations", invitation_id]));
        self.send(request).await
    }

    pub async fn accept_invitations(
        &self,
        invitation_ids: &[String],
        target: &InvitationTarget,
    ) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .post(self.endpoint(&["invitations", "accept"]))
            .json(&AcceptInvitationsBody {
                invitation_ids,
                target,
            });
        self.send(request).await
    }

    pub async fn reinvite(&self, invitation_id: &str) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .post(self.endpoint(&["invitations", invitation_id, "reinvite"]));
        self.send(request).await
    }

    /// `<base>/api/v1/<segments...>`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v1"]).extend(segments);
        }
        url
    }

    async fn send_list(&self, request: RequestBuilder) -> Result<Vec<Value>, UpstreamError> {
        let value = self.send(request).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        let list: InvitationList = serde_json::from_value(value)?;
        Ok(list.invitations)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, UpstreamError> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
