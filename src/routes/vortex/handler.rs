use axum::{
    body::Bytes,
    extract::{Extension, Json, Path, Query, State},
};
use serde_json::Value;

use crate::{AppState, auth::Session, error::AppError, vortex::JwtPayload};

use super::model::{
    AcceptInvitationsRequest, InvitationsResponse, JwtRequest, JwtResponse, TargetQuery,
};

/// Mints a Vortex widget JWT, either for an explicit identity in the body or
/// for the logged-in user.
#[axum::debug_handler]
pub async fn generate_jwt(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Bytes,
) -> Result<Json<JwtResponse>, AppError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        JwtRequest::default()
    } else {
        serde_json::from_slice::<JwtRequest>(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JWT request: {e}")))?
    };

    let payload = request
        .into_payload()
        .unwrap_or_else(|| JwtPayload::from(&session));

    tracing::debug!("Generating Vortex JWT for {}", payload.user_id);
    let jwt = state.vortex.generate_jwt(&payload)?;
    Ok(Json(JwtResponse { jwt }))
}

/// Serves both `/invitations/by-target` and the legacy `/invitations`.
#[axum::debug_handler]
pub async fn invitations_by_target(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<InvitationsResponse>, AppError> {
    let invitations = state
        .vortex
        .invitations_by_target(&query.target_type, &query.target_value)
        .await?;
    Ok(Json(InvitationsResponse { invitations }))
}

#[axum::debug_handler]
pub async fn invitations_by_group(
    State(state): State<AppState>,
    Path((group_type, group_id)): Path<(String, String)>,
) -> Result<Json<InvitationsResponse>, AppError> {
    let invitations = state
        .vortex
        .invitations_by_group(&group_type, &group_id)
        .await?;
    Ok(Json(InvitationsResponse { invitations }))
}

#[axum::debug_handler]
pub async fn accept_invitations(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<AcceptInvitationsRequest>,
) -> Result<Json<Value>, AppError> {
    if req.invitation_ids.is_empty() {
        return Err(AppError::BadRequest("invitationIds must not be empty".to_string()));
    }

    tracing::info!(
        "{} accepting {} invitation(s)",
        session.subject,
        req.invitation_ids.len()
    );
    let result = state
        .vortex
        .accept_invitations(&req.invitation_ids, &req.target)
        .await?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn get_invitation(
    State(state): State<AppState>,
    Path(invitation_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.vortex.invitation(&invitation_id).await?))
}

#[axum::debug_handler]
pub async fn revoke_invitation(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(invitation_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    tracing::info!("{} revoking invitation {}", session.subject, invitation_id);
    let result = state.vortex.revoke_invitation(&invitation_id).await?;
    if result.is_null() {
        return Ok(Json(serde_json::json!({ "success": true })));
    }
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn reinvite(
    State(state): State<AppState>,
    Path(invitation_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.vortex.reinvite(&invitation_id).await?))
}
