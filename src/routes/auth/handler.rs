use axum::{
    extract::{Extension, Json, State, rejection::JsonRejection},
    http::header::SET_COOKIE,
    response::IntoResponse,
};

use crate::{
    AppState,
    auth::{self, Session, UserSummary, clear_session_cookie, session_cookie},
    error::AppError,
};

use super::model::{LoginRequest, LoginResponse, LogoutResponse, MeResponse};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!("Unreadable login body: {}", rejection.body_text());
        AppError::BadRequest("Email and password required".to_string())
    })?;

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("Email and password required".to_string()));
    }

    let (token, user) =
        match auth::login(&state.directory, &state.sessions, &req.email, &req.password) {
            Ok(issued) => issued,
            Err(e) => {
                tracing::info!("Rejected login for {}", req.email);
                return Err(e.into());
            }
        };

    let cookie = session_cookie(&token, state.sessions.ttl_secs(), state.config.cookie_secure)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!("User {} logged in as {}", user.email, user.role);

    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            user: UserSummary::from(user),
        }),
    ))
}

/// Sessions are stateless, so logging out only expires the cookie.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cookie = clear_session_cookie(state.config.cookie_secure)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(([(SET_COOKIE, cookie)], Json(LogoutResponse { success: true })))
}

#[axum::debug_handler]
pub async fn me(Extension(session): Extension<Session>) -> Json<MeResponse> {
    Json(MeResponse {
        user: UserSummary::from(&session),
    })
}
