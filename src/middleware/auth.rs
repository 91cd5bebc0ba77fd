use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{AppState, auth::extract_session_token, error::AppError};

/// Guard for protected routes.
///
/// Resolves the session cookie (or bearer header) into a [`crate::auth::Session`]
/// and stores it in the request extensions for `Extension<Session>`. Any
/// failure becomes a 401 before the inner handler runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_session_token(req.headers()) else {
        tracing::debug!("No session presented for {}", req.uri().path());
        return Err(AppError::Unauthorized);
    };

    let session = state.sessions.verify(&token)?;

    if state.directory.find_by_email(&session.subject).is_err() {
        tracing::debug!("Session subject {} is not in the directory", session.subject);
        return Err(AppError::Unauthorized);
    }

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
