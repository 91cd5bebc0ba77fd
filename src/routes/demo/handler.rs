use axum::extract::{Extension, Json, State};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    auth::{Session, UserSummary},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: UserSummary,
    pub timestamp: String,
}

/// Lists the demo accounts so the frontend can offer them.
#[axum::debug_handler]
pub async fn users(State(state): State<AppState>) -> Json<UsersResponse> {
    Json(UsersResponse {
        users: state.directory.summaries(),
    })
}

#[axum::debug_handler]
pub async fn protected(Extension(session): Extension<Session>) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "This is a protected route!".to_string(),
        user: UserSummary::from(&session),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
