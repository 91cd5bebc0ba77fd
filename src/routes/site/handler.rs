use std::path::Path;

use axum::{
    extract::{Json, State},
    response::Html,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

const MISSING_FRONTEND: &str =
    "<h1>Demo frontend not found</h1><p>Make sure public/index.html exists</p>";

pub const VORTEX_ROUTES: [&str; 8] = [
    "POST /api/vortex/jwt",
    "GET /api/vortex/invitations/by-target",
    "GET /api/vortex/invitations/by-group/{type}/{id}",
    "GET /api/vortex/invitations",
    "POST /api/vortex/invitations/accept",
    "GET /api/vortex/invitations/{id}",
    "POST /api/vortex/invitations/{id}/reinvite",
    "DELETE /api/vortex/invitations/{id}",
];

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub vortex_sdk: String,
    pub auth: String,
    pub routes: Vec<String>,
}

/// Serves the shared demo page, rebranded for this server.
#[axum::debug_handler]
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let path = Path::new(&state.config.public_dir).join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Html(
            content
                .replace("Vortex Express SDK Demo", "Vortex Axum SDK Demo")
                .replace("Express SDK", "Axum SDK"),
        ),
        Err(e) => {
            tracing::warn!("Could not read {}: {}", path.display(), e);
            Html(MISSING_FRONTEND.to_string())
        }
    }
}

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        vortex_sdk: format!("configured ({})", state.vortex.base_url()),
        auth: "bcrypt + HS256 session cookie".to_string(),
        routes: VORTEX_ROUTES.iter().map(|r| r.to_string()).collect(),
    })
}
