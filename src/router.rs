use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors},
    routes,
};

/// Routes that need no session.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::site::index))
        .route("/health", get(routes::site::health))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/demo/users", get(routes::demo::users))
}

/// Routes behind the session guard. Static segments such as `by-target`
/// take precedence over `{invitation_id}`.
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/demo/protected", get(routes::demo::protected))
        .route("/api/vortex/jwt", post(routes::vortex::generate_jwt))
        .route(
            "/api/vortex/invitations/by-target",
            get(routes::vortex::invitations_by_target),
        )
        .route(
            "/api/vortex/invitations/by-group/{group_type}/{group_id}",
            get(routes::vortex::invitations_by_group),
        )
        .route(
            "/api/vortex/invitations",
            get(routes::vortex::invitations_by_target),
        )
        .route(
            "/api/vortex/invitations/accept",
            post(routes::vortex::accept_invitations),
        )
        .route(
            "/api/vortex/invitations/{invitation_id}/reinvite",
            post(routes::vortex::reinvite),
        )
        .route(
            "/api/vortex/invitations/{invitation_id}",
            get(routes::vortex::get_invitation).delete(routes::vortex::revoke_invitation),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(log_errors)),
        );

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding permissive CORS layer for development");
        router.layer(tower_http::cors::CorsLayer::very_permissive())
    };

    router.with_state(state)
}
