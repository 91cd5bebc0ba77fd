use std::{collections::HashMap, net::SocketAddr};

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Path, Query},
    http::{
        HeaderMap, Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde_json::{Value, json};
use tower::ServiceExt;
use vortex_axum_demo::{AppState, config::Config, router::create_router};

const API_KEY: &str = "test-vortex-key";

fn api_key(headers: &HeaderMap) -> Value {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|v| json!(v))
        .unwrap_or(Value::Null)
}

/// Stand-in for the Vortex API, echoing what it received.
async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route(
            "/api/v1/invitations",
            get(
                |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| async move {
                    Json(json!({
                        "invitations": [{
                            "id": "inv-1",
                            "targetType": query.get("targetType"),
                            "targetValue": query.get("targetValue"),
                            "apiKey": api_key(&headers),
                        }]
                    }))
                },
            ),
        )
        .route(
            "/api/v1/invitations/by-group/{group_type}/{group_id}",
            get(|Path((group_type, group_id)): Path<(String, String)>| async move {
                Json(json!({
                    "invitations": [{ "id": format!("{group_type}-{group_id}") }]
                }))
            }),
        )
        .route(
            "/api/v1/invitations/accept",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "accepted": body }))
            }),
        )
        .route(
            "/api/v1/invitations/{id}/reinvite",
            post(|Path(id): Path<String>| async move {
                Json(json!({ "id": id, "status": "resent" }))
            }),
        )
        .route(
            "/api/v1/invitations/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "missing" {
                    (StatusCode::NOT_FOUND, "secret upstream detail").into_response()
                } else {
                    Json(json!({ "id": id, "status": "pending" })).into_response()
                }
            })
            .delete(|Path(_id): Path<String>| async move { StatusCode::NO_CONTENT }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn state_for(base_url: String) -> AppState {
    AppState::new(Config {
        vortex_api_key: API_KEY.to_string(),
        vortex_api_base_url: base_url,
        bcrypt_cost: 4,
        ..Config::default()
    })
    .unwrap()
}

fn admin_cookie(state: &AppState) -> String {
    let admin = state.directory.find_by_email("admin@example.com").unwrap();
    format!("session={}", state.sessions.issue(admin).unwrap())
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, cookie: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(COOKIE, cookie);
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn invitations_by_target_forwards_query_and_api_key() {
    let addr = spawn_upstream().await;
    let state = state_for(format!("http://{addr}"));
    let cookie = admin_cookie(&state);
    let app = create_router(state);

    for uri in [
        "/api/vortex/invitations/by-target?targetType=email&targetValue=a%40b.com",
        "/api/vortex/invitations?targetType=email&targetValue=a%40b.com",
    ] {
        let response = app
            .clone()
            .oneshot(request("GET", uri, &cookie, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let invitation = &body["invitations"][0];
        assert_eq!(invitation["targetType"], "email");
        assert_eq!(invitation["targetValue"], "a@b.com");
        assert_eq!(invitation["apiKey"], API_KEY);
    }
}

#[tokio::test]
async fn missing_target_query_is_rejected() {
    let addr = spawn_upstream().await;
    let state = state_for(format!("http://{addr}"));
    let cookie = admin_cookie(&state);
    let app = create_router(state);

    let response = app
        .oneshot(request("GET", "/api/vortex/invitations/by-target", &cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invitations_by_group_passes_path_through() {
    let addr = spawn_upstream().await;
    let state = state_for(format!("http://{addr}"));
    let cookie = admin_cookie(&state);
    let app = create_router(state);

    let response = app
        .oneshot(request(
            "GET",
            "/api/vortex/invitations/by-group/team/team-1",
            &cookie,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "invitations": [{ "id": "team-team-1" }] })
    );
}

#[tokio::test]
async fn single_invitation_endpoints() {
    let addr = spawn_upstream().await;
    let state = state_for(format!("http://{addr}"));
    let cookie = admin_cookie(&state);
    let app = create_router(state);

    let fetched = app
        .clone()
        .oneshot(request("GET", "/api/vortex/invitations/inv-9", &cookie, None))
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(
        body_json(fetched).await,
        json!({ "id": "inv-9", "status": "pending" })
    );

    let reinvited = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/vortex/invitations/inv-9/reinvite",
            &cookie,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(reinvited).await["status"], "resent");

    let revoked = app
        .oneshot(request("DELETE", "/api/vortex/invitations/inv-9", &cookie, None))
        .await
        .unwrap();
    assert_eq!(revoked.status(), StatusCode::OK);
    assert_eq!(body_json(revoked).await, json!({ "success": true }));
}

#[tokio::test]
async fn accept_forwards_ids_and_target() {
    let addr = spawn_upstream().await;
    let state = state_for(format!("http://{addr}"));
    let cookie = admin_cookie(&state);
    let app = create_router(state);

    let response = app
        .oneshot(request(
            "POST",
            "/api/vortex/invitations/accept",
            &cookie,
            Some(json!({
                "invitationIds": ["inv-1", "inv-2"],
                "target": { "type": "email", "value": "admin@example.com" },
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["accepted"],
        json!({
            "invitationIds": ["inv-1", "inv-2"],
            "target": { "type": "email", "value": "admin@example.com" },
        })
    );
}

#[tokio::test]
async fn upstream_errors_become_a_generic_bad_gateway() {
    let addr = spawn_upstream().await;
    let state = state_for(format!("http://{addr}"));
    let cookie = admin_cookie(&state);
    let app = create_router(state);

    let response = app
        .oneshot(request("GET", "/api/vortex/invitations/missing", &cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body, json!({ "success": false, "error": "Upstream service error" }));
}

#[tokio::test]
async fn unreachable_upstream_is_a_bad_gateway() {
    // Nothing listens on the discard port.
    let state = state_for("http://127.0.0.1:9".to_string());
    let cookie = admin_cookie(&state);
    let app = create_router(state);

    let response = app
        .oneshot(request("GET", "/api/vortex/invitations/inv-1", &cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn vortex_routes_require_a_session() {
    let state = state_for("http://127.0.0.1:9".to_string());
    let app = create_router(state);

    for (method, uri) in [
        ("POST", "/api/vortex/jwt"),
        ("GET", "/api/vortex/invitations?targetType=email&targetValue=x"),
        ("GET", "/api/vortex/invitations/inv-1"),
        ("DELETE", "/api/vortex/invitations/inv-1"),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

fn decode_widget_jwt(token: &str) -> Value {
    decode::<Value>(
        token,
        &DecodingKey::from_secret(API_KEY.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .unwrap()
    .claims
}

#[tokio::test]
async fn jwt_defaults_to_the_session_user() {
    let state = state_for("http://127.0.0.1:9".to_string());
    let cookie = admin_cookie(&state);
    let app = create_router(state);

    let response = app
        .oneshot(request("POST", "/api/vortex/jwt", &cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let claims = decode_widget_jwt(body["jwt"].as_str().unwrap());
    assert_eq!(claims["userId"], "user-1");
    assert_eq!(claims["identifiers"], json!({ "email": "admin@example.com" }));
    assert_eq!(claims["groups"], json!(["team:team-1", "organization:org-1"]));
    assert_eq!(claims["role"], "admin");
}

#[tokio::test]
async fn jwt_uses_an_explicit_identity_when_given() {
    let state = state_for("http://127.0.0.1:9".to_string());
    let cookie = admin_cookie(&state);
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/vortex/jwt",
            &cookie,
            Some(json!({
                "user_id": "external-7",
                "identifiers": { "email": "ext@example.com" },
                "role": "member",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let claims = decode_widget_jwt(body_json(response).await["jwt"].as_str().unwrap());
    assert_eq!(claims["userId"], "external-7");
    assert_eq!(claims["identifiers"]["email"], "ext@example.com");
    assert_eq!(claims["role"], "member");
    assert!(claims.get("groups").is_none());

    // Without identifiers the body is ignored in favour of the session.
    let partial = app
        .oneshot(request(
            "POST",
            "/api/vortex/jwt",
            &cookie,
            Some(json!({ "user_id": "external-7" })),
        ))
        .await
        .unwrap();
    let claims = decode_widget_jwt(body_json(partial).await["jwt"].as_str().unwrap());
    assert_eq!(claims["userId"], "user-1");
}
