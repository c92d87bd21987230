// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::strategy::RedirectInstruction,
    models::{LoginResponse, SessionResponse, SessionStatusResponse},
    state::AppState,
};

pub mod health;
pub mod login;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/login/steam", any(login::steam_login))
        .route("/login/root", any(login::root_login))
        .route("/users/me", get(users::get_current_user))
        .route("/root/me", get(users::get_root_user))
        .route("/session", get(users::get_session));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        login::steam_login,
        login::root_login,
        users::get_current_user,
        users::get_root_user,
        users::get_session,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RedirectInstruction,
            LoginResponse,
            SessionResponse,
            SessionStatusResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Login", description = "Steam OpenID and root login"),
        (name = "Users", description = "Current session"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use url::Url;

    use crate::auth::testing::StaticRelay;
    use crate::config::AppConfig;

    const CLAIMED_ID: &str = "https://steamcommunity.com/openid/id/76561197960287930";

    fn app_with(relay_body: &str, vars: &[(&str, &str)]) -> Router {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = AppConfig::from_lookup(|key| {
            if key == "TOKEN_SIGNING_SECRET" {
                return Some("router-test-secret-value-abcdef".to_string());
            }
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .expect("valid test config");
        router(AppState::with_relay(&config, Arc::new(StaticRelay::new(relay_body))))
    }

    fn callback_uri() -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("openid.ns", "http://specs.openid.net/auth/2.0")
            .append_pair("openid.mode", "id_res")
            .append_pair("openid.claimed_id", CLAIMED_ID)
            .append_pair("openid.identity", CLAIMED_ID)
            .append_pair("openid.sig", "c2lnbmF0dXJl")
            .finish();
        format!("/v1/login/steam?{query}")
    }

    async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token);
        }
        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn steam_login_without_query_returns_location() {
        let app = app_with("is_valid:true", &[]);
        let response = send(&app, Method::GET, "/v1/login/steam", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let location = Url::parse(body["location"].as_str().unwrap()).unwrap();
        assert_eq!(location.host_str(), Some("steamcommunity.com"));
        assert!(location
            .query_pairs()
            .any(|(k, v)| k == "openid.mode" && v == "checkid_setup"));
    }

    #[tokio::test]
    async fn steam_login_rejects_post() {
        let app = app_with("is_valid:true", &[]);
        let response = send(&app, Method::POST, "/v1/login/steam", None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await["error_code"], "method_not_allowed");
    }

    #[tokio::test]
    async fn steam_callback_issues_token_usable_on_protected_routes() {
        let app = app_with("ns:http://specs.openid.net/auth/2.0\nis_valid:true\n", &[]);
        let response = send(&app, Method::GET, &callback_uri(), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let token = response.headers()[AUTHORIZATION].to_str().unwrap().to_string();
        assert!(token.starts_with("Bearer "));
        let body = json_body(response).await;
        assert_eq!(body["steam_id"], "76561197960287930");

        let me = send(&app, Method::GET, "/v1/users/me", Some(&token)).await;
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(json_body(me).await["steam_id"], "76561197960287930");

        let session = send(&app, Method::GET, "/v1/session", Some(&token)).await;
        assert_eq!(json_body(session).await["authenticated"], true);

        let root = send(&app, Method::GET, "/v1/root/me", Some(&token)).await;
        assert_eq!(root.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejected_steam_callback_is_forbidden() {
        let app = app_with("is_valid:false", &[]);
        let response = send(&app, Method::GET, &callback_uri(), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(AUTHORIZATION).is_none());
        assert_eq!(json_body(response).await["error"], "Invalid Credentials");
    }

    #[tokio::test]
    async fn steam_callback_outside_allow_list_is_forbidden() {
        let app = app_with("is_valid:true", &[("ALLOWED_STEAM_IDS", "1")]);
        let response = send(&app, Method::GET, &callback_uri(), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["error_code"], "forbidden");
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let app = app_with("is_valid:true", &[]);

        let me = send(&app, Method::GET, "/v1/users/me", None).await;
        assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(me).await["error_code"], "unauthorized");

        let forged = send(&app, Method::GET, "/v1/users/me", Some("Bearer a.b.c")).await;
        assert_eq!(json_body(forged).await["error_code"], "invalid_token");

        let session = send(&app, Method::GET, "/v1/session", None).await;
        assert_eq!(session.status(), StatusCode::OK);
        assert_eq!(json_body(session).await["authenticated"], false);
    }

    #[tokio::test]
    async fn root_login_is_disabled_by_default() {
        let app = app_with("", &[]);
        let response = send(&app, Method::POST, "/v1/login/root", None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn enabled_root_login_grants_root_routes() {
        let app = app_with("", &[("ROOT_LOGIN_ENABLED", "true")]);
        let response = send(&app, Method::POST, "/v1/login/root", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let token = response.headers()[AUTHORIZATION].to_str().unwrap().to_string();

        let root = send(&app, Method::GET, "/v1/root/me", Some(&token)).await;
        assert_eq!(root.status(), StatusCode::OK);
        assert_eq!(json_body(root).await["is_root_user"], true);

        let steam = send(&app, Method::GET, "/v1/users/me", Some(&token)).await;
        assert_eq!(steam.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_endpoints_respond() {
        let app = app_with("", &[]);

        let live = send(&app, Method::GET, "/health/live", None).await;
        assert_eq!(live.status(), StatusCode::OK);
        assert!(live.headers().contains_key("x-request-id"));

        let ready = send(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(ready.status(), StatusCode::OK);
        assert_eq!(json_body(ready).await["checks"]["root_login"], "disabled");
    }

    #[tokio::test]
    async fn plain_http_provider_reports_degraded() {
        let app = app_with("", &[("STEAM_OPENID_URL", "http://localhost:9999/openid/login")]);
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["checks"]["provider"], "insecure");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app_with("", &[]);
        let response = send(&app, Method::GET, "/api-doc/openapi.json", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert!(doc["paths"].get("/v1/login/steam").is_some());
        assert!(doc["components"]["securitySchemes"].get("bearer").is_some());

        let steam_ok = &doc["paths"]["/v1/login/steam"]["get"]["responses"]["200"];
        assert_eq!(
            steam_ok["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/LoginResponse"
        );
        let variants = doc["components"]["schemas"]["LoginResponse"].to_string();
        assert!(variants.contains("RedirectInstruction"));
        assert!(variants.contains("SessionResponse"));
    }
}
