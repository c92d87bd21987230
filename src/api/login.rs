// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoints.
//!
//! Both routes accept any method and let the strategy decide, so a wrong
//! method is reported with the same JSON error body as every other auth
//! failure.

use axum::{extract::State, http::HeaderMap, Json};

use crate::auth::{AuthError, AuthOutcome, AuthRequest, AuthenticationStrategy};
use crate::models::{LoginResponse, SessionResponse};
use crate::state::AppState;

/// Drive one login exchange and turn the outcome into a response.
///
/// A completed login carries the token in the returned `Authorization`
/// header; a redirect leaves the headers empty.
async fn run_login<S>(
    strategy: &S,
    request: AuthRequest,
) -> Result<(HeaderMap, Json<LoginResponse>), AuthError>
where
    S: AuthenticationStrategy,
{
    let mut headers = HeaderMap::new();
    let body = match strategy.authenticate(&request, &mut headers).await? {
        AuthOutcome::Redirect(redirect) => LoginResponse::Redirect(redirect),
        AuthOutcome::Authenticated(user) => LoginResponse::Session(SessionResponse::from(&user)),
    };
    Ok((headers, Json(body)))
}

/// Log in with Steam.
///
/// Without query parameters, returns `{"location": ...}` pointing at Steam's
/// login page. With Steam's callback parameters, verifies them and returns
/// the session, with the token in the `Authorization` response header.
#[utoipa::path(
    get,
    path = "/v1/login/steam",
    tag = "Login",
    responses(
        (status = 200, description = "Steam login URL (`location`), or the new session with the token in the Authorization header", body = LoginResponse),
        (status = 403, description = "Steam rejected the assertion or the Steam id is not allowed"),
        (status = 405, description = "Only GET is accepted"),
        (status = 502, description = "Steam could not be reached"),
    )
)]
pub async fn steam_login(
    State(state): State<AppState>,
    request: AuthRequest,
) -> Result<(HeaderMap, Json<LoginResponse>), AuthError> {
    run_login(state.steam.as_ref(), request).await
}

/// Log in as the root user.
///
/// Only available when `ROOT_LOGIN_ENABLED=true`.
#[utoipa::path(
    post,
    path = "/v1/login/root",
    tag = "Login",
    responses(
        (status = 200, description = "Root session (token in Authorization header)", body = SessionResponse),
        (status = 403, description = "Root login is disabled"),
        (status = 405, description = "Only POST is accepted"),
    )
)]
pub async fn root_login(
    State(state): State<AppState>,
    request: AuthRequest,
) -> Result<(HeaderMap, Json<LoginResponse>), AuthError> {
    run_login(state.root.as_ref(), request).await
}
