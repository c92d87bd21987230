// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoints.

use axum::Json;

use crate::auth::{MaybeUser, RootUser, SteamUser};
use crate::models::{SessionResponse, SessionStatusResponse};

/// Get the current Steam user's session.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Session information", body = SessionResponse),
        (status = 401, description = "Missing, invalid or non-Steam token"),
        (status = 403, description = "Steam id is no longer on the allow-list"),
    )
)]
pub async fn get_current_user(SteamUser(user): SteamUser) -> Json<SessionResponse> {
    Json(SessionResponse::from(&user))
}

/// Get the current root session.
#[utoipa::path(
    get,
    path = "/v1/root/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Root session information", body = SessionResponse),
        (status = 401, description = "Missing, invalid or non-root token"),
    )
)]
pub async fn get_root_user(RootUser(user): RootUser) -> Json<SessionResponse> {
    Json(SessionResponse::from(&user))
}

/// Report whether the request carries a valid session token.
#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "Users",
    responses(
        (status = 200, description = "Session status", body = SessionStatusResponse),
        (status = 401, description = "A token was sent but did not verify"),
    )
)]
pub async fn get_session(MaybeUser(user): MaybeUser) -> Json<SessionStatusResponse> {
    Json(SessionStatusResponse {
        authenticated: user.is_some(),
        session: user.as_ref().map(SessionResponse::from),
    })
}
