// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! Use these in handlers to require a session:
//!
//! ```rust,ignore
//! async fn my_handler(SteamUser(user): SteamUser) -> impl IntoResponse {
//!     // user is a Steam-verified AuthenticatedUser still on the allow-list
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, AuthRequest, AuthenticatedUser, AuthenticationStrategy};
use crate::state::AppState;

/// Extractor for Steam-verified users.
///
/// Re-verifies the bearer token on every request, including the allow-list
/// check, via [`SteamStrategy::reverify`](super::SteamStrategy).
pub struct SteamUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for SteamUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let request = AuthRequest::from_parts(parts);
        state.steam.reverify(&request).map(SteamUser)
    }
}

/// Extractor that requires a root token.
pub struct RootUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for RootUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let request = AuthRequest::from_parts(parts);
        state.root.reverify(&request).map(RootUser)
    }
}

/// Optional authentication extractor.
///
/// `None` when no credential was sent. A credential that is present but does
/// not verify is still rejected with `InvalidToken`.
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let request = AuthRequest::from_parts(parts);
        state.authenticator.extract(&request).map(MaybeUser)
    }
}
