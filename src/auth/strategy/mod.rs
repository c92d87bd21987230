// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication strategies.
//!
//! A strategy knows how to log a caller in and how to re-check an issued token
//! against current policy. Adding an identity provider means adding an
//! implementor, not touching the existing ones.

use std::future::Future;

use axum::http::HeaderMap;
use serde::Serialize;
use utoipa::ToSchema;

use super::{AuthError, AuthRequest, AuthenticatedUser};

pub mod root;
pub mod steam;

pub use root::RootStrategy;
pub use steam::SteamStrategy;

/// Where the client should send the user to continue logging in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RedirectInstruction {
    /// Fully formed provider URL
    pub location: String,
}

/// Result of a login attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The flow continues at the provider
    Redirect(RedirectInstruction),
    /// The caller is authenticated and a token was bound to the response
    Authenticated(AuthenticatedUser),
}

pub trait AuthenticationStrategy: Send + Sync {
    /// Start or finish a login. On success the session token has been written
    /// into `response`.
    fn authenticate(
        &self,
        request: &AuthRequest,
        response: &mut HeaderMap,
    ) -> impl Future<Output = Result<AuthOutcome, AuthError>> + Send;

    /// Re-validate the token carried by `request` against current policy.
    fn reverify(&self, request: &AuthRequest) -> Result<AuthenticatedUser, AuthError>;
}
