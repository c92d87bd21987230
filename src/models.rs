// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Response payloads for the session endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{strategy::RedirectInstruction, AuthenticatedUser};

/// Identity carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Unique id of the issued token
    pub claim_id: String,
    /// SteamID64 as a decimal string, present for Steam sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam_id: Option<String>,
    /// Whether this is a root session
    pub is_root_user: bool,
    /// Caller address at login time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl From<&AuthenticatedUser> for SessionResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            claim_id: user.claim_id().to_string(),
            steam_id: user.steam_id().map(|id| id.to_string()),
            is_root_user: user.is_root_user(),
            endpoint: user.endpoint().map(str::to_string),
        }
    }
}

/// Body of a login call: where to continue, or the session just issued.
///
/// Untagged, so the redirect serializes as `{"location": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum LoginResponse {
    Redirect(RedirectInstruction),
    Session(SessionResponse),
}

/// Response for `GET /v1/session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionResponse>,
}
