// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated identity carried inside session tokens.

use std::net::SocketAddr;

use uuid::Uuid;

/// A Steam account identifier (SteamID64).
pub type SteamId = u64;

/// Identity of a caller, either the local root user or a Steam-verified user.
///
/// Built exactly once per successful authentication and never mutated; the
/// signed token is its only persisted form. A claim may carry both the root
/// flag and a Steam id. Root is the superseding privilege when both are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    claim_id: String,
    is_root_user: bool,
    steam_id: Option<SteamId>,
    endpoint: Option<String>,
}

impl AuthenticatedUser {
    /// Root identity for the caller at `remote`.
    pub fn root(remote: Option<SocketAddr>) -> Self {
        Self::from_parts(
            Uuid::new_v4().to_string(),
            true,
            None,
            remote.map(|addr| portless_endpoint(&addr)),
        )
    }

    /// Steam-verified identity for the caller at `remote`.
    pub fn steam(steam_id: SteamId, remote: Option<SocketAddr>) -> Self {
        Self::from_parts(
            Uuid::new_v4().to_string(),
            false,
            Some(steam_id),
            remote.map(|addr| portless_endpoint(&addr)),
        )
    }

    /// Reassemble a claim from already-validated parts. Empty endpoints are
    /// normalised to `None`.
    pub(crate) fn from_parts(
        claim_id: String,
        is_root_user: bool,
        steam_id: Option<SteamId>,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            claim_id,
            is_root_user,
            steam_id,
            endpoint: endpoint.filter(|e| !e.is_empty()),
        }
    }

    /// Unique id of the token this claim was issued in.
    pub fn claim_id(&self) -> &str {
        &self.claim_id
    }

    pub fn is_root_user(&self) -> bool {
        self.is_root_user
    }

    /// Whether Steam verified this identity.
    pub fn is_steam_user(&self) -> bool {
        self.steam_id.is_some()
    }

    pub fn steam_id(&self) -> Option<SteamId> {
        self.steam_id
    }

    /// Caller origin at authentication time, for audit logs only.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

/// Render a remote address without its port.
///
/// IPv4-mapped IPv6 addresses collapse to their IPv4 form so the same caller
/// always yields the same string.
pub fn portless_endpoint(addr: &SocketAddr) -> String {
    addr.ip().to_canonical().to_string()
}
