// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Binds identities to responses and reads them back from requests.

use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

use super::{AuthError, AuthRequest, AuthenticatedUser, TokenCodec};

/// Issues and extracts bearer session tokens.
#[derive(Clone)]
pub struct Authenticator {
    codec: TokenCodec,
}

impl Authenticator {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Encode `user` and attach it to the outbound response as
    /// `Authorization: Bearer <token>`.
    pub fn issue(&self, headers: &mut HeaderMap, user: &AuthenticatedUser) -> Result<(), AuthError> {
        let token = self.codec.encode(user)?;
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| AuthError::Internal(format!("token is not a valid header value: {e}")))?;
        headers.insert(AUTHORIZATION, value);

        tracing::info!(
            claim_id = %user.claim_id(),
            steam_id = ?user.steam_id(),
            root = user.is_root_user(),
            endpoint = user.endpoint().unwrap_or("-"),
            "Issued session token"
        );
        Ok(())
    }

    /// Read the bearer token from `request`, if any.
    ///
    /// Returns `Ok(None)` when no credential is present; strategies decide
    /// whether that is fatal. A credential that is present but unusable is
    /// `InvalidToken`.
    pub fn extract(&self, request: &AuthRequest) -> Result<Option<AuthenticatedUser>, AuthError> {
        let Some(header) = request.authorization() else {
            return Ok(None);
        };

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidToken)?;

        self.codec.decode(token).map(Some)
    }
}
