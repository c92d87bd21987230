// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token encoding and verification.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret. The payload
//! carries only the fields that are set: `isRootUser`, `isSteamUser` and
//! `steamId` are omitted rather than written as `false`/`null`, so absence
//! always means "not granted".
//!
//! The claim names are part of the wire format. Changing them invalidates
//! every token held by clients.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::claims::{AuthenticatedUser, SteamId};
use super::error::AuthError;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// JWT payload.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenClaims {
    jwt_id: String,
    #[serde(default, skip_serializing_if = "is_false")]
    is_root_user: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    is_steam_user: bool,
    /// Decimal string; JSON numbers lose precision above 2^53 in most clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    steam_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TokenClaims {
    fn from_user(
        user: &AuthenticatedUser,
        issued_at: i64,
        ttl: Option<Duration>,
    ) -> Result<Self, AuthError> {
        let exp = ttl
            .map(|ttl| {
                i64::try_from(ttl.as_secs())
                    .ok()
                    .and_then(|secs| issued_at.checked_add(secs))
                    .ok_or_else(|| {
                        AuthError::Internal(format!("token lifetime {ttl:?} is out of range"))
                    })
            })
            .transpose()?;

        Ok(Self {
            jwt_id: user.claim_id().to_string(),
            is_root_user: user.is_root_user(),
            is_steam_user: user.is_steam_user(),
            steam_id: user.steam_id().map(|id| id.to_string()),
            endpoint: user.endpoint().map(str::to_string),
            iat: issued_at,
            exp,
        })
    }

    fn into_user(self) -> Result<AuthenticatedUser, AuthError> {
        if self.jwt_id.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let steam_id = if self.is_steam_user {
            let raw = self.steam_id.ok_or(AuthError::InvalidToken)?;
            Some(
                raw.parse::<SteamId>()
                    .map_err(|_| AuthError::InvalidToken)?,
            )
        } else {
            None
        };

        Ok(AuthenticatedUser::from_parts(
            self.jwt_id,
            self.is_root_user,
            steam_id,
            self.endpoint,
        ))
    }
}

/// Signs claims into tokens and verifies tokens back into claims.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenCodec {
    /// Create a codec for `secret`. With a `ttl`, tokens carry an `exp`
    /// claim and tokens without one are rejected.
    pub fn new(secret: &[u8], ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        if ttl.is_some() {
            validation.required_spec_claims.insert("exp".to_string());
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Token lifetime, if tokens expire.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Serialize `user` into a signed token.
    pub fn encode(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
        let claims = TokenClaims::from_user(user, Utc::now().timestamp(), self.ttl)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify `token` and rebuild the claim it carries.
    pub fn decode(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                tracing::debug!(error = %e, "Rejected session token");
                AuthError::InvalidToken
            },
        )?;

        data.claims.into_user()
    }
}
