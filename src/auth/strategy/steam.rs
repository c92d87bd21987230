// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Steam Community OpenID 2.0 login.
//!
//! ## Flow
//!
//! 1. Client calls `GET /v1/login/steam` with no query string and receives
//!    `{ "location": "https://steamcommunity.com/openid/login?..." }`.
//! 2. Client appends its own `openid.return_to` / `openid.realm` and sends the
//!    user there. Sessions are stateless, so the provider must hand control
//!    back to the client rather than redirect into this server.
//! 3. Client replays the provider's callback parameters to
//!    `GET /v1/login/steam?openid.*=...`.
//! 4. The server asks Steam to confirm the assertion (`check_authentication`),
//!    checks the allow-list and returns a bearer token in the `Authorization`
//!    response header.
//!
//! The Steam id pattern and the `is_valid:true` marker are Steam's wire
//! contract and must not be loosened or tightened.

use std::sync::{Arc, LazyLock};

use axum::http::{HeaderMap, Method};
use regex::Regex;
use url::Url;

use super::{AuthOutcome, AuthenticationStrategy, RedirectInstruction};
use crate::auth::{
    AllowList, AuthError, AuthRequest, AuthenticatedUser, Authenticator, ProviderRelay, SteamId,
};

/// Steam's OpenID 2.0 endpoint.
pub const STEAM_OPENID_URL: &str = "https://steamcommunity.com/openid/login";

const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";
const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

const MODE_PARAM: &str = "openid.mode";
const CLAIMED_ID_PARAM: &str = "openid.claimed_id";

const INVALID_CREDENTIALS: &str = "Invalid Credentials";

static STEAM_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"openid/id/([0-9]{17,25})").expect("static regex"));

static IS_VALID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"is_valid\s*:\s*true").expect("static regex"));

/// Steam OpenID login and Steam session re-verification.
#[derive(Clone)]
pub struct SteamStrategy {
    provider_url: Url,
    relay: Arc<dyn ProviderRelay>,
    authenticator: Arc<Authenticator>,
    allow_list: Arc<AllowList>,
}

impl SteamStrategy {
    pub fn new(
        provider_url: Url,
        relay: Arc<dyn ProviderRelay>,
        authenticator: Arc<Authenticator>,
        allow_list: Arc<AllowList>,
    ) -> Self {
        Self {
            provider_url,
            relay,
            authenticator,
            allow_list,
        }
    }

    pub fn provider_url(&self) -> &Url {
        &self.provider_url
    }

    /// Provider URL that starts an identifier-select login.
    ///
    /// `openid.return_to` and `openid.realm` are left for the client to add.
    pub fn login_url(&self) -> Url {
        let mut url = self.provider_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("openid.ns", OPENID_NS)
            .append_pair(MODE_PARAM, "checkid_setup")
            .append_pair("openid.identity", IDENTIFIER_SELECT)
            .append_pair(CLAIMED_ID_PARAM, IDENTIFIER_SELECT);
        url
    }

    async fn complete(
        &self,
        request: &AuthRequest,
        response: &mut HeaderMap,
    ) -> Result<AuthOutcome, AuthError> {
        let claimed_id = request.query_value(CLAIMED_ID_PARAM).unwrap_or_default();
        let Some(steam_id) = extract_steam_id(claimed_id) else {
            tracing::warn!(
                claimed_id = %claimed_id,
                "OpenID callback did not carry a Steam id"
            );
            return Err(AuthError::forbidden(INVALID_CREDENTIALS));
        };

        let params = check_authentication_params(request.query());
        let body = self
            .relay
            .post_form(&self.provider_url, &params)
            .await
            .map_err(|e| {
                tracing::warn!(steam_id, error = %e, "Steam OpenID verification request failed");
                AuthError::from(e)
            })?;

        if !IS_VALID_PATTERN.is_match(&body) {
            tracing::warn!(steam_id, "Steam rejected the provided OpenID credentials");
            return Err(AuthError::forbidden(INVALID_CREDENTIALS));
        }

        self.ensure_allowed(steam_id, "Attempted login by a Steam id not in the allow list")?;

        let user = AuthenticatedUser::steam(steam_id, request.remote_addr());
        self.authenticator.issue(response, &user)?;
        Ok(AuthOutcome::Authenticated(user))
    }

    fn ensure_allowed(&self, steam_id: SteamId, reason: &'static str) -> Result<(), AuthError> {
        if self.allow_list.permits(steam_id) {
            return Ok(());
        }
        tracing::warn!(steam_id, "{reason}");
        Err(AuthError::Forbidden(None))
    }
}

impl AuthenticationStrategy for SteamStrategy {
    async fn authenticate(
        &self,
        request: &AuthRequest,
        response: &mut HeaderMap,
    ) -> Result<AuthOutcome, AuthError> {
        // Both legs of the OpenID handshake arrive as GET.
        if request.method() != Method::GET {
            return Err(AuthError::MethodNotAllowed);
        }

        if request.query().is_empty() {
            return Ok(AuthOutcome::Redirect(RedirectInstruction {
                location: self.login_url().to_string(),
            }));
        }

        self.complete(request, response).await
    }

    fn reverify(&self, request: &AuthRequest) -> Result<AuthenticatedUser, AuthError> {
        let user = self
            .authenticator
            .extract(request)?
            .ok_or(AuthError::Unauthorized)?;
        let steam_id = user.steam_id().ok_or(AuthError::Unauthorized)?;

        // The allow-list may have changed since the token was issued.
        self.ensure_allowed(
            steam_id,
            "Session token carried a Steam id not in the allow list",
        )?;
        Ok(user)
    }
}

/// Pull the SteamID64 out of an `openid.claimed_id` value.
fn extract_steam_id(claimed_id: &str) -> Option<SteamId> {
    STEAM_ID_PATTERN
        .captures(claimed_id)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Echoed callback parameters with the mode switched to `check_authentication`.
fn check_authentication_params(query: &[(String, String)]) -> Vec<(String, String)> {
    let mut params = query.to_vec();
    match params.iter_mut().find(|(k, _)| k == MODE_PARAM) {
        Some(mode) => mode.1 = "check_authentication".to_string(),
        None => params.push((MODE_PARAM.to_string(), "check_authentication".to_string())),
    }
    params
}
