// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Root (bootstrap) identity.
//!
//! Issues a privileged token without any provider round trip. Disabled unless
//! `ROOT_LOGIN_ENABLED=true`; meant for local administration while no Steam
//! account has been set up.

use std::sync::Arc;

use axum::http::{HeaderMap, Method};

use super::{AuthOutcome, AuthenticationStrategy};
use crate::auth::{AuthError, AuthRequest, AuthenticatedUser, Authenticator};

#[derive(Clone)]
pub struct RootStrategy {
    authenticator: Arc<Authenticator>,
    enabled: bool,
}

impl RootStrategy {
    pub fn new(authenticator: Arc<Authenticator>, enabled: bool) -> Self {
        Self {
            authenticator,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl AuthenticationStrategy for RootStrategy {
    async fn authenticate(
        &self,
        request: &AuthRequest,
        response: &mut HeaderMap,
    ) -> Result<AuthOutcome, AuthError> {
        if request.method() != Method::POST {
            return Err(AuthError::MethodNotAllowed);
        }

        if !self.enabled {
            tracing::warn!(
                endpoint = request.endpoint().as_deref().unwrap_or("-"),
                "Root login attempted while disabled"
            );
            return Err(AuthError::Forbidden(None));
        }

        let user = AuthenticatedUser::root(request.remote_addr());
        self.authenticator.issue(response, &user)?;
        Ok(AuthOutcome::Authenticated(user))
    }

    fn reverify(&self, request: &AuthRequest) -> Result<AuthenticatedUser, AuthError> {
        self.authenticator
            .extract(request)?
            .filter(AuthenticatedUser::is_root_user)
            .ok_or(AuthError::Unauthorized)
    }
}
