// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::relay::RelayError;

/// Authentication error type.
///
/// The first four variants are the terminal domain outcomes of a login or
/// re-verification attempt. `Upstream` covers provider transport failures and
/// stays separate from them: "Steam said no" and "Steam was unreachable" map
/// to different status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong HTTP method for the handshake step
    MethodNotAllowed,
    /// Provider rejected the assertion, or the identity is not allowed
    Forbidden(Option<String>),
    /// Missing token, or a token of the wrong kind for this route
    Unauthorized,
    /// Token signature or structure did not verify
    InvalidToken,
    /// The identity provider could not be reached or answered with an error
    Upstream(String),
    /// Internal error
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Forbidden with a human-readable reason.
    pub fn forbidden(message: impl Into<String>) -> Self {
        AuthError::Forbidden(Some(message.into()))
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MethodNotAllowed => "method_not_allowed",
            AuthError::Forbidden(_) => "forbidden",
            AuthError::Unauthorized => "unauthorized",
            AuthError::InvalidToken => "invalid_token",
            AuthError::Upstream(_) => "upstream_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::Unauthorized | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MethodNotAllowed => write!(f, "Method not allowed"),
            AuthError::Forbidden(Some(msg)) => write!(f, "{msg}"),
            AuthError::Forbidden(None) => write!(f, "Forbidden"),
            AuthError::Unauthorized => write!(f, "Authentication is required"),
            AuthError::InvalidToken => write!(f, "Token is invalid"),
            AuthError::Upstream(msg) => write!(f, "Identity provider request failed: {msg}"),
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<RelayError> for AuthError {
    fn from(err: RelayError) -> Self {
        AuthError::Upstream(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let response = AuthError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "invalid_token");
    }

    #[tokio::test]
    async fn forbidden_carries_reason_in_body() {
        let response = AuthError::forbidden("Invalid Credentials").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Invalid Credentials");
        assert_eq!(body["error_code"], "forbidden");
    }

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(
            AuthError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(AuthError::Forbidden(None).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Upstream("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn relay_failures_become_upstream_errors() {
        let err: AuthError = RelayError::Status(503).into();
        assert!(matches!(err, AuthError::Upstream(_)));
    }
}
