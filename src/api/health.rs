// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Liveness and readiness probes.
//!
//! Readiness doubles as a summary of the auth policy the process started
//! with, so operators can confirm root login and the allow-list at a glance.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Readiness report.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// "ok" when every check passes, "degraded" otherwise
    pub status: String,
    pub checks: HealthChecks,
}

/// Individual checks and the policy in effect.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub service: String,
    /// "ok" for an HTTPS provider, "insecure" for plain HTTP
    pub provider: String,
    /// "enabled" or "disabled"
    pub root_login: String,
    /// Number of allow-listed Steam ids; 0 means every Steam user is accepted
    pub allowed_steam_ids: usize,
    /// Session token lifetime in seconds, absent when tokens never expire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_ttl_secs: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn ready_report(state: &AppState) -> (StatusCode, ReadyResponse) {
    // Plain HTTP is only acceptable against a local test provider.
    let provider_secure = state.steam.provider_url().scheme() == "https";

    let checks = HealthChecks {
        service: "ok".into(),
        provider: if provider_secure { "ok" } else { "insecure" }.into(),
        root_login: if state.root.is_enabled() { "enabled" } else { "disabled" }.into(),
        allowed_steam_ids: state.config.allowed_steam_ids.len(),
        token_ttl_secs: state.authenticator.codec().ttl().map(|ttl| ttl.as_secs()),
    };

    let (code, status) = if provider_secure {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        ReadyResponse {
            status: status.into(),
            checks,
        },
    )
}

/// Overall health; 503 when a check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All checks pass", body = ReadyResponse),
        (status = 503, description = "At least one check failed", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let (code, report) = ready_report(&state);
    (code, Json(report))
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is running", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

/// Readiness probe; same report as `/health`.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to authenticate", body = ReadyResponse),
        (status = 503, description = "Not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}
