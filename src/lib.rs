// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Federated Auth Server - Steam OpenID login with stateless sessions
//!
//! Callers sign in through Steam's OpenID 2.0 endpoint. Once Steam confirms
//! the assertion, the server issues an HS256 JWT carrying the verified
//! identity. Protected routes re-validate that token on every request, so no
//! session state lives on the server.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - OpenID verification, token issuance and request extractors
//! - `config` - Environment-driven runtime configuration
//! - `models` - Response payloads
//! - `state` - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod state;
