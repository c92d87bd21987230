// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{
    AllowList, Authenticator, HttpProviderRelay, ProviderRelay, RelayError, RootStrategy,
    SteamStrategy, TokenCodec,
};
use crate::config::AppConfig;

/// Shared, read-only application state.
///
/// Everything here is built once at startup; requests only read it, so no
/// locking is involved.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub authenticator: Arc<Authenticator>,
    pub allow_list: Arc<AllowList>,
    pub steam: Arc<SteamStrategy>,
    pub root: Arc<RootStrategy>,
}

impl AppState {
    /// Build state with the real HTTP relay to the OpenID provider.
    pub fn from_config(config: &AppConfig) -> Result<Self, RelayError> {
        let relay = HttpProviderRelay::new(config.relay_timeout)?;
        Ok(Self::with_relay(config, Arc::new(relay)))
    }

    /// Build state around a caller-supplied relay.
    pub fn with_relay(config: &AppConfig, relay: Arc<dyn ProviderRelay>) -> Self {
        let authenticator = Arc::new(Authenticator::new(TokenCodec::new(
            config.token_secret.as_bytes(),
            config.token_ttl,
        )));
        let allow_list = Arc::new(config.allowed_steam_ids.clone());

        let steam = SteamStrategy::new(
            config.steam_openid_url.clone(),
            relay,
            authenticator.clone(),
            allow_list.clone(),
        );
        let root = RootStrategy::new(authenticator.clone(), config.root_login_enabled);

        Self {
            config: Arc::new(config.clone()),
            authenticator,
            allow_list,
            steam: Arc::new(steam),
            root: Arc::new(root),
        }
    }
}
