// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use federated_auth_server::{
    api::router,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn init_tracing(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_level(true))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "failed to install rustls crypto provider")?;

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    if config.root_login_enabled {
        tracing::warn!("Root login is enabled; anyone reaching this server can obtain a root session");
    }
    if !config.allowed_steam_ids.is_empty() {
        tracing::info!(
            allowed = config.allowed_steam_ids.len(),
            "Steam logins restricted to allow-list"
        );
    }

    let state = AppState::from_config(&config)?;
    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();

    let addr = config.bind_addr;
    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received, draining connections");
        shutdown.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    match &config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
            tracing::info!(%addr, "Federated auth server listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app)
                .await?;
        }
        None => {
            tracing::warn!(%addr, "No TLS configured, serving plain HTTP (docs at /docs)");
            axum_server::bind(addr).handle(handle).serve(app).await?;
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}
