// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound calls to the OpenID provider.
//!
//! The relay posts the echoed assertion back to the provider and hands the raw
//! response body to the strategy. It never interprets the body and never
//! retries; a failed round trip surfaces as [`RelayError`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{header::ACCEPT_LANGUAGE, Client};
use url::Url;

/// Default provider round-trip timeout.
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_millis(6000);

/// Future returned by [`ProviderRelay::post_form`].
pub type RelayFuture<'a> = Pin<Box<dyn Future<Output = Result<String, RelayError>> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("provider request failed: {0}")]
    Request(String),

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("provider response could not be read: {0}")]
    Body(String),
}

/// Posts a form to the identity provider and returns the response body.
pub trait ProviderRelay: Send + Sync {
    fn post_form<'a>(&'a self, url: &'a Url, params: &'a [(String, String)]) -> RelayFuture<'a>;
}

/// [`ProviderRelay`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpProviderRelay {
    http: Client,
}

impl HttpProviderRelay {
    pub fn new(timeout: Duration) -> Result<Self, RelayError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Client(e.to_string()))?;

        Ok(Self { http })
    }
}

impl ProviderRelay for HttpProviderRelay {
    fn post_form<'a>(&'a self, url: &'a Url, params: &'a [(String, String)]) -> RelayFuture<'a> {
        Box::pin(async move {
            // `form` sets Content-Type: application/x-www-form-urlencoded
            let response = self
                .http
                .post(url.clone())
                .header(ACCEPT_LANGUAGE, "en")
                .form(params)
                .send()
                .await
                .map_err(|e| RelayError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(RelayError::Status(status.as_u16()));
            }

            response
                .text()
                .await
                .map_err(|e| RelayError::Body(e.to_string()))
        })
    }
}
