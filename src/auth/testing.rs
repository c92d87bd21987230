// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test doubles shared by the auth and API tests.

use std::io;
use std::sync::{Arc, Mutex};

use url::Url;

use super::relay::{ProviderRelay, RelayError, RelayFuture};

/// Relay that answers every request with a fixed body and records what it saw.
#[derive(Default)]
pub struct StaticRelay {
    body: String,
    requests: Mutex<Vec<(Url, Vec<(String, String)>)>>,
}

impl StaticRelay {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Url, Vec<(String, String)>)> {
        self.requests.lock().unwrap().clone()
    }
}

impl ProviderRelay for StaticRelay {
    fn post_form<'a>(&'a self, url: &'a Url, params: &'a [(String, String)]) -> RelayFuture<'a> {
        self.requests
            .lock()
            .unwrap()
            .push((url.clone(), params.to_vec()));
        let body = self.body.clone();
        Box::pin(async move { Ok(body) })
    }
}

/// Relay whose provider is always down.
pub struct FailingRelay;

impl ProviderRelay for FailingRelay {
    fn post_form<'a>(&'a self, _url: &'a Url, _params: &'a [(String, String)]) -> RelayFuture<'a> {
        Box::pin(async { Err(RelayError::Status(503)) })
    }
}

/// Captures formatted `tracing` output for the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
