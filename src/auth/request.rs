// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transport-neutral view of an inbound request.
//!
//! Strategies only need the method, the query parameters, the bearer
//! credential and the caller's address. `AuthRequest` captures exactly that
//! so the login flow can be driven without an HTTP server.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, Method},
};

use super::claims::portless_endpoint;

/// Method, query, credential and origin of an inbound request.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    method: Method,
    query: Vec<(String, String)>,
    authorization: Option<String>,
    remote_addr: Option<SocketAddr>,
}

impl AuthRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: Vec::new(),
            authorization: None,
            remote_addr: None,
        }
    }

    /// Add query parameters. A repeated key keeps its first position and
    /// takes the last value.
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            let (key, value) = (key.into(), value.into());
            match self.query.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => self.query.push((key, value)),
            }
        }
        self
    }

    /// Set the raw `Authorization` header value.
    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Capture the parts of an axum request the auth layer needs.
    pub fn from_parts(parts: &Parts) -> Self {
        let query = parts
            .uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let mut request = Self::new(parts.method.clone()).with_query(query);

        if let Some(value) = parts.headers.get(AUTHORIZATION) {
            request = request.with_authorization(String::from_utf8_lossy(value.as_bytes()));
        }

        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            request = request.with_remote_addr(*addr);
        }

        request
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Query parameters in request order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Caller origin without port.
    pub fn endpoint(&self) -> Option<String> {
        self.remote_addr.as_ref().map(portless_endpoint)
    }
}

impl<S> FromRequestParts<S> for AuthRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AuthRequest::from_parts(parts))
    }
}
