// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Steam OpenID federation with stateless bearer sessions.
//!
//! ## Auth Flow
//!
//! 1. Client asks `/v1/login/steam` for the provider login URL
//! 2. User signs in at Steam; the client replays Steam's callback parameters
//!    to `/v1/login/steam`
//! 3. Server:
//!    - Relays the assertion back to Steam (`check_authentication`)
//!    - Checks the Steam id against the allow-list
//!    - Returns `Authorization: Bearer <JWT>` carrying the identity
//! 4. Client sends that header on every later request; each request re-checks
//!    the signature and the current allow-list
//!
//! ## Security
//!
//! - Tokens are HS256 JWTs signed with a process-wide secret
//! - No session state is stored server-side; revocation is not supported
//! - The allow-list is enforced at use time, not only at login
//! - Root login is off unless explicitly enabled

pub mod allow_list;
pub mod authenticator;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod relay;
pub mod request;
pub mod strategy;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use allow_list::AllowList;
pub use authenticator::Authenticator;
pub use claims::{AuthenticatedUser, SteamId};
pub use error::AuthError;
pub use extractor::{MaybeUser, RootUser, SteamUser};
pub use relay::{HttpProviderRelay, ProviderRelay, RelayError};
pub use request::AuthRequest;
pub use strategy::{AuthOutcome, AuthenticationStrategy, RootStrategy, SteamStrategy};
pub use token::TokenCodec;
