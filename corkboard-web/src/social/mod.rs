// Corkboard - A classic bulletin board engine rebuilt with Rust
// Copyright (C) 2025 Corkboard Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

pub mod oauth_client;
pub mod providers;
pub mod registry;

use async_trait::async_trait;
use corkboard_core::models::social::SocialProfile;
use serde_json::Value;
use std::fmt;

use crate::error::AppError;

pub use registry::{ProviderRegistry, RegisteredProvider};

/// How the provider expects client credentials during the token exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAuthMethod {
    /// Credentials as form fields in the POST body
    ClientSecretPost,
    /// Credentials in an HTTP Basic Authorization header
    ClientSecretBasic,
}

/// Static wiring for one identity provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderEndpoints {
    pub authorize_url: &'static str,
    pub token_url: &'static str,
    pub userinfo_url: &'static str,
    pub scope: &'static str,
    pub token_auth_method: TokenAuthMethod,
}

/// OAuth client id/secret pair from configuration.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug)]
pub enum SocialError {
    /// Transport failure or non-2xx from a provider endpoint
    Http(String),
    /// Token exchange failed
    Token(String),
    /// Profile payload carried none of the claims we can identify a member by
    InvalidProfile(Value),
    /// No provider registered under that name
    UnknownProvider(String),
}

impl fmt::Display for SocialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocialError::Http(msg) => write!(f, "provider request failed: {}", msg),
            SocialError::Token(msg) => write!(f, "token exchange failed: {}", msg),
            SocialError::InvalidProfile(payload) => {
                write!(f, "profile payload is unusable: {}", payload)
            }
            SocialError::UnknownProvider(name) => write!(f, "unknown provider: {}", name),
        }
    }
}

impl std::error::Error for SocialError {}

impl From<reqwest::Error> for SocialError {
    fn from(err: reqwest::Error) -> Self {
        SocialError::Http(err.to_string())
    }
}

impl From<SocialError> for AppError {
    fn from(err: SocialError) -> Self {
        match err {
            SocialError::Http(msg) => {
                AppError::bad_gateway("Identity provider request failed").with_details(msg)
            }
            SocialError::Token(msg) => {
                AppError::bad_gateway("Token exchange with identity provider failed")
                    .with_details(msg)
            }
            SocialError::InvalidProfile(payload) => {
                AppError::bad_gateway("Identity provider returned an unusable profile")
                    .with_details(payload.to_string())
            }
            SocialError::UnknownProvider(name) => {
                AppError::not_found(format!("{}: unknown social provider", name))
            }
        }
    }
}

/// One social identity provider.
///
/// `fetch_profile_data` talks to the provider and hands back the raw
/// userinfo payload; `convert_profile_data` is the pure mapping from that
/// payload to `(email, SocialProfile)`. Keeping the two apart lets the
/// conversion rules be tested without any network.
#[async_trait]
pub trait SocialProvider: Send + Sync {
    /// Registry key, e.g. `"google"`
    fn name(&self) -> &'static str;

    /// Endpoint URLs, scope and token auth method for this provider
    fn endpoints(&self) -> ProviderEndpoints;

    /// Fetch the userinfo payload with a bearer token. Fails on non-2xx or
    /// when the payload carries none of the identifying claims; otherwise
    /// the payload is returned unchanged.
    async fn fetch_profile_data(
        &self,
        http: &reqwest::Client,
        access_token: &str,
    ) -> Result<Value, SocialError>;

    /// Map a raw payload to `(email, profile)`. Absent claims become empty
    /// strings, never errors.
    fn convert_profile_data(&self, raw: &Value) -> (String, SocialProfile);
}
