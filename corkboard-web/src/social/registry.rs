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

use std::sync::Arc;

use crate::config::Config;
use crate::social::providers::{FacebookProvider, GoogleProvider};
use crate::social::{ClientCredentials, SocialProvider};

/// A provider together with the deployment's credentials for it.
pub struct RegisteredProvider {
    pub provider: Arc<dyn SocialProvider>,
    pub credentials: ClientCredentials,
}

/// The set of providers this deployment can sign members in with.
///
/// Built once at startup and shared through application state; providers
/// without configured credentials are simply not registered, so they 404
/// at the HTTP layer like any other unknown name.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<RegisteredProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn SocialProvider>, credentials: ClientCredentials) {
        tracing::info!(provider = provider.name(), "Registered social provider");
        self.providers.push(RegisteredProvider {
            provider,
            credentials,
        });
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredProvider> {
        self.providers.iter().find(|r| r.provider.name() == name)
    }

    /// Provider names in registration order, for the login page buttons.
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|r| r.provider.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Register every provider the configuration carries credentials for.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();

        if let (Some(client_id), Some(client_secret)) = (
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
        ) {
            registry.register(
                Arc::new(GoogleProvider),
                ClientCredentials {
                    client_id,
                    client_secret,
                },
            );
        }

        if let (Some(client_id), Some(client_secret)) = (
            config.facebook_client_id.clone(),
            config.facebook_client_secret.clone(),
        ) {
            registry.register(
                Arc::new(FacebookProvider),
                ClientCredentials {
                    client_id,
                    client_secret,
                },
            );
        }

        registry
    }
}
