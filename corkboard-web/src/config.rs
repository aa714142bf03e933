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

use anyhow::{Context, Result};
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub site_title: String,
    pub base_url: String,
    pub templates_dir: String,
    pub data_dir: String,
    pub static_dir: String,
    pub plugin_dir: String,
    pub development_mode: bool,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub facebook_client_id: Option<String>,
    pub facebook_client_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Find project root by looking for workspace Cargo.toml
        let project_root = Self::find_project_root()?;

        let default_templates_dir = project_root.join("templates").to_string_lossy().to_string();
        let default_data_dir = project_root.join("data").to_string_lossy().to_string();
        let default_static_dir = project_root.join("static").to_string_lossy().to_string();
        let default_plugin_dir = project_root.join("plugin").to_string_lossy().to_string();

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("Invalid PORT")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:corkboard.db".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            site_title: env::var("SITE_TITLE").unwrap_or_else(|_| "Corkboard".to_string()),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            templates_dir: env::var("TEMPLATES_DIR").unwrap_or(default_templates_dir),
            data_dir: env::var("DATA_DIR").unwrap_or(default_data_dir),
            static_dir: env::var("STATIC_DIR").unwrap_or(default_static_dir),
            plugin_dir: env::var("PLUGIN_DIR").unwrap_or(default_plugin_dir),
            development_mode: env::var("DEVELOPMENT_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
            facebook_client_id: env::var("FACEBOOK_CLIENT_ID").ok(),
            facebook_client_secret: env::var("FACEBOOK_CLIENT_SECRET").ok(),
        })
    }

    /// Find the project root by looking for the workspace Cargo.toml
    fn find_project_root() -> Result<PathBuf> {
        let mut current_dir = env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if cargo_toml.exists() {
                // Check if this is the workspace root
                let content = std::fs::read_to_string(&cargo_toml)?;
                if content.contains("[workspace]") {
                    return Ok(current_dir);
                }
            }

            // Move up one directory
            if !current_dir.pop() {
                // We've reached the root directory
                break;
            }
        }

        // If we can't find the workspace root, use current directory
        env::current_dir().context("Failed to determine project root")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Callback URL registered with the provider for this deployment.
    pub fn social_redirect_uri(&self, provider: &str) -> String {
        format!(
            "{}/bbs/login/{}/callback",
            self.base_url.trim_end_matches('/'),
            provider
        )
    }
}
