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

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{
    autoreload_templates::TemplateEngine, config::Config, social::registry::ProviderRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub templates: TemplateEngine,
    pub config: Config,
    pub providers: Arc<ProviderRegistry>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        templates: TemplateEngine,
        config: Config,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            db,
            templates,
            config,
            providers,
            http: reqwest::Client::new(),
        }
    }
}
