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

pub mod demo_plugin;

use axum::Router;
use std::path::{Path, PathBuf};

use crate::{admin_menu::AdminMenu, AppState};

/// A compiled-in plugin.
///
/// Plugins mount routes under the admin namespace, may contribute sidebar
/// menu entries, and ship their own templates under
/// `{plugin_root}/{module_name}/templates`. A plugin that registers no
/// menu entries still serves its routes.
pub struct Plugin {
    pub module_name: &'static str,
    pub router: fn() -> Router<AppState>,
    pub admin_menus: fn() -> Vec<AdminMenu>,
    /// `(relative template name, content)` pairs materialized on startup
    /// when the files do not exist yet
    pub default_templates: &'static [(&'static str, &'static str)],
}

impl Plugin {
    pub fn templates_dir(&self, plugin_root: &str) -> PathBuf {
        Path::new(plugin_root)
            .join(self.module_name)
            .join("templates")
    }
}

/// Every plugin built into this binary, in mount order.
pub fn all() -> Vec<Plugin> {
    vec![demo_plugin::plugin()]
}
