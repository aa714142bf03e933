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

use serde::Serialize;

/// One top-level entry in the admin shell sidebar. The `key` is what the
/// session's `menu_key` column is compared against for highlighting.
#[derive(Debug, Clone, Serialize)]
pub struct AdminMenu {
    pub key: String,
    pub title: String,
    pub url: String,
    pub submenus: Vec<AdminSubmenu>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSubmenu {
    pub key: String,
    pub title: String,
    pub url: String,
}

impl AdminMenu {
    pub fn new(key: &str, title: &str, url: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            submenus: Vec::new(),
        }
    }

    pub fn submenu(mut self, key: &str, title: &str, url: &str) -> Self {
        self.submenus.push(AdminSubmenu {
            key: key.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        });
        self
    }
}

/// The built-in admin menu tree. Plugin entries are collected separately
/// so the sidebar can render them in their own section.
pub fn admin_menus() -> Vec<AdminMenu> {
    vec![
        AdminMenu::new("dashboard", "Dashboard", "/admin"),
        AdminMenu::new("contents", "Contents", "/admin/contents")
            .submenu("contents_list", "Content list", "/admin/contents")
            .submenu("contents_new", "New content", "/admin/contents/new"),
    ]
}

/// Admin menu entries contributed by compiled-in plugins.
pub fn plugin_admin_menus() -> Vec<AdminMenu> {
    crate::plugins::all()
        .iter()
        .flat_map(|plugin| (plugin.admin_menus)())
        .collect()
}
