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

//! Reference plugin showing the two route flavors a plugin can mount: a
//! plain JSON endpoint and a page rendered from the plugin's own template
//! directory.

use axum::{
    extract::State,
    http::HeaderMap,
    response::Html,
    routing::get,
    Json, Router,
};
use corkboard_db::repositories::SessionRepository;
use serde_json::json;

use super::Plugin;
use crate::{
    admin_menu::AdminMenu, auth::RequireAdmin, device::Device, error::AppError,
    template_context::admin_context, AppState,
};

pub const MODULE_NAME: &str = "demo_plugin";

const DEMO_ADMIN_TEMPLATE: &str = r#"{% extends "admin/base.html" %}

{% block title %}{{ title }}{% endblock %}

{% block admin_content %}
<h1>{{ title }}</h1>
<p>{{ content }}</p>
{% endblock %}"#;

pub fn plugin() -> Plugin {
    Plugin {
        module_name: MODULE_NAME,
        router,
        admin_menus,
        default_templates: &[("admin/admin_demo.html", DEMO_ADMIN_TEMPLATE)],
    }
}

fn router() -> Router<AppState> {
    Router::new()
        .route("/test_demo_admin", get(demo_admin))
        .route("/test_demo_admin_template", get(demo_admin_template))
}

fn admin_menus() -> Vec<AdminMenu> {
    vec![AdminMenu::new(MODULE_NAME, "Demo Plugin", "/admin/test_demo_admin")
        .submenu("demo_plugin1", "Demo Menu 1", "/admin/test_demo_admin")
        .submenu(
            "demo_plugin2",
            "Demo Menu 2",
            "/admin/test_demo_admin_template",
        )]
}

/// `GET /admin/test_demo_admin`
async fn demo_admin(
    State(state): State<AppState>,
    admin: RequireAdmin,
) -> Result<Json<serde_json::Value>, AppError> {
    // Record the sidebar position before responding
    let session_repo = SessionRepository::new(state.db.clone());
    session_repo
        .update_menu_keys(&admin.session.id, Some(MODULE_NAME), Some("demo_plugin1"))
        .await?;

    Ok(Json(json!({
        "message": "Hello Admin Demo Plugin!",
        "plugin": MODULE_NAME,
        "module": module_path!(),
    })))
}

/// `GET /admin/test_demo_admin_template`
async fn demo_admin_template(
    State(state): State<AppState>,
    device: Device,
    headers: HeaderMap,
    admin: RequireAdmin,
) -> Result<Html<String>, AppError> {
    let session_repo = SessionRepository::new(state.db.clone());
    session_repo
        .update_menu_keys(&admin.session.id, Some(MODULE_NAME), Some("demo_plugin2"))
        .await?;

    let mut context =
        admin_context(&state, &admin.member, &admin.session.id, device, &headers).await?;
    context.insert("title", "Hello Admin demo Plugin!");
    context.insert("content", &format!("Hello {}", MODULE_NAME));

    let html = state.templates.render("admin/admin_demo.html", &context)?;
    Ok(Html(html))
}
