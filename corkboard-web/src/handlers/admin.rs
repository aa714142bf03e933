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

use axum::{extract::State, http::HeaderMap, response::Html};
use corkboard_db::repositories::SessionRepository;

use crate::{
    auth::RequireAdmin, device::Device, error::AppError, template_context::admin_context, AppState,
};

/// Admin dashboard
pub async fn dashboard_handler(
    State(state): State<AppState>,
    device: Device,
    headers: HeaderMap,
    admin: RequireAdmin,
) -> Result<Html<String>, AppError> {
    SessionRepository::new(state.db.clone())
        .update_menu_keys(&admin.session.id, Some("dashboard"), None)
        .await?;

    let context =
        admin_context(&state, &admin.member, &admin.session.id, device, &headers).await?;

    let html = state.templates.render("admin/dashboard.html", &context)?;
    Ok(Html(html))
}
