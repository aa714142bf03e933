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

use axum::{extract::State, response::Html};
use corkboard_db::repositories::ContentRepository;
use tera::Context;

use crate::{
    auth::OptionalMember, device::Device, error::AppError, template_context::add_base_context,
    AppState,
};

/// Front page: the list of published content pages
pub async fn home_handler(
    State(state): State<AppState>,
    device: Device,
    OptionalMember(current): OptionalMember,
) -> Result<Html<String>, AppError> {
    let contents = ContentRepository::new(state.db.clone()).list_all().await?;

    let mut context = Context::new();
    add_base_context(
        &mut context,
        &state,
        current.as_ref().map(|c| &c.member),
        device,
    );
    context.insert("contents", &contents);

    let html = state.templates.render("index.html", &context)?;
    Ok(Html(html))
}
