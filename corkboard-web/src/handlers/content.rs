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

use axum::{
    extract::{Path, State},
    response::Html,
};
use corkboard_db::repositories::ContentRepository;
use tera::Context;

use crate::{
    auth::OptionalMember,
    device::Device,
    error::AppError,
    head_tail::head_tail_img,
    template_context::add_base_context,
    AppState,
};

/// Render a content page through its skin template.
///
/// The template path is `{device}/content/{co_skin}/content.html`, so the
/// same row renders through a different skin directory per device class.
/// Head and tail images are optional files probed on disk, never stored in
/// the row itself.
pub async fn content_view_handler(
    State(state): State<AppState>,
    device: Device,
    OptionalMember(current): OptionalMember,
    Path(co_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let content = ContentRepository::new(state.db.clone())
        .find_by_co_id(&co_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("{}: content id does not exist", co_id)))?;

    let head = head_tail_img(
        &state.config.data_dir,
        "content",
        &format!("{}_h", content.co_id),
    );
    let tail = head_tail_img(
        &state.config.data_dir,
        "content",
        &format!("{}_t", content.co_id),
    );

    let mut context = Context::new();
    add_base_context(
        &mut context,
        &state,
        current.as_ref().map(|c| &c.member),
        device,
    );
    context.insert("title", &content.co_subject);
    context.insert("content", &content.co_content);
    context.insert("co_himg_url", &head.url);
    context.insert("co_timg_url", &tail.url);

    let template = format!("{}/content/{}/content.html", device.as_str(), content.co_skin);
    let html = state.templates.render(&template, &context)?;

    Ok(Html(html))
}
