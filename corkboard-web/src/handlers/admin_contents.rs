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
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use corkboard_core::models::Content;
use corkboard_db::repositories::{ContentRepository, SessionRepository};
use serde::Deserialize;

use crate::{
    auth::RequireAdmin, csrf::verify_csrf_token, device::Device, error::AppError,
    template_context::admin_context, AppState,
};

/// List all content rows
pub async fn contents_list_handler(
    State(state): State<AppState>,
    device: Device,
    headers: HeaderMap,
    admin: RequireAdmin,
) -> Result<Html<String>, AppError> {
    SessionRepository::new(state.db.clone())
        .update_menu_keys(&admin.session.id, Some("contents"), None)
        .await?;

    let contents = ContentRepository::new(state.db.clone()).list_all().await?;

    let mut context =
        admin_context(&state, &admin.member, &admin.session.id, device, &headers).await?;
    context.insert("contents", &contents);

    let html = state.templates.render("admin/contents_list.html", &context)?;
    Ok(Html(html))
}

async fn render_form(
    state: &AppState,
    admin: &RequireAdmin,
    device: Device,
    headers: &HeaderMap,
    content: &Content,
    editing: bool,
    error: Option<&str>,
) -> Result<Html<String>, AppError> {
    let mut context =
        admin_context(state, &admin.member, &admin.session.id, device, headers).await?;
    context.insert("content", content);
    context.insert("editing", &editing);
    if let Some(err) = error {
        context.insert("error", err);
    }

    let html = state.templates.render("admin/content_form.html", &context)?;
    Ok(Html(html))
}

/// Blank creation form
pub async fn content_new_handler(
    State(state): State<AppState>,
    device: Device,
    headers: HeaderMap,
    admin: RequireAdmin,
) -> Result<Html<String>, AppError> {
    SessionRepository::new(state.db.clone())
        .update_menu_keys(&admin.session.id, Some("contents"), None)
        .await?;

    let blank = Content::new(String::new(), String::new(), String::new(), String::new());
    render_form(&state, &admin, device, &headers, &blank, false, None).await
}

/// Edit form for an existing row
pub async fn content_edit_handler(
    State(state): State<AppState>,
    device: Device,
    headers: HeaderMap,
    admin: RequireAdmin,
    Path(co_id): Path<String>,
) -> Result<Html<String>, AppError> {
    SessionRepository::new(state.db.clone())
        .update_menu_keys(&admin.session.id, Some("contents"), None)
        .await?;

    let content = ContentRepository::new(state.db.clone())
        .find_by_co_id(&co_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("{}: content id does not exist", co_id)))?;

    render_form(&state, &admin, device, &headers, &content, true, None).await
}

#[derive(Debug, Deserialize)]
pub struct ContentForm {
    pub csrf_token: String,
    pub co_id: String,
    pub co_subject: String,
    pub co_content: String,
    #[serde(default)]
    pub co_skin: String,
}

/// Upsert a content row from the admin form. The `co_id` slug decides
/// whether this creates or updates.
pub async fn content_save_handler(
    State(state): State<AppState>,
    device: Device,
    headers: HeaderMap,
    admin: RequireAdmin,
    Form(form): Form<ContentForm>,
) -> Result<Response, AppError> {
    if !verify_csrf_token(&state.db, &admin.session.id, &form.csrf_token).await? {
        return Err(AppError::forbidden("CSRF token mismatch"));
    }

    let repo = ContentRepository::new(state.db.clone());
    let existing = repo.find_by_co_id(&form.co_id).await?;
    let editing = existing.is_some();

    let content = match existing {
        Some(mut c) => {
            c.co_subject = form.co_subject.clone();
            c.co_content = form.co_content.clone();
            if !form.co_skin.is_empty() {
                c.co_skin = form.co_skin.clone();
            }
            c.updated_at = Utc::now();
            c
        }
        None => Content::new(
            form.co_id.clone(),
            form.co_subject.clone(),
            form.co_content.clone(),
            form.co_skin.clone(),
        ),
    };

    if let Err(e) = content.is_valid() {
        let page =
            render_form(&state, &admin, device, &headers, &content, editing, Some(&e)).await?;
        return Ok(page.into_response());
    }

    if editing {
        repo.update(&content).await?;
    } else {
        repo.create(&content).await?;
    }

    Ok(Redirect::to("/admin/contents").into_response())
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub csrf_token: String,
}

/// Delete a content row
pub async fn content_delete_handler(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(co_id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, AppError> {
    if !verify_csrf_token(&state.db, &admin.session.id, &form.csrf_token).await? {
        return Err(AppError::forbidden("CSRF token mismatch"));
    }

    let repo = ContentRepository::new(state.db.clone());
    let content = repo
        .find_by_co_id(&co_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("{}: content id does not exist", co_id)))?;

    repo.delete(content.id.unwrap()).await?;

    Ok(Redirect::to("/admin/contents"))
}
