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
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use corkboard_core::models::Session;
use corkboard_db::repositories::{MemberRepository, SessionRepository};
use serde::Deserialize;
use tera::Context;

use crate::{device::Device, template_context::add_base_context, AppState};

/// Build the login page context: base chrome plus the configured social
/// providers and an optional error line.
fn create_login_context(state: &AppState, device: Device, error: Option<&str>) -> Context {
    let mut context = Context::new();
    add_base_context(&mut context, state, None, device);

    if let Some(err) = error {
        context.insert("error", err);
    }

    context.insert("providers", &state.providers.names());

    context
}

fn render_login(
    state: &AppState,
    device: Device,
    error: Option<&str>,
) -> Result<Html<String>, StatusCode> {
    let context = create_login_context(state, device, error);
    let html = state
        .templates
        .render("login.html", &context)
        .map_err(|e| {
            tracing::error!("Failed to render login.html: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    Ok(Html(html))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Display login form
pub async fn login_form(
    State(state): State<AppState>,
    device: Device,
) -> Result<Html<String>, StatusCode> {
    render_login(&state, device, None)
}

/// Handle login POST request
pub async fn login(
    State(state): State<AppState>,
    device: Device,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, StatusCode> {
    // Find member by username or email
    let member_repo = MemberRepository::new(state.db.clone());

    let member = if form.username.contains('@') {
        member_repo
            .find_by_email(&form.username)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    } else {
        member_repo
            .find_by_username(&form.username)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    };

    // Verify member exists and is active
    let member = match member {
        Some(m) if m.is_active => m,
        Some(_) => {
            return Ok((jar, render_login(&state, device, Some("Account is disabled"))?)
                .into_response());
        }
        None => {
            return Ok((
                jar,
                render_login(&state, device, Some("Invalid username or password"))?,
            )
                .into_response());
        }
    };

    // Verify password
    match member.verify_password(&form.password) {
        Ok(true) => {} // Password is correct, continue
        Ok(false) => {
            return Ok((
                jar,
                render_login(&state, device, Some("Invalid username or password"))?,
            )
                .into_response());
        }
        Err(e) => {
            tracing::error!("Password verification error: {:?}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    // Create session
    let session = Session::new(member.id.unwrap());
    let session_id = session.id.clone();

    let session_repo = SessionRepository::new(state.db.clone());
    session_repo
        .create(&session)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Set session cookie
    let cookie = Cookie::build(("session_id", session_id))
        .path("/")
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::to("/")).into_response())
}

/// Handle logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, StatusCode> {
    // Get session ID from cookie
    if let Some(session_cookie) = jar.get("session_id") {
        let session_id = session_cookie.value();

        // Delete session from database
        let session_repo = SessionRepository::new(state.db.clone());
        let _ = session_repo.delete(session_id).await; // Ignore errors
    }

    // Remove session cookie
    let jar = jar.remove("session_id");

    Ok((jar, Redirect::to("/")))
}
