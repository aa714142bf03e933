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
    body::{to_bytes, Body},
    extract::State,
    http::{header, Request, Response, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse},
};
use tera::Context;

use crate::{device::Device, template_context::add_base_context, AppState};

/// Middleware to dress plain error responses in the site error template
pub async fn error_enhancer_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let device = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(Device::from_user_agent)
        .unwrap_or(Device::Pc);

    let response = next.run(request).await;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return enhance_error_response(response, &state, device).await;
    }

    response
}

/// Re-render an error response through `error.html`, keeping the original
/// diagnostic message visible. The response is returned untouched when the
/// template cannot be rendered.
async fn enhance_error_response(
    response: Response<Body>,
    state: &AppState,
    device: Device,
) -> Response<Body> {
    let status = response.status();
    let (parts, body) = response.into_parts();

    // Error bodies are short diagnostic strings
    let bytes = match to_bytes(body, 64 * 1024).await {
        Ok(bytes) => bytes,
        Err(_) => {
            let reason = status.canonical_reason().unwrap_or("Error");
            return (status, reason).into_response();
        }
    };

    let message = String::from_utf8_lossy(&bytes).trim().to_string();

    let mut context = Context::new();
    add_base_context(&mut context, state, None, device);
    context.insert("error_title", error_title(status));
    if message.is_empty() {
        context.insert(
            "error_message",
            status.canonical_reason().unwrap_or("An error occurred"),
        );
    } else {
        context.insert("error_message", &message);
    }

    match state.templates.render("error.html", &context) {
        Ok(html) => {
            let mut response = Html(html).into_response();
            *response.status_mut() = status;
            response
        }
        Err(e) => {
            tracing::error!("Failed to render error template: {:?}", e);
            Response::from_parts(parts, Body::from(bytes))
        }
    }
}

fn error_title(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "Page Not Found",
        StatusCode::FORBIDDEN => "Access Denied",
        StatusCode::INTERNAL_SERVER_ERROR => "Server Error",
        _ => "Error",
    }
}
