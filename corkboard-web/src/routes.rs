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
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::{
    error_middleware::error_enhancer_middleware, handlers, plugins,
    request_logging::request_logging_middleware, AppState,
};

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let data_dir = state.config.data_dir.clone();

    // Admin area: the built-in pages plus whatever routes the plugins bring
    let admin_router = Router::new()
        .route("/", get(handlers::dashboard_handler))
        .route(
            "/contents",
            get(handlers::contents_list_handler).post(handlers::content_save_handler),
        )
        .route("/contents/new", get(handlers::content_new_handler))
        .route("/contents/{co_id}", get(handlers::content_edit_handler))
        .route(
            "/contents/{co_id}/delete",
            post(handlers::content_delete_handler),
        );
    let admin_router = plugins::all()
        .into_iter()
        .fold(admin_router, |router, plugin| {
            router.merge((plugin.router)())
        });

    Router::new()
        // Health check
        .route("/health", get(health))
        // Front page
        .route("/", get(handlers::home_handler))
        // Password login
        .route(
            "/bbs/login",
            get(handlers::login_form).post(handlers::login),
        )
        .route("/bbs/logout", get(handlers::logout))
        // Social login
        .route("/bbs/login/{provider}", get(handlers::social_start))
        .route(
            "/bbs/login/{provider}/callback",
            get(handlers::social_callback),
        )
        // Content pages
        .route("/content/{co_id}", get(handlers::content_view_handler))
        // Admin area
        .nest("/admin", admin_router)
        // Uploaded data and static assets
        .nest_service("/data", ServeDir::new(data_dir))
        .nest_service("/static", ServeDir::new(static_dir))
        // Add middleware
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_enhancer_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Health check handler
async fn health() -> &'static str {
    "OK"
}
