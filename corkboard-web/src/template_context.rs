use anyhow::Result;
use axum::http::HeaderMap;
use corkboard_core::models::member::Member;
use corkboard_db::repositories::SessionRepository;
use tera::Context;

use crate::{csrf::get_or_create_csrf_token, device::Device, AppState};

/// Add the context values every page render receives
pub fn add_base_context(
    context: &mut Context,
    state: &AppState,
    member: Option<&Member>,
    device: Device,
) {
    context.insert("site_title", &state.config.site_title);
    context.insert("base_url", &state.config.base_url);
    context.insert("device", device.as_str());

    if let Some(member) = member {
        context.insert("current_member", member);
        context.insert("current_member_name", member.display_name());
    }
}

/// Context for admin shell renders: base values plus the session's sidebar
/// position, the CSRF token for forms, and the operator's IP.
///
/// The menu keys are re-read from the session row here, so a handler that
/// updates them before rendering sees its own write.
pub async fn admin_context(
    state: &AppState,
    member: &Member,
    session_id: &str,
    device: Device,
    headers: &HeaderMap,
) -> Result<Context> {
    let mut context = Context::new();
    add_base_context(&mut context, state, Some(member), device);

    let session_repo = SessionRepository::new(state.db.clone());
    if let Some(session) = session_repo.find_by_id(session_id).await? {
        context.insert("menu_key", &session.menu_key);
        context.insert("plugin_submenu_key", &session.plugin_submenu_key);
    }

    let csrf_token = get_or_create_csrf_token(&state.db, session_id).await?;
    context.insert("csrf_token", &csrf_token);
    context.insert("client_ip", &client_ip(headers));

    Ok(context)
}

/// Best-effort client address from proxy headers. Empty when the request
/// came in without one.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            return first.trim().to_string();
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
