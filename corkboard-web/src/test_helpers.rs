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

#[cfg(test)]
use crate::{
    autoreload_templates::TemplateEngine, social::registry::ProviderRegistry, AppState,
};
#[cfg(test)]
use corkboard_core::models::{Content, Member, Session};
#[cfg(test)]
use corkboard_db::repositories::{ContentRepository, MemberRepository, SessionRepository};
#[cfg(test)]
use sqlx::SqlitePool;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
pub async fn create_test_app_state() -> Result<AppState, anyhow::Error> {
    // Create in-memory SQLite database
    let pool = SqlitePool::connect(":memory:").await?;

    // Create minimal schema for tests
    sqlx::query(
        r#"
        CREATE TABLE contents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            co_id TEXT NOT NULL UNIQUE,
            co_subject TEXT NOT NULL,
            co_content TEXT NOT NULL DEFAULT '',
            co_skin TEXT NOT NULL DEFAULT 'basic',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            nickname TEXT,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            is_admin BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE sessions (
            id TEXT PRIMARY KEY,
            member_id INTEGER NOT NULL,
            csrf_token TEXT,
            menu_key TEXT,
            plugin_submenu_key TEXT,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE
        );

        CREATE TABLE member_social_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL,
            provider TEXT NOT NULL,
            identifier TEXT NOT NULL,
            display_name TEXT NOT NULL DEFAULT '',
            profile_url TEXT NOT NULL DEFAULT '',
            photo_url TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE,
            UNIQUE (provider, identifier)
        );
        "#,
    )
    .execute(&pool)
    .await?;

    // Create templates
    let mut tera = tera::Tera::default();
    tera.add_raw_template(
        "index.html",
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>{{ site_title }}</title></head>
        <body>
            <h1>{{ site_title }}</h1>
            <ul>
            {% for content in contents %}
                <li><a href="/content/{{ content.co_id }}">{{ content.co_subject }}</a></li>
            {% endfor %}
            </ul>
        </body>
        </html>
    "#,
    )?;

    tera.add_raw_template(
        "login.html",
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>Login</title></head>
        <body>
            {% if error %}<p class="error">{{ error }}</p>{% endif %}
            <form method="post" action="/bbs/login">
                <input type="text" name="username">
                <input type="password" name="password">
                <button type="submit">Login</button>
            </form>
            {% for provider in providers %}
                <a href="/bbs/login/{{ provider }}">Continue with {{ provider }}</a>
            {% endfor %}
        </body>
        </html>
    "#,
    )?;

    tera.add_raw_template(
        "error.html",
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>Error</title></head>
        <body>
            <h1>{{ error_title | default(value="Error") }}</h1>
            <p>{{ error_message | default(value="An error occurred") }}</p>
        </body>
        </html>
    "#,
    )?;

    tera.add_raw_template(
        "pc/content/basic/content.html",
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>{{ title }}</title></head>
        <body>
            {% if co_himg_url %}<img src="{{ co_himg_url | safe }}">{% endif %}
            <h1>{{ title }}</h1>
            {{ content | safe }}
            {% if co_timg_url %}<img src="{{ co_timg_url }}">{% endif %}
        </body>
        </html>
    "#,
    )?;

    tera.add_raw_template(
        "mobile/content/basic/content.html",
        r#"
        <!DOCTYPE html>
        <html class="mobile-skin">
        <head><title>{{ title }}</title></head>
        <body>
            <h1>{{ title }}</h1>
            {{ content | safe }}
        </body>
        </html>
    "#,
    )?;

    // Admin templates for tests
    tera.add_raw_template(
        "admin/dashboard.html",
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>Admin</title></head>
        <body>
            <h1>Dashboard</h1>
            <p>{{ current_member_name }} ({{ client_ip }})</p>
        </body>
        </html>
    "#,
    )?;

    tera.add_raw_template(
        "admin/contents_list.html",
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>Contents</title></head>
        <body>
            <table>
            {% for content in contents %}
                <tr><td>{{ content.co_id }}</td><td>{{ content.co_subject }}</td></tr>
            {% endfor %}
            </table>
            <input type="hidden" name="csrf_token" value="{{ csrf_token }}">
        </body>
        </html>
    "#,
    )?;

    tera.add_raw_template(
        "admin/content_form.html",
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>Content Form</title></head>
        <body>
            {% if error %}<p class="error">{{ error }}</p>{% endif %}
            <form method="post" action="/admin/contents">
                <input type="hidden" name="csrf_token" value="{{ csrf_token }}">
                <input type="text" name="co_id" value="{{ content.co_id }}">
                <input type="text" name="co_subject" value="{{ content.co_subject }}">
                <textarea name="co_content">{{ content.co_content }}</textarea>
                <button type="submit">Save</button>
            </form>
        </body>
        </html>
    "#,
    )?;

    tera.add_raw_template(
        "admin/admin_demo.html",
        r#"
        <!DOCTYPE html>
        <html>
        <head><title>{{ title }}</title></head>
        <body>
            <h1>{{ title }}</h1>
            <p>{{ content }}</p>
        </body>
        </html>
    "#,
    )?;

    // Create a test config
    let config = crate::config::Config {
        database_url: "sqlite::memory:".to_string(),
        host: "localhost".to_string(),
        port: 3000,
        site_title: "Corkboard".to_string(),
        base_url: "http://localhost:3000".to_string(),
        templates_dir: "templates".to_string(),
        data_dir: "/tmp/corkboard-test-data".to_string(),
        static_dir: "static".to_string(),
        plugin_dir: "plugin".to_string(),
        development_mode: false,
        google_client_id: Some("test-client".to_string()),
        google_client_secret: Some("test-secret".to_string()),
        facebook_client_id: None,
        facebook_client_secret: None,
    };

    let providers = Arc::new(ProviderRegistry::from_config(&config));

    Ok(AppState {
        db: pool,
        templates: TemplateEngine::Static(Arc::new(tera)),
        config,
        providers,
        http: reqwest::Client::new(),
    })
}

#[cfg(test)]
pub async fn create_test_member(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    is_admin: bool,
) -> Result<Member, anyhow::Error> {
    let member_repo = MemberRepository::new(pool.clone());
    let mut member = Member::new(username.to_string(), email.to_string(), "password123")?;
    member.is_admin = is_admin;

    let member_id = member_repo.create(&member).await?;
    member.id = Some(member_id);

    Ok(member)
}

#[cfg(test)]
pub async fn create_test_session(
    pool: &SqlitePool,
    member_id: i64,
) -> Result<Session, anyhow::Error> {
    let session_repo = SessionRepository::new(pool.clone());
    let session = Session::new(member_id);

    session_repo.create(&session).await?;
    let session = session_repo.find_by_id(&session.id).await?.unwrap();

    Ok(session)
}

#[cfg(test)]
pub async fn create_test_content(
    pool: &SqlitePool,
    co_id: &str,
    subject: &str,
) -> Result<Content, anyhow::Error> {
    let content_repo = ContentRepository::new(pool.clone());
    let mut content = Content::new(
        co_id.to_string(),
        subject.to_string(),
        "<p>Hello</p>".to_string(),
        "basic".to_string(),
    );

    let content_id = content_repo.create(&content).await?;
    content.id = Some(content_id);

    Ok(content)
}
