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

use anyhow::{Context, Result};
use std::path::Path;

use crate::autoreload_templates::TemplateEngine;

pub fn init_templates(
    templates_dir: &str,
    plugin_dir: &str,
    development_mode: bool,
) -> Result<TemplateEngine> {
    // Create templates directory if it doesn't exist
    std::fs::create_dir_all(templates_dir).context("Failed to create templates directory")?;

    // Create default templates if they don't exist
    create_default_templates(templates_dir)?;

    // Materialize each plugin's bundled templates
    create_plugin_templates(plugin_dir)?;

    // Create template engine
    let template_engine = TemplateEngine::new(templates_dir, plugin_dir, development_mode)?;

    Ok(template_engine)
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to create {}", path.display()))
}

fn create_plugin_templates(plugin_dir: &str) -> Result<()> {
    for plugin in crate::plugins::all() {
        let templates_dir = plugin.templates_dir(plugin_dir);
        for (name, content) in plugin.default_templates {
            write_if_missing(&templates_dir.join(name), content)?;
        }
    }
    Ok(())
}

fn create_default_templates(templates_dir: &str) -> Result<()> {
    let base_dir = Path::new(templates_dir);

    // Create base template
    let base_template = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}{{ site_title | default(value="Corkboard") }}{% endblock %}</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        nav {
            border-bottom: 1px solid #eee;
            padding-bottom: 10px;
            margin-bottom: 20px;
        }
        nav a {
            margin-right: 15px;
            text-decoration: none;
            color: #0066cc;
        }
        nav a:hover {
            text-decoration: underline;
        }
        .auth-info {
            float: right;
            font-size: 0.9em;
        }
        footer {
            margin-top: 40px;
            padding-top: 20px;
            border-top: 1px solid #eee;
            font-size: 0.9em;
            color: #666;
        }
    </style>
    {% block head %}{% endblock %}
</head>
<body>
    <nav>
        <a href="/">Home</a>
        {% if current_member %}
            <span class="auth-info">
                {{ current_member_name }} |
                <a href="/bbs/logout">Logout</a>
            </span>
        {% else %}
            <span class="auth-info">
                <a href="/bbs/login">Login</a>
            </span>
        {% endif %}
    </nav>

    <main>
        {% block content %}{% endblock %}
    </main>

    <footer>
        <p>Powered by Corkboard</p>
    </footer>
</body>
</html>"#;

    write_if_missing(&base_dir.join("base.html"), base_template)?;

    // Create index template
    let index_template = r#"{% extends "base.html" %}

{% block content %}
<h1>{{ site_title }}</h1>

{% if contents %}
<ul>
    {% for content in contents %}
    <li><a href="/content/{{ content.co_id }}">{{ content.co_subject }}</a></li>
    {% endfor %}
</ul>
{% else %}
<p>No content pages yet.</p>
{% endif %}
{% endblock %}"#;

    write_if_missing(&base_dir.join("index.html"), index_template)?;

    // Create login template
    let login_template = r#"{% extends "base.html" %}

{% block title %}Login - {{ super() }}{% endblock %}

{% block content %}
<h1>Login</h1>

{% if error %}
<p style="color: red;">{{ error }}</p>
{% endif %}

<form method="post" action="/bbs/login">
    <div style="margin-bottom: 15px;">
        <label for="username">Username or Email:</label><br>
        <input type="text" id="username" name="username" required style="width: 300px; padding: 5px;">
    </div>

    <div style="margin-bottom: 15px;">
        <label for="password">Password:</label><br>
        <input type="password" id="password" name="password" required style="width: 300px; padding: 5px;">
    </div>

    <div>
        <button type="submit" style="padding: 5px 20px;">Login</button>
    </div>
</form>

{% if providers %}
<div style="margin-top: 30px;">
    <h2>Or sign in with</h2>
    {% for provider in providers %}
    <p><a href="/bbs/login/{{ provider }}">Continue with {{ provider | capitalize }}</a></p>
    {% endfor %}
</div>
{% endif %}
{% endblock %}"#;

    write_if_missing(&base_dir.join("login.html"), login_template)?;

    // Create error template
    let error_template = r#"{% extends "base.html" %}

{% block title %}Error - {{ super() }}{% endblock %}

{% block content %}
<h1>{{ error_title | default(value="Error") }}</h1>
<p>{{ error_message | default(value="An error occurred") }}</p>
<p><a href="/">Return to homepage</a></p>
{% endblock %}"#;

    write_if_missing(&base_dir.join("error.html"), error_template)?;

    // Create the default content skin for each device class
    let pc_content_template = r#"{% extends "base.html" %}

{% block title %}{{ title }} - {{ super() }}{% endblock %}

{% block content %}
<article>
    {% if co_himg_url %}
    <img src="{{ co_himg_url }}" alt="" style="max-width: 100%;">
    {% endif %}

    <h1>{{ title }}</h1>

    <div class="content-body">
        {{ content | safe }}
    </div>

    {% if co_timg_url %}
    <img src="{{ co_timg_url }}" alt="" style="max-width: 100%;">
    {% endif %}
</article>
{% endblock %}"#;

    write_if_missing(
        &base_dir.join("pc/content/basic/content.html"),
        pc_content_template,
    )?;

    let mobile_content_template = r#"{% extends "base.html" %}

{% block title %}{{ title }} - {{ super() }}{% endblock %}

{% block content %}
<article style="font-size: 1.1em;">
    {% if co_himg_url %}
    <img src="{{ co_himg_url }}" alt="" style="width: 100%;">
    {% endif %}

    <h1>{{ title }}</h1>

    <div class="content-body">
        {{ content | safe }}
    </div>

    {% if co_timg_url %}
    <img src="{{ co_timg_url }}" alt="" style="width: 100%;">
    {% endif %}
</article>
{% endblock %}"#;

    write_if_missing(
        &base_dir.join("mobile/content/basic/content.html"),
        mobile_content_template,
    )?;

    // Create the admin shell. The sidebar walks the static menu tree plus
    // whatever the plugins contribute, highlighting the session's current
    // menu keys.
    let admin_base_template = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Admin - {{ site_title }}{% endblock %}</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            display: flex;
            min-height: 100vh;
            color: #333;
        }
        .sidebar {
            width: 220px;
            background: #2c3e50;
            color: #ecf0f1;
            padding: 20px;
        }
        .sidebar a {
            color: #ecf0f1;
            text-decoration: none;
        }
        .sidebar ul {
            list-style: none;
            padding-left: 0;
        }
        .sidebar ul ul {
            padding-left: 15px;
            font-size: 0.9em;
        }
        .sidebar li.active > a {
            font-weight: bold;
            color: #f39c12;
        }
        .admin-main {
            flex: 1;
            padding: 20px 30px;
        }
        .admin-footer {
            font-size: 0.85em;
            color: #666;
            margin-top: 40px;
            border-top: 1px solid #eee;
            padding-top: 10px;
        }
        table {
            border-collapse: collapse;
            width: 100%;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
    </style>
</head>
<body>
    <div class="sidebar">
        <p><a href="/">{{ site_title }}</a></p>
        <ul>
            {% for menu in admin_menus() %}
            <li class="{% if menu_key == menu.key %}active{% endif %}">
                <a href="{{ menu.url }}">{{ menu.title }}</a>
                {% if menu.submenus %}
                <ul>
                    {% for sub in menu.submenus %}
                    <li><a href="{{ sub.url }}">{{ sub.title }}</a></li>
                    {% endfor %}
                </ul>
                {% endif %}
            </li>
            {% endfor %}
            {% for menu in admin_plugin_menus() %}
            <li class="{% if menu_key == menu.key %}active{% endif %}">
                <a href="{{ menu.url }}">{{ menu.title }}</a>
                {% if menu.submenus %}
                <ul>
                    {% for sub in menu.submenus %}
                    <li class="{% if plugin_submenu_key == sub.key %}active{% endif %}">
                        <a href="{{ sub.url }}">{{ sub.title }}</a>
                    </li>
                    {% endfor %}
                </ul>
                {% endif %}
            </li>
            {% endfor %}
        </ul>
    </div>

    <div class="admin-main">
        {% block admin_content %}{% endblock %}

        <div class="admin-footer">
            {{ current_member_name }} ({{ client_ip }})
        </div>
    </div>
</body>
</html>"#;

    write_if_missing(&base_dir.join("admin/base.html"), admin_base_template)?;

    // Create admin dashboard template
    let admin_dashboard_template = r#"{% extends "admin/base.html" %}

{% block admin_content %}
<h1>Dashboard</h1>
<p>Welcome to the {{ site_title }} admin area.</p>
<p><a href="/admin/contents">Manage content pages</a></p>
{% endblock %}"#;

    write_if_missing(
        &base_dir.join("admin/dashboard.html"),
        admin_dashboard_template,
    )?;

    // Create admin content list template
    let admin_contents_template = r#"{% extends "admin/base.html" %}

{% block admin_content %}
<h1>Content Pages</h1>
<p><a href="/admin/contents/new">New content</a></p>

<table>
    <tr>
        <th>Id</th>
        <th>Subject</th>
        <th>Skin</th>
        <th>Updated</th>
        <th></th>
    </tr>
    {% for content in contents %}
    <tr>
        <td><a href="/content/{{ content.co_id }}">{{ content.co_id }}</a></td>
        <td><a href="/admin/contents/{{ content.co_id }}">{{ content.co_subject }}</a></td>
        <td>{{ content.co_skin }}</td>
        <td>{{ content.updated_at }}</td>
        <td>
            <form method="post" action="/admin/contents/{{ content.co_id }}/delete">
                <input type="hidden" name="csrf_token" value="{{ csrf_token }}">
                <button type="submit">Delete</button>
            </form>
        </td>
    </tr>
    {% endfor %}
</table>
{% endblock %}"#;

    write_if_missing(
        &base_dir.join("admin/contents_list.html"),
        admin_contents_template,
    )?;

    // Create admin content form template
    let admin_content_form_template = r#"{% extends "admin/base.html" %}

{% block admin_content %}
<h1>{% if editing %}Edit Content{% else %}New Content{% endif %}</h1>

{% if error %}
<p style="color: red;">{{ error }}</p>
{% endif %}

<form method="post" action="/admin/contents">
    <input type="hidden" name="csrf_token" value="{{ csrf_token }}">

    <div style="margin-bottom: 15px;">
        <label for="co_id">Id (URL slug):</label><br>
        <input type="text" id="co_id" name="co_id" value="{{ content.co_id }}"
               {% if editing %}readonly{% endif %} style="width: 300px; padding: 5px;">
    </div>

    <div style="margin-bottom: 15px;">
        <label for="co_subject">Subject:</label><br>
        <input type="text" id="co_subject" name="co_subject" value="{{ content.co_subject }}"
               style="width: 300px; padding: 5px;">
    </div>

    <div style="margin-bottom: 15px;">
        <label for="co_content">Content (HTML):</label><br>
        <textarea id="co_content" name="co_content" rows="15"
                  style="width: 100%; padding: 5px;">{{ content.co_content }}</textarea>
    </div>

    <div style="margin-bottom: 15px;">
        <label for="co_skin">Skin:</label><br>
        {{ skin_select(select_name="co_skin", device=device, selected=content.co_skin) | safe }}
    </div>

    <div>
        <button type="submit" style="padding: 5px 20px;">Save</button>
    </div>
</form>
{% endblock %}"#;

    write_if_missing(
        &base_dir.join("admin/content_form.html"),
        admin_content_form_template,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_default_templates() -> Result<()> {
        let templates = tempfile::tempdir()?;
        let plugins = tempfile::tempdir()?;

        init_templates(
            &templates.path().to_string_lossy(),
            &plugins.path().to_string_lossy(),
            false,
        )?;

        for name in [
            "base.html",
            "index.html",
            "login.html",
            "error.html",
            "pc/content/basic/content.html",
            "mobile/content/basic/content.html",
            "admin/base.html",
            "admin/dashboard.html",
            "admin/contents_list.html",
            "admin/content_form.html",
        ] {
            assert!(
                templates.path().join(name).exists(),
                "missing default template {}",
                name
            );
        }

        Ok(())
    }

    #[test]
    fn test_init_materializes_plugin_templates() -> Result<()> {
        let templates = tempfile::tempdir()?;
        let plugins = tempfile::tempdir()?;

        init_templates(
            &templates.path().to_string_lossy(),
            &plugins.path().to_string_lossy(),
            false,
        )?;

        assert!(plugins
            .path()
            .join("demo_plugin/templates/admin/admin_demo.html")
            .exists());

        Ok(())
    }

    #[test]
    fn test_existing_templates_are_not_overwritten() -> Result<()> {
        let templates = tempfile::tempdir()?;
        let plugins = tempfile::tempdir()?;

        let custom = templates.path().join("base.html");
        std::fs::write(&custom, "customized")?;

        init_templates(
            &templates.path().to_string_lossy(),
            &plugins.path().to_string_lossy(),
            false,
        )?;

        assert_eq!(std::fs::read_to_string(&custom)?, "customized");
        Ok(())
    }

    #[test]
    fn test_default_content_skin_renders_for_both_devices() -> Result<()> {
        let templates = tempfile::tempdir()?;
        let plugins = tempfile::tempdir()?;

        let engine = init_templates(
            &templates.path().to_string_lossy(),
            &plugins.path().to_string_lossy(),
            false,
        )?;

        let mut context = tera::Context::new();
        context.insert("site_title", "Corkboard");
        context.insert("title", "About Us");
        context.insert("content", "<p>Hello</p>");
        context.insert("co_himg_url", "");
        context.insert("co_timg_url", "");

        for device in ["pc", "mobile"] {
            let html = engine.render(
                &format!("{}/content/basic/content.html", device),
                &context,
            )?;
            assert!(html.contains("About Us"));
            assert!(html.contains("<p>Hello</p>"));
        }

        Ok(())
    }

    #[test]
    fn test_admin_shell_highlights_plugin_menu() -> Result<()> {
        let templates = tempfile::tempdir()?;
        let plugins = tempfile::tempdir()?;

        let engine = init_templates(
            &templates.path().to_string_lossy(),
            &plugins.path().to_string_lossy(),
            false,
        )?;

        let mut context = tera::Context::new();
        context.insert("site_title", "Corkboard");
        context.insert("current_member_name", "admin");
        context.insert("client_ip", "127.0.0.1");
        context.insert("csrf_token", "tok");
        context.insert("menu_key", "demo_plugin");
        context.insert("plugin_submenu_key", "demo_plugin2");

        let html = engine.render("admin/dashboard.html", &context)?;
        assert!(html.contains("Demo Plugin"));
        assert!(html.contains("Demo Menu 2"));
        assert!(html.contains("class=\"active\""));

        Ok(())
    }
}
