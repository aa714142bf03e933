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

//! The enumerated helper functions templates may call. Everything here is
//! pure over its arguments plus the template directory; per-request values
//! like the CSRF token or client IP travel in the render context instead.

use std::collections::HashMap;
use std::path::Path;
use tera::{to_value, Function as TeraFunction, Result as TeraResult, Tera, Value};

/// Built-in editors offered in admin forms
const EDITORS: [&str; 2] = ["textarea", "ckeditor4"];

const MIN_MEMBER_LEVEL: i64 = 1;
const MAX_MEMBER_LEVEL: i64 = 10;

pub fn register_template_helpers(tera: &mut Tera, templates_dir: &str) {
    tera.register_function(
        "skin_select",
        SkinSelectFunction {
            templates_dir: templates_dir.to_string(),
        },
    );
    tera.register_function("editor_select", EditorSelectFunction);
    tera.register_function("selected", SelectedFunction);
    tera.register_function("member_level_select", MemberLevelSelectFunction);
    tera.register_function("option_array_checked", OptionArrayCheckedFunction);
    tera.register_function("admin_menus", AdminMenusFunction);
    tera.register_function("admin_plugin_menus", AdminPluginMenusFunction);
}

fn arg_string(args: &HashMap<String, Value>, name: &str) -> String {
    match args.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn required_string(args: &HashMap<String, Value>, name: &str) -> TeraResult<String> {
    match args.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) | None => Err(tera::Error::msg(format!(
            "{} parameter is required",
            name
        ))),
    }
}

fn arg_i64(args: &HashMap<String, Value>, name: &str, default: i64) -> i64 {
    args.get(name).and_then(|v| v.as_i64()).unwrap_or(default)
}

/// `skin_select(select_name, device, selected)` renders a `<select>` of
/// the content skin directories found under
/// `{templates_dir}/{device}/content/`.
pub struct SkinSelectFunction {
    pub templates_dir: String,
}

impl TeraFunction for SkinSelectFunction {
    fn call(&self, args: &HashMap<String, Value>) -> TeraResult<Value> {
        let select_name = required_string(args, "select_name")?;
        let device = arg_string(args, "device");
        let device = if device.is_empty() {
            "pc"
        } else {
            device.as_str()
        };
        let selected = arg_string(args, "selected");

        let skin_root = Path::new(&self.templates_dir).join(device).join("content");
        let mut skins = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&skin_root) {
            for entry in entries.flatten() {
                if entry.path().is_dir() {
                    if let Some(name) = entry.file_name().to_str() {
                        skins.push(name.to_string());
                    }
                }
            }
        }
        skins.sort();

        let mut html = format!(r#"<select id="{0}" name="{0}">"#, select_name);
        for skin in &skins {
            let marker = if *skin == selected { " selected" } else { "" };
            html.push_str(&format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                skin, marker
            ));
        }
        html.push_str("</select>");

        Ok(to_value(html)?)
    }
}

/// `editor_select(select_name, selected)` over the built-in editor list.
pub struct EditorSelectFunction;

impl TeraFunction for EditorSelectFunction {
    fn call(&self, args: &HashMap<String, Value>) -> TeraResult<Value> {
        let select_name = required_string(args, "select_name")?;
        let selected = arg_string(args, "selected");

        let mut html = format!(r#"<select id="{0}" name="{0}">"#, select_name);
        for editor in EDITORS {
            let marker = if editor == selected { " selected" } else { "" };
            html.push_str(&format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                editor, marker
            ));
        }
        html.push_str("</select>");

        Ok(to_value(html)?)
    }
}

/// `selected(value, current)` emits the option attribute when the two
/// match. Numbers compare by their string form.
pub struct SelectedFunction;

impl TeraFunction for SelectedFunction {
    fn call(&self, args: &HashMap<String, Value>) -> TeraResult<Value> {
        let value = arg_string(args, "value");
        let current = arg_string(args, "current");

        let marker = if !value.is_empty() && value == current {
            " selected"
        } else {
            ""
        };
        Ok(to_value(marker)?)
    }
}

/// `member_level_select(select_name, start, end, selected)` over the
/// numeric member levels, clamped to the valid range.
pub struct MemberLevelSelectFunction;

impl TeraFunction for MemberLevelSelectFunction {
    fn call(&self, args: &HashMap<String, Value>) -> TeraResult<Value> {
        let select_name = required_string(args, "select_name")?;
        let start = arg_i64(args, "start", MIN_MEMBER_LEVEL).max(MIN_MEMBER_LEVEL);
        let end = arg_i64(args, "end", MAX_MEMBER_LEVEL).min(MAX_MEMBER_LEVEL);
        let selected = arg_i64(args, "selected", 0);

        let mut html = format!(r#"<select id="{0}" name="{0}">"#, select_name);
        for level in start..=end {
            let marker = if level == selected { " selected" } else { "" };
            html.push_str(&format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                level, marker
            ));
        }
        html.push_str("</select>");

        Ok(to_value(html)?)
    }
}

/// `option_array_checked(option, value)` emits the checkbox attribute when
/// `value` appears in the comma-separated `option` string.
pub struct OptionArrayCheckedFunction;

impl TeraFunction for OptionArrayCheckedFunction {
    fn call(&self, args: &HashMap<String, Value>) -> TeraResult<Value> {
        let option = arg_string(args, "option");
        let value = arg_string(args, "value");

        let marker = if !value.is_empty() && option.split(',').any(|p| p.trim() == value) {
            " checked"
        } else {
            ""
        };
        Ok(to_value(marker)?)
    }
}

/// `admin_menus()` returns the static admin menu tree for the shell
/// sidebar.
pub struct AdminMenusFunction;

impl TeraFunction for AdminMenusFunction {
    fn call(&self, _args: &HashMap<String, Value>) -> TeraResult<Value> {
        Ok(to_value(crate::admin_menu::admin_menus())?)
    }
}

/// `admin_plugin_menus()` returns the entries contributed by plugins.
pub struct AdminPluginMenusFunction;

impl TeraFunction for AdminPluginMenusFunction {
    fn call(&self, _args: &HashMap<String, Value>) -> TeraResult<Value> {
        Ok(to_value(crate::admin_menu::plugin_admin_menus())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_selected_matches() {
        let result = SelectedFunction
            .call(&args(&[("value", json!("a")), ("current", json!("a"))]))
            .unwrap();
        assert_eq!(result, json!(" selected"));
    }

    #[test]
    fn test_selected_differs() {
        let result = SelectedFunction
            .call(&args(&[("value", json!("a")), ("current", json!("b"))]))
            .unwrap();
        assert_eq!(result, json!(""));
    }

    #[test]
    fn test_selected_compares_numbers_as_strings() {
        let result = SelectedFunction
            .call(&args(&[("value", json!(3)), ("current", json!("3"))]))
            .unwrap();
        assert_eq!(result, json!(" selected"));
    }

    #[test]
    fn test_option_array_checked() {
        let checked = OptionArrayCheckedFunction
            .call(&args(&[("option", json!("1,2,3")), ("value", json!("2"))]))
            .unwrap();
        assert_eq!(checked, json!(" checked"));

        let unchecked = OptionArrayCheckedFunction
            .call(&args(&[("option", json!("1,2,3")), ("value", json!("4"))]))
            .unwrap();
        assert_eq!(unchecked, json!(""));
    }

    #[test]
    fn test_option_array_checked_trims_entries() {
        let checked = OptionArrayCheckedFunction
            .call(&args(&[("option", json!("a, b, c")), ("value", json!("b"))]))
            .unwrap();
        assert_eq!(checked, json!(" checked"));
    }

    #[test]
    fn test_editor_select_marks_selection() {
        let result = EditorSelectFunction
            .call(&args(&[
                ("select_name", json!("co_editor")),
                ("selected", json!("ckeditor4")),
            ]))
            .unwrap();

        let html = result.as_str().unwrap();
        assert!(html.contains(r#"<select id="co_editor" name="co_editor">"#));
        assert!(html.contains(r#"<option value="ckeditor4" selected>"#));
        assert!(html.contains(r#"<option value="textarea">"#));
    }

    #[test]
    fn test_editor_select_requires_name() {
        assert!(EditorSelectFunction.call(&args(&[])).is_err());
    }

    #[test]
    fn test_member_level_select_clamps_range() {
        let result = MemberLevelSelectFunction
            .call(&args(&[
                ("select_name", json!("mb_level")),
                ("start", json!(-5)),
                ("end", json!(99)),
                ("selected", json!(10)),
            ]))
            .unwrap();

        let html = result.as_str().unwrap();
        assert!(html.contains(r#"<option value="1">"#));
        assert!(html.contains(r#"<option value="10" selected>"#));
        assert!(!html.contains(r#"<option value="0">"#));
        assert!(!html.contains(r#"<option value="11">"#));
    }

    #[test]
    fn test_skin_select_lists_directories() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let content_dir = dir.path().join("pc").join("content");
        std::fs::create_dir_all(content_dir.join("basic"))?;
        std::fs::create_dir_all(content_dir.join("gallery"))?;
        // Stray files are not skins
        std::fs::write(content_dir.join("readme.txt"), "x")?;

        let function = SkinSelectFunction {
            templates_dir: dir.path().to_string_lossy().to_string(),
        };
        let result = function
            .call(&args(&[
                ("select_name", json!("co_skin")),
                ("device", json!("pc")),
                ("selected", json!("basic")),
            ]))
            .unwrap();

        let html = result.as_str().unwrap();
        assert!(html.contains(r#"<option value="basic" selected>"#));
        assert!(html.contains(r#"<option value="gallery">"#));
        assert!(!html.contains("readme"));

        Ok(())
    }

    #[test]
    fn test_skin_select_missing_directory_is_empty() {
        let function = SkinSelectFunction {
            templates_dir: "/nonexistent".to_string(),
        };
        let result = function
            .call(&args(&[("select_name", json!("co_skin"))]))
            .unwrap();

        assert_eq!(
            result.as_str().unwrap(),
            r#"<select id="co_skin" name="co_skin"></select>"#
        );
    }

    #[test]
    fn test_admin_menus_function_returns_array() {
        let result = AdminMenusFunction.call(&HashMap::new()).unwrap();
        assert!(result.as_array().is_some());
    }

    #[test]
    fn test_admin_plugin_menus_function_includes_demo() {
        let result = AdminPluginMenusFunction.call(&HashMap::new()).unwrap();
        let menus = result.as_array().unwrap();
        assert!(menus.iter().any(|m| m["key"] == "demo_plugin"));
    }
}
