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

use anyhow::{Context as AnyhowContext, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tera::{Context, Tera};

/// Template engine that can optionally reload templates on each render.
///
/// In production mode templates are parsed once at startup. In development
/// mode every render re-reads the template tree from disk, so edits show
/// up without a restart; if the reload fails the previously cached set
/// keeps serving.
pub enum TemplateEngine {
    /// Templates loaded once at startup
    Static(Arc<Tera>),
    /// Templates reloaded on each render
    Reloadable {
        templates_dir: String,
        plugin_dir: String,
        cached: Arc<RwLock<Tera>>,
    },
}

impl TemplateEngine {
    pub fn new(templates_dir: &str, plugin_dir: &str, development_mode: bool) -> Result<Self> {
        let tera = Self::create_tera_instance(templates_dir, plugin_dir)?;

        if development_mode {
            tracing::info!("Template hot-reloading enabled (development mode)");
            Ok(Self::Reloadable {
                templates_dir: templates_dir.to_string(),
                plugin_dir: plugin_dir.to_string(),
                cached: Arc::new(RwLock::new(tera)),
            })
        } else {
            tracing::info!("Templates loaded once (production mode)");
            Ok(Self::Static(Arc::new(tera)))
        }
    }

    /// Parse the shared template tree plus every plugin's template tree
    /// into one Tera instance.
    ///
    /// Plugin files are appended after the shared set, so when a plugin
    /// ships a template with the same relative name the plugin's copy is
    /// the one that ends up registered. Loading everything in a single
    /// call also means inheritance chains resolve once the full set is
    /// present, regardless of which side `extends` points at.
    fn create_tera_instance(templates_dir: &str, plugin_dir: &str) -> Result<Tera> {
        let mut files: Vec<(PathBuf, Option<String>)> = Vec::new();
        collect_template_files(Path::new(templates_dir), &mut files)?;

        for plugin in crate::plugins::all() {
            collect_template_files(&plugin.templates_dir(plugin_dir), &mut files)?;
        }

        let mut tera = Tera::default();
        tera.add_template_files(files)
            .with_context(|| format!("Failed to load templates from {}", templates_dir))?;
        crate::template_helpers::register_template_helpers(&mut tera, templates_dir);

        Ok(tera)
    }

    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        match self {
            Self::Static(tera) => tera
                .render(template_name, context)
                .with_context(|| format!("Failed to render template '{}'", template_name)),
            Self::Reloadable {
                templates_dir,
                plugin_dir,
                cached,
            } => match Self::create_tera_instance(templates_dir, plugin_dir) {
                Ok(fresh) => {
                    let html = fresh
                        .render(template_name, context)
                        .with_context(|| format!("Failed to render template '{}'", template_name))?;
                    *cached.write().unwrap() = fresh;
                    Ok(html)
                }
                Err(e) => {
                    tracing::warn!("Template reload failed, using cached set: {:?}", e);
                    cached
                        .read()
                        .unwrap()
                        .render(template_name, context)
                        .with_context(|| format!("Failed to render template '{}'", template_name))
                }
            },
        }
    }
}

impl Clone for TemplateEngine {
    fn clone(&self) -> Self {
        match self {
            Self::Static(tera) => Self::Static(Arc::clone(tera)),
            Self::Reloadable {
                templates_dir,
                plugin_dir,
                cached,
            } => Self::Reloadable {
                templates_dir: templates_dir.clone(),
                plugin_dir: plugin_dir.clone(),
                cached: Arc::clone(cached),
            },
        }
    }
}

/// Recursively collect `.html` files under `root` as
/// `(path, relative name)` pairs. A missing root is simply empty.
fn collect_template_files(root: &Path, files: &mut Vec<(PathBuf, Option<String>)>) -> Result<()> {
    if !root.is_dir() {
        return Ok(());
    }

    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some("html") {
                let name = path.strip_prefix(root)?.to_string_lossy().to_string();
                files.push((path, Some(name)));
            }
        }
    }

    Ok(())
}
