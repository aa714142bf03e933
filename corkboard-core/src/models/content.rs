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

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// An operator-authored content page. `co_content` is trusted HTML written
/// in the admin area and is rendered without escaping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub id: Option<i64>,
    pub co_id: String,
    pub co_subject: String,
    pub co_content: String,
    pub co_skin: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Content {
    pub fn new(co_id: String, co_subject: String, co_content: String, co_skin: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            co_id,
            co_subject,
            co_content,
            co_skin: if co_skin.is_empty() {
                "basic".to_string()
            } else {
                co_skin
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the content id (URL slug)
    pub fn validate_co_id(co_id: &str) -> Result<(), String> {
        if co_id.is_empty() {
            return Err("Content id cannot be empty".to_string());
        }

        if co_id.len() > 64 {
            return Err("Content id cannot exceed 64 characters".to_string());
        }

        let slug_regex = Regex::new(r"^[a-zA-Z0-9_-]+$")
            .map_err(|e| format!("Failed to compile slug regex: {}", e))?;

        if !slug_regex.is_match(co_id) {
            return Err(
                "Content id may only contain letters, numbers, underscores, and hyphens"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Validate the subject line
    pub fn validate_subject(subject: &str) -> Result<(), String> {
        if subject.trim().is_empty() {
            return Err("Subject cannot be empty".to_string());
        }

        if subject.len() > 255 {
            return Err("Subject cannot exceed 255 characters".to_string());
        }

        Ok(())
    }

    /// Validate the skin name. The skin becomes a template path component,
    /// so it must never contain separators.
    pub fn validate_skin(skin: &str) -> Result<(), String> {
        if skin.is_empty() {
            return Err("Skin cannot be empty".to_string());
        }

        if skin.len() > 50 {
            return Err("Skin cannot exceed 50 characters".to_string());
        }

        let skin_regex = Regex::new(r"^[a-zA-Z0-9_-]+$")
            .map_err(|e| format!("Failed to compile skin regex: {}", e))?;

        if !skin_regex.is_match(skin) {
            return Err(
                "Skin may only contain letters, numbers, underscores, and hyphens".to_string(),
            );
        }

        Ok(())
    }

    /// Validate all content fields
    pub fn is_valid(&self) -> Result<(), String> {
        Self::validate_co_id(&self.co_id)?;
        Self::validate_subject(&self.co_subject)?;
        Self::validate_skin(&self.co_skin)?;
        Ok(())
    }
}
