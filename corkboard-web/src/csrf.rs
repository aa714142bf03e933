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

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sqlx::SqlitePool;

/// CSRF token tied to a session row
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

impl CsrfToken {
    pub fn new() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }
}

impl Default for CsrfToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Return the session's CSRF token, generating and storing one on first use.
pub async fn get_or_create_csrf_token(pool: &SqlitePool, session_id: &str) -> Result<String> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT csrf_token FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(pool)
            .await
            .context("Failed to load session for CSRF token")?;

    let existing = match row {
        Some((token,)) => token,
        None => bail!("Session not found"),
    };

    if let Some(token) = existing {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    let token = CsrfToken::new().0;
    sqlx::query("UPDATE sessions SET csrf_token = ? WHERE id = ?")
        .bind(&token)
        .bind(session_id)
        .execute(pool)
        .await
        .context("Failed to store CSRF token")?;

    Ok(token)
}

/// Check a submitted token against the one stored on the session row.
pub async fn verify_csrf_token(pool: &SqlitePool, session_id: &str, token: &str) -> Result<bool> {
    if token.is_empty() {
        return Ok(false);
    }

    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT csrf_token FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(pool)
            .await
            .context("Failed to load session for CSRF check")?;

    match row {
        Some((Some(stored),)) => Ok(stored == token),
        _ => Ok(false),
    }
}
