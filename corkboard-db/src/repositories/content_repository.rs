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
use corkboard_core::models::content::Content;
use sqlx::SqlitePool;

pub struct ContentRepository {
    pool: SqlitePool,
}

impl ContentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, content: &Content) -> Result<i64> {
        if let Err(e) = content.is_valid() {
            return Err(anyhow::anyhow!("Invalid content: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO contents (co_id, co_subject, co_content, co_skin, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&content.co_id)
        .bind(&content.co_subject)
        .bind(&content.co_content)
        .bind(&content.co_skin)
        .bind(content.created_at)
        .bind(content.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create content")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Content>> {
        let row = sqlx::query_as::<_, (i64, String, String, String, String, String, String)>(
            r#"
            SELECT id, co_id, co_subject, co_content, co_skin, created_at, updated_at
            FROM contents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find content by id")?;

        row.map(row_to_content).transpose()
    }

    pub async fn find_by_co_id(&self, co_id: &str) -> Result<Option<Content>> {
        let row = sqlx::query_as::<_, (i64, String, String, String, String, String, String)>(
            r#"
            SELECT id, co_id, co_subject, co_content, co_skin, created_at, updated_at
            FROM contents
            WHERE co_id = ?
            "#,
        )
        .bind(co_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find content by co_id")?;

        row.map(row_to_content).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<Content>> {
        let rows = sqlx::query_as::<_, (i64, String, String, String, String, String, String)>(
            r#"
            SELECT id, co_id, co_subject, co_content, co_skin, created_at, updated_at
            FROM contents
            ORDER BY co_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list contents")?;

        rows.into_iter().map(row_to_content).collect()
    }

    pub async fn update(&self, content: &Content) -> Result<()> {
        let id = content
            .id
            .ok_or_else(|| anyhow::anyhow!("Content has no ID"))?;

        if let Err(e) = content.is_valid() {
            return Err(anyhow::anyhow!("Invalid content: {}", e));
        }

        let rows = sqlx::query(
            r#"
            UPDATE contents
            SET co_id = ?, co_subject = ?, co_content = ?, co_skin = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&content.co_id)
        .bind(&content.co_subject)
        .bind(&content.co_content)
        .bind(&content.co_skin)
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update content")?
        .rows_affected();

        if rows == 0 {
            return Err(anyhow::anyhow!("Content not found"));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM contents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete content")?
            .rows_affected();

        if rows == 0 {
            return Err(anyhow::anyhow!("Content not found"));
        }
        Ok(())
    }
}

fn parse_datetime(s: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    if s.contains('T') {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .context("Failed to parse datetime as RFC3339")
    } else {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.and_utc())
            .context("Failed to parse datetime as SQLite format")
    }
}

fn row_to_content(row: (i64, String, String, String, String, String, String)) -> Result<Content> {
    let (id, co_id, co_subject, co_content, co_skin, created_at_str, updated_at_str) = row;
    Ok(Content {
        id: Some(id),
        co_id,
        co_subject,
        co_content,
        co_skin,
        created_at: parse_datetime(&created_at_str)?,
        updated_at: parse_datetime(&updated_at_str)?,
    })
}
