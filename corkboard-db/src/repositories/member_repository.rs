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
use corkboard_core::models::member::Member;
use sqlx::SqlitePool;

type MemberRow = (
    i64,
    String,
    String,
    String,
    Option<String>,
    bool,
    bool,
    String,
    String,
);

pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, member: &Member) -> Result<i64> {
        if let Err(e) = member.is_valid() {
            return Err(anyhow::anyhow!("Invalid member: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO members (username, email, password_hash, nickname, is_active, is_admin, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.username)
        .bind(&member.email)
        .bind(&member.password_hash)
        .bind(&member.nickname)
        .bind(member.is_active)
        .bind(member.is_admin)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create member")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, email, password_hash, nickname, is_active, is_admin, created_at, updated_at
            FROM members
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find member by id")?;

        row.map(row_to_member).transpose()
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, email, password_hash, nickname, is_active, is_admin, created_at, updated_at
            FROM members
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find member by username")?;

        row.map(row_to_member).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, email, password_hash, nickname, is_active, is_admin, created_at, updated_at
            FROM members
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find member by email")?;

        row.map(row_to_member).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, email, password_hash, nickname, is_active, is_admin, created_at, updated_at
            FROM members
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list members")?;

        rows.into_iter().map(row_to_member).collect()
    }

    pub async fn update(&self, member: &Member) -> Result<()> {
        let id = member
            .id
            .ok_or_else(|| anyhow::anyhow!("Member has no ID"))?;

        if let Err(e) = member.is_valid() {
            return Err(anyhow::anyhow!("Invalid member: {}", e));
        }

        let rows = sqlx::query(
            r#"
            UPDATE members
            SET username = ?, email = ?, password_hash = ?, nickname = ?,
                is_active = ?, is_admin = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.username)
        .bind(&member.email)
        .bind(&member.password_hash)
        .bind(&member.nickname)
        .bind(member.is_active)
        .bind(member.is_admin)
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update member")?
        .rows_affected();

        if rows == 0 {
            return Err(anyhow::anyhow!("Member not found"));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete member")?
            .rows_affected();

        if rows == 0 {
            return Err(anyhow::anyhow!("Member not found"));
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

fn row_to_member(row: MemberRow) -> Result<Member> {
    let (
        id,
        username,
        email,
        password_hash,
        nickname,
        is_active,
        is_admin,
        created_at_str,
        updated_at_str,
    ) = row;

    Ok(Member {
        id: Some(id),
        username,
        email,
        password_hash,
        nickname,
        is_active,
        is_admin,
        created_at: parse_datetime(&created_at_str)?,
        updated_at: parse_datetime(&updated_at_str)?,
    })
}
