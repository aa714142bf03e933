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
use corkboard_core::models::social::MemberSocialProfile;
use sqlx::SqlitePool;

type SocialProfileRow = (i64, i64, String, String, String, String, String, String);

pub struct SocialProfileRepository {
    pool: SqlitePool,
}

impl SocialProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, profile: &MemberSocialProfile) -> Result<i64> {
        if let Err(e) = profile.is_valid() {
            return Err(anyhow::anyhow!("Invalid social profile: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO member_social_profiles
                (member_id, provider, identifier, display_name, profile_url, photo_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(profile.member_id)
        .bind(&profile.provider)
        .bind(&profile.identifier)
        .bind(&profile.display_name)
        .bind(&profile.profile_url)
        .bind(&profile.photo_url)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create social profile")?;

        Ok(result.last_insert_rowid())
    }

    /// Look up the member link for a provider identity. This is the query the
    /// social callback runs to decide between sign-in and provisioning.
    pub async fn find_by_provider_identifier(
        &self,
        provider: &str,
        identifier: &str,
    ) -> Result<Option<MemberSocialProfile>> {
        let row = sqlx::query_as::<_, SocialProfileRow>(
            r#"
            SELECT id, member_id, provider, identifier, display_name, profile_url, photo_url, created_at
            FROM member_social_profiles
            WHERE provider = ? AND identifier = ?
            "#,
        )
        .bind(provider)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find social profile by provider and identifier")?;

        row.map(row_to_profile).transpose()
    }

    pub async fn find_by_member_id(&self, member_id: i64) -> Result<Vec<MemberSocialProfile>> {
        let rows = sqlx::query_as::<_, SocialProfileRow>(
            r#"
            SELECT id, member_id, provider, identifier, display_name, profile_url, photo_url, created_at
            FROM member_social_profiles
            WHERE member_id = ?
            ORDER BY provider
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to find social profiles by member_id")?;

        rows.into_iter().map(row_to_profile).collect()
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM member_social_profiles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete social profile")?
            .rows_affected();

        if rows == 0 {
            return Err(anyhow::anyhow!("Social profile not found"));
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

fn row_to_profile(row: SocialProfileRow) -> Result<MemberSocialProfile> {
    let (id, member_id, provider, identifier, display_name, profile_url, photo_url, created_at_str) =
        row;

    Ok(MemberSocialProfile {
        id: Some(id),
        member_id,
        provider,
        identifier,
        display_name,
        profile_url,
        photo_url,
        created_at: parse_datetime(&created_at_str)?,
    })
}
