use anyhow::{Context, Result};
use corkboard_core::models::session::Session;
use sqlx::SqlitePool;

type SessionRow = (String, i64, Option<String>, Option<String>, String, String);

pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, member_id, menu_key, plugin_submenu_key, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(session.member_id)
        .bind(&session.menu_key)
        .bind(&session.plugin_submenu_key)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create session")?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, member_id, menu_key, plugin_submenu_key, expires_at, created_at
            FROM sessions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find session by id")?;

        row.map(row_to_session).transpose()
    }

    pub async fn find_by_member_id(&self, member_id: i64) -> Result<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, member_id, menu_key, plugin_submenu_key, expires_at, created_at
            FROM sessions
            WHERE member_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to find sessions by member_id")?;

        rows.into_iter().map(row_to_session).collect()
    }

    /// Record the admin menu position on the session row. Plugin routes call
    /// this before producing their response.
    pub async fn update_menu_keys(
        &self,
        id: &str,
        menu_key: Option<&str>,
        plugin_submenu_key: Option<&str>,
    ) -> Result<()> {
        let rows = sqlx::query(
            r#"
            UPDATE sessions
            SET menu_key = ?, plugin_submenu_key = ?
            WHERE id = ?
            "#,
        )
        .bind(menu_key)
        .bind(plugin_submenu_key)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update session menu keys")?
        .rows_affected();

        if rows == 0 {
            return Err(anyhow::anyhow!("Session not found"));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete session")?
            .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Session not found"));
        }

        Ok(())
    }

    pub async fn delete_expired(&self) -> Result<u64> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at < ?
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to delete expired sessions")?;

        Ok(result.rows_affected())
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

fn row_to_session(row: SessionRow) -> Result<Session> {
    let (id, member_id, menu_key, plugin_submenu_key, expires_at_str, created_at_str) = row;
    Ok(Session {
        id,
        member_id,
        menu_key,
        plugin_submenu_key,
        expires_at: parse_datetime(&expires_at_str)?,
        created_at: parse_datetime(&created_at_str)?,
    })
}
