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

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A server-side session row. `menu_key` and `plugin_submenu_key` record the
/// admin menu position last selected by the member; admin pages and plugin
/// routes write them before rendering so the shell sidebar can highlight the
/// active entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    pub member_id: i64,
    pub menu_key: Option<String>,
    pub plugin_submenu_key: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with default expiration (24 hours)
    pub fn new(member_id: i64) -> Self {
        Self::new_with_expiry(member_id, Duration::hours(24))
    }

    /// Create a new session with custom expiration
    pub fn new_with_expiry(member_id: i64, expiry_duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            member_id,
            menu_key: None,
            plugin_submenu_key: None,
            expires_at: now + expiry_duration,
            created_at: now,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let member_id = 123;
        let before = Utc::now();
        let session = Session::new(member_id);
        let after = Utc::now();

        assert_eq!(session.id.len(), 36); // UUID v4 string length
        assert!(Uuid::parse_str(&session.id).is_ok());
        assert_eq!(session.member_id, member_id);
        assert!(session.menu_key.is_none());
        assert!(session.plugin_submenu_key.is_none());
        assert!(session.created_at >= before);
        assert!(session.created_at <= after);

        // Expiration is 24 hours from creation
        let expected_expiry = session.created_at + Duration::hours(24);
        let diff = session.expires_at - expected_expiry;
        assert!(diff.num_seconds().abs() < 1);
    }

    #[test]
    fn test_new_session_unique_ids() {
        let session1 = Session::new(1);
        let session2 = Session::new(1);

        assert_ne!(session1.id, session2.id);
    }

    #[test]
    fn test_new_with_expiry() {
        let expiry = Duration::hours(48);
        let session = Session::new_with_expiry(456, expiry);

        let expected_expiry = session.created_at + expiry;
        let diff = session.expires_at - expected_expiry;
        assert!(diff.num_seconds().abs() < 1);
    }

    #[test]
    fn test_is_expired() {
        let live = Session::new_with_expiry(1, Duration::hours(1));
        assert!(!live.is_expired());

        let dead = Session {
            id: Uuid::new_v4().to_string(),
            member_id: 1,
            menu_key: None,
            plugin_submenu_key: None,
            expires_at: Utc::now() - Duration::hours(1),
            created_at: Utc::now() - Duration::hours(2),
        };
        assert!(dead.is_expired());
    }

    #[test]
    fn test_session_serialization() {
        let mut session = Session::new(42);
        session.menu_key = Some("demo_plugin".to_string());

        let json = serde_json::to_string(&session).unwrap();
        let deserialized: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(session, deserialized);
    }
}
