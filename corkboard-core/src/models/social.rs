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
use serde::{Deserialize, Serialize};

/// The normalized shape a provider adapter produces from a raw profile
/// payload. Fields are empty strings when the source claim is absent.
///
/// `member_id_hint` carries the legacy mb_id value: it is always the raw
/// `sub` claim, even when `identifier` fell back to the provider's `id`
/// field. Linked accounts created before the fallback existed depend on
/// that asymmetry, so it stays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SocialProfile {
    pub member_id_hint: String,
    pub provider: String,
    pub identifier: String,
    pub profile_url: String,
    pub photo_url: String,
    pub display_name: String,
    pub description: String,
}

/// A stored link between a member and a provider identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberSocialProfile {
    pub id: Option<i64>,
    pub member_id: i64,
    pub provider: String,
    pub identifier: String,
    pub display_name: String,
    pub profile_url: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

impl MemberSocialProfile {
    pub fn new(member_id: i64, profile: &SocialProfile) -> Self {
        Self {
            id: None,
            member_id,
            provider: profile.provider.clone(),
            identifier: profile.identifier.clone(),
            display_name: profile.display_name.clone(),
            profile_url: profile.profile_url.clone(),
            photo_url: profile.photo_url.clone(),
            created_at: Utc::now(),
        }
    }

    /// Validate the fields a link row must carry
    pub fn is_valid(&self) -> Result<(), String> {
        if self.provider.is_empty() {
            return Err("Provider cannot be empty".to_string());
        }

        if self.identifier.is_empty() {
            return Err("Identifier cannot be empty".to_string());
        }

        if self.member_id <= 0 {
            return Err("Member id must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_profile_default_is_empty() {
        let profile = SocialProfile::default();

        assert_eq!(profile.member_id_hint, "");
        assert_eq!(profile.provider, "");
        assert_eq!(profile.identifier, "");
    }

    #[test]
    fn test_member_social_profile_from_profile() {
        let profile = SocialProfile {
            member_id_hint: "109876".to_string(),
            provider: "google".to_string(),
            identifier: "109876".to_string(),
            profile_url: "https://example.com/a.png".to_string(),
            photo_url: "https://example.com/a.png".to_string(),
            display_name: "Someone".to_string(),
            description: String::new(),
        };

        let link = MemberSocialProfile::new(7, &profile);

        assert!(link.id.is_none());
        assert_eq!(link.member_id, 7);
        assert_eq!(link.provider, "google");
        assert_eq!(link.identifier, "109876");
        assert_eq!(link.display_name, "Someone");
        assert!(link.is_valid().is_ok());
    }

    #[test]
    fn test_member_social_profile_validation() {
        let profile = SocialProfile {
            provider: "google".to_string(),
            ..Default::default()
        };

        // Empty identifier must never be stored
        let link = MemberSocialProfile::new(7, &profile);
        assert!(link.is_valid().is_err());

        let mut link = MemberSocialProfile::new(
            7,
            &SocialProfile {
                provider: "google".to_string(),
                identifier: "123".to_string(),
                ..Default::default()
            },
        );
        assert!(link.is_valid().is_ok());

        link.member_id = 0;
        assert!(link.is_valid().is_err());
    }
}
