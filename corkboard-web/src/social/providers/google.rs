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

use async_trait::async_trait;
use corkboard_core::models::social::SocialProfile;
use serde_json::Value;

use super::{fetch_userinfo, string_claim, validate_profile_payload};
use crate::social::{ProviderEndpoints, SocialError, SocialProvider, TokenAuthMethod};

const ENDPOINTS: ProviderEndpoints = ProviderEndpoints {
    authorize_url: "https://accounts.google.com/o/oauth2/auth",
    token_url: "https://accounts.google.com/o/oauth2/token",
    userinfo_url: "https://www.googleapis.com/oauth2/v3/userinfo",
    scope: "email profile",
    token_auth_method: TokenAuthMethod::ClientSecretPost,
};

/// Google OIDC provider.
pub struct GoogleProvider;

#[async_trait]
impl SocialProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn endpoints(&self) -> ProviderEndpoints {
        ENDPOINTS
    }

    async fn fetch_profile_data(
        &self,
        http: &reqwest::Client,
        access_token: &str,
    ) -> Result<Value, SocialError> {
        let payload = fetch_userinfo(http, ENDPOINTS.userinfo_url, access_token).await?;
        validate_profile_payload(payload)
    }

    fn convert_profile_data(&self, raw: &Value) -> (String, SocialProfile) {
        let email = string_claim(raw, "email");
        let sub = string_claim(raw, "sub");

        // An empty-string sub falls back to the plain id claim for the
        // identifier, but the member-id hint keeps tracking sub alone.
        let identifier = if sub.is_empty() {
            string_claim(raw, "id")
        } else {
            sub.clone()
        };

        let avatar = string_claim(raw, "avatar");

        let profile = SocialProfile {
            member_id_hint: sub,
            provider: self.name().to_string(),
            identifier,
            profile_url: avatar.clone(),
            photo_url: avatar,
            display_name: string_claim(raw, "nickname"),
            description: String::new(),
        };

        (email, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_endpoints() {
        let endpoints = GoogleProvider.endpoints();
        assert_eq!(
            endpoints.authorize_url,
            "https://accounts.google.com/o/oauth2/auth"
        );
        assert_eq!(
            endpoints.token_url,
            "https://accounts.google.com/o/oauth2/token"
        );
        assert_eq!(
            endpoints.userinfo_url,
            "https://www.googleapis.com/oauth2/v3/userinfo"
        );
        assert_eq!(endpoints.scope, "email profile");
        assert_eq!(
            endpoints.token_auth_method,
            TokenAuthMethod::ClientSecretPost
        );
    }

    #[test]
    fn test_convert_full_payload() {
        let raw = json!({
            "sub": "108234567890",
            "email": "kim@example.com",
            "nickname": "kim",
            "avatar": "https://lh3.googleusercontent.com/a/photo.jpg"
        });

        let (email, profile) = GoogleProvider.convert_profile_data(&raw);

        assert_eq!(email, "kim@example.com");
        assert_eq!(profile.provider, "google");
        assert_eq!(profile.identifier, "108234567890");
        assert_eq!(profile.member_id_hint, "108234567890");
        assert_eq!(profile.display_name, "kim");
        assert_eq!(
            profile.profile_url,
            "https://lh3.googleusercontent.com/a/photo.jpg"
        );
        assert_eq!(profile.photo_url, profile.profile_url);
        assert_eq!(profile.description, "");
    }

    #[test]
    fn test_convert_empty_sub_falls_back_to_id() {
        let raw = json!({"sub": "", "id": "123", "email": "a@b.com"});

        let (email, profile) = GoogleProvider.convert_profile_data(&raw);

        assert_eq!(email, "a@b.com");
        assert_eq!(profile.identifier, "123");
        // The hint never falls back; it mirrors the sub claim exactly.
        assert_eq!(profile.member_id_hint, "");
    }

    #[test]
    fn test_convert_numeric_id_is_stringified() {
        let raw = json!({"sub": "", "id": 9007, "email": "n@b.com"});

        let (_, profile) = GoogleProvider.convert_profile_data(&raw);
        assert_eq!(profile.identifier, "9007");
    }

    #[test]
    fn test_convert_missing_everything() {
        let raw = json!({"locale": "ko"});

        let (email, profile) = GoogleProvider.convert_profile_data(&raw);

        assert_eq!(email, "");
        assert_eq!(profile.identifier, "");
        assert_eq!(profile.member_id_hint, "");
        assert_eq!(profile.display_name, "");
        assert_eq!(profile.photo_url, "");
    }

    #[test]
    fn test_convert_prefers_sub_over_id() {
        let raw = json!({"sub": "s-1", "id": "i-1"});

        let (_, profile) = GoogleProvider.convert_profile_data(&raw);
        assert_eq!(profile.identifier, "s-1");
        assert_eq!(profile.member_id_hint, "s-1");
    }
}
