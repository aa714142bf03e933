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
    authorize_url: "https://www.facebook.com/v24.0/dialog/oauth",
    token_url: "https://graph.facebook.com/v24.0/oauth/access_token",
    userinfo_url: "https://graph.facebook.com/me?fields=id,name,email,picture",
    scope: "email public_profile",
    token_auth_method: TokenAuthMethod::ClientSecretPost,
};

/// Facebook Graph API provider. Graph payloads carry no `sub` claim, so
/// the identifier always comes from `id` and the member-id hint stays
/// empty.
pub struct FacebookProvider;

#[async_trait]
impl SocialProvider for FacebookProvider {
    fn name(&self) -> &'static str {
        "facebook"
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

        let photo_url = raw
            .pointer("/picture/data/url")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let profile = SocialProfile {
            member_id_hint: string_claim(raw, "sub"),
            provider: self.name().to_string(),
            identifier: string_claim(raw, "id"),
            profile_url: String::new(),
            photo_url,
            display_name: string_claim(raw, "name"),
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
        let endpoints = FacebookProvider.endpoints();
        assert_eq!(
            endpoints.authorize_url,
            "https://www.facebook.com/v24.0/dialog/oauth"
        );
        assert_eq!(
            endpoints.token_url,
            "https://graph.facebook.com/v24.0/oauth/access_token"
        );
        assert_eq!(
            endpoints.userinfo_url,
            "https://graph.facebook.com/me?fields=id,name,email,picture"
        );
        assert_eq!(endpoints.scope, "email public_profile");
    }

    #[test]
    fn test_convert_graph_payload() {
        let raw = json!({
            "id": "10223344556677889",
            "name": "Kim Minsu",
            "email": "minsu@example.com",
            "picture": {"data": {"url": "https://graph.facebook.com/photo.jpg"}}
        });

        let (email, profile) = FacebookProvider.convert_profile_data(&raw);

        assert_eq!(email, "minsu@example.com");
        assert_eq!(profile.provider, "facebook");
        assert_eq!(profile.identifier, "10223344556677889");
        assert_eq!(profile.member_id_hint, "");
        assert_eq!(profile.display_name, "Kim Minsu");
        assert_eq!(profile.photo_url, "https://graph.facebook.com/photo.jpg");
        assert_eq!(profile.profile_url, "");
    }

    #[test]
    fn test_convert_numeric_id() {
        let raw = json!({"id": 10223344556677889i64, "name": "n"});

        let (_, profile) = FacebookProvider.convert_profile_data(&raw);
        assert_eq!(profile.identifier, "10223344556677889");
    }

    #[test]
    fn test_convert_without_picture() {
        let raw = json!({"id": "1", "name": "n", "email": "e@x.com"});

        let (_, profile) = FacebookProvider.convert_profile_data(&raw);
        assert_eq!(profile.photo_url, "");
    }
}
