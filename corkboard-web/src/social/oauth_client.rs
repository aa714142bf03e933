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

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use serde::Deserialize;
use url::Url;

use super::{ClientCredentials, ProviderEndpoints, SocialError, TokenAuthMethod};

/// Random value tying the authorization redirect to its callback.
pub fn random_state() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the provider's authorization redirect URL.
pub fn authorization_url(
    endpoints: &ProviderEndpoints,
    credentials: &ClientCredentials,
    redirect_uri: &str,
    state: &str,
) -> Result<Url, SocialError> {
    let mut url = Url::parse(endpoints.authorize_url)
        .map_err(|e| SocialError::Http(format!("bad authorize URL: {}", e)))?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &credentials.client_id)
        .append_pair("state", state)
        .append_pair("scope", endpoints.scope)
        .append_pair("redirect_uri", redirect_uri);

    Ok(url)
}

/// Successful token endpoint response. Providers differ in which optional
/// fields they send; only `access_token` is required.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Exchange an authorization code for tokens.
pub async fn exchange_code(
    http: &reqwest::Client,
    endpoints: &ProviderEndpoints,
    credentials: &ClientCredentials,
    redirect_uri: &str,
    code: &str,
) -> Result<TokenResponse, SocialError> {
    let mut form: Vec<(&str, &str)> = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
    ];

    let request = http.post(endpoints.token_url);
    let request = match endpoints.token_auth_method {
        TokenAuthMethod::ClientSecretPost => {
            form.push(("client_id", credentials.client_id.as_str()));
            form.push(("client_secret", credentials.client_secret.as_str()));
            request
        }
        TokenAuthMethod::ClientSecretBasic => {
            request.basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        }
    };

    let response = request
        .form(&form)
        .send()
        .await
        .map_err(|e| SocialError::Token(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SocialError::Token(format!(
            "token endpoint returned {}: {}",
            status, body
        )));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| SocialError::Token(format!("bad token response: {}", e)))
}
