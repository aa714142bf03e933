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

pub mod facebook;
pub mod google;

pub use facebook::FacebookProvider;
pub use google::GoogleProvider;

use serde_json::Value;

use super::SocialError;

/// Claims any one of which is enough to identify the account. A payload
/// carrying none of them (missing or JSON null) is rejected before
/// conversion runs.
const IDENTIFYING_CLAIMS: [&str; 3] = ["sub", "id", "email"];

fn has_identifying_claim(payload: &Value) -> bool {
    IDENTIFYING_CLAIMS
        .iter()
        .any(|key| matches!(payload.get(*key), Some(v) if !v.is_null()))
}

/// Gate a freshly fetched userinfo payload. Valid payloads pass through
/// unchanged; invalid ones are carried inside the error for logging.
pub(crate) fn validate_profile_payload(payload: Value) -> Result<Value, SocialError> {
    if has_identifying_claim(&payload) {
        Ok(payload)
    } else {
        Err(SocialError::InvalidProfile(payload))
    }
}

/// Read a claim as a string. Numeric ids are stringified; anything else
/// absent or non-scalar becomes the empty string.
pub(crate) fn string_claim(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// GET a userinfo endpoint with a bearer token and parse the JSON body.
pub(crate) async fn fetch_userinfo(
    http: &reqwest::Client,
    url: &str,
    access_token: &str,
) -> Result<Value, SocialError> {
    let response = http.get(url).bearer_auth(access_token).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SocialError::Http(format!(
            "userinfo endpoint returned {}",
            status
        )));
    }

    let payload: Value = response.json().await?;
    Ok(payload)
}
