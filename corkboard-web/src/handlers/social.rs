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

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use corkboard_core::models::{Member, MemberSocialProfile, Session, SocialProfile};
use corkboard_db::repositories::{MemberRepository, SessionRepository, SocialProfileRepository};
use serde::Deserialize;

use crate::{
    error::AppError,
    social::{oauth_client, SocialError},
    AppState,
};

const STATE_COOKIE: &str = "oauth_state";

/// Start the provider sign-in: plant the state cookie and redirect to the
/// provider's authorization page.
pub async fn social_start(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let registered = state
        .providers
        .get(&provider)
        .ok_or_else(|| SocialError::UnknownProvider(provider.clone()))?;

    let state_token = oauth_client::random_state();
    let redirect_uri = state.config.social_redirect_uri(&provider);
    let url = oauth_client::authorization_url(
        &registered.provider.endpoints(),
        &registered.credentials,
        &redirect_uri,
        &state_token,
    )?;

    let state_cookie = Cookie::build((STATE_COOKIE, state_token))
        .path("/")
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .max_age(cookie::time::Duration::minutes(10))
        .build();

    Ok((jar.add(state_cookie), Redirect::to(url.as_str())).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

/// Finish the provider sign-in: verify the state, trade the code for an
/// access token, fetch and normalize the profile, then sign the member in,
/// provisioning a fresh account on first contact.
pub async fn social_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let registered = state
        .providers
        .get(&provider)
        .ok_or_else(|| SocialError::UnknownProvider(provider.clone()))?;

    // The state must round-trip through the cookie we planted
    let expected = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(STATE_COOKIE);
    if params.state.is_empty() || expected.as_deref() != Some(params.state.as_str()) {
        return Err(AppError::bad_request("OAuth state mismatch"));
    }

    let redirect_uri = state.config.social_redirect_uri(&provider);
    let token = oauth_client::exchange_code(
        &state.http,
        &registered.provider.endpoints(),
        &registered.credentials,
        &redirect_uri,
        &params.code,
    )
    .await?;

    let raw = registered
        .provider
        .fetch_profile_data(&state.http, &token.access_token)
        .await?;
    let (email, profile) = registered.provider.convert_profile_data(&raw);

    // A profile we cannot identify is useless
    if profile.identifier.is_empty() {
        return Err(SocialError::InvalidProfile(raw).into());
    }

    let member_id = find_or_provision_member(&state, &provider, &email, &profile).await?;

    let session = Session::new(member_id);
    let session_id = session.id.clone();
    SessionRepository::new(state.db.clone())
        .create(&session)
        .await?;

    let session_cookie = Cookie::build(("session_id", session_id))
        .path("/")
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .build();

    Ok((jar.add(session_cookie), Redirect::to("/")).into_response())
}

/// Resolve the profile to a member id: a known `(provider, identifier)`
/// pair signs into its linked member, an unknown one provisions a member
/// plus the link row.
async fn find_or_provision_member(
    state: &AppState,
    provider: &str,
    email: &str,
    profile: &SocialProfile,
) -> Result<i64, AppError> {
    let social_repo = SocialProfileRepository::new(state.db.clone());

    if let Some(existing) = social_repo
        .find_by_provider_identifier(provider, &profile.identifier)
        .await?
    {
        return Ok(existing.member_id);
    }

    let member_repo = MemberRepository::new(state.db.clone());
    let username = derive_username(&member_repo, provider, &profile.identifier).await?;

    // Fall back to a synthesized address when the provider sent none or the
    // real one already belongs to a local account.
    let email_taken = !email.is_empty() && member_repo.find_by_email(email).await?.is_some();
    let email = if email.is_empty() || email_taken {
        format!("{}@social.local", username)
    } else {
        email.to_string()
    };

    let member = Member::new_social(username, email, Some(profile.display_name.clone()))?;
    let member_id = member_repo.create(&member).await?;

    social_repo
        .create(&MemberSocialProfile::new(member_id, profile))
        .await?;

    tracing::info!(provider, member_id, "Provisioned member from social profile");

    Ok(member_id)
}

/// Derive a unique username from the provider name and identifier,
/// filtered to the characters usernames allow and suffixed with a counter
/// on collision.
async fn derive_username(
    member_repo: &MemberRepository,
    provider: &str,
    identifier: &str,
) -> Result<String> {
    let mut base: String = format!("{}_{}", provider, identifier)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    base.truncate(45);

    if member_repo.find_by_username(&base).await?.is_none() {
        return Ok(base);
    }

    for n in 2..100 {
        let candidate = format!("{}{}", base, n);
        if member_repo.find_by_username(&candidate).await?.is_none() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("Could not find a free username near {}", base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_app_state, create_test_member};
    use axum::http::{header, StatusCode};

    #[tokio::test]
    async fn test_social_start_unknown_provider_is_404() -> Result<()> {
        let state = create_test_app_state().await?;

        let err = social_start(State(state), Path("myspace".to_string()), CookieJar::new())
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected an error"))?;

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "myspace: unknown social provider");

        Ok(())
    }

    #[tokio::test]
    async fn test_social_start_redirects_to_provider() -> Result<()> {
        let state = create_test_app_state().await?;

        let response = social_start(State(state), Path("google".to_string()), CookieJar::new())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(location.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(location.contains("client_id=test-client"));
        assert!(location.contains("state="));

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(set_cookie.starts_with("oauth_state="));
        assert!(set_cookie.contains("HttpOnly"));

        Ok(())
    }

    #[tokio::test]
    async fn test_social_callback_unknown_provider_is_404() -> Result<()> {
        let state = create_test_app_state().await?;

        let err = social_callback(
            State(state),
            Path("myspace".to_string()),
            Query(CallbackParams {
                code: "abc".to_string(),
                state: "xyz".to_string(),
            }),
            CookieJar::new(),
        )
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected an error"))?;

        assert_eq!(err.status, StatusCode::NOT_FOUND);

        Ok(())
    }

    #[tokio::test]
    async fn test_social_callback_state_mismatch_is_400() -> Result<()> {
        let state = create_test_app_state().await?;

        let jar = CookieJar::new().add(
            Cookie::build(("oauth_state", "expected-state"))
                .path("/")
                .build(),
        );

        let err = social_callback(
            State(state.clone()),
            Path("google".to_string()),
            Query(CallbackParams {
                code: "abc".to_string(),
                state: "tampered".to_string(),
            }),
            jar,
        )
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected an error"))?;

        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        // No member was provisioned
        let members = MemberRepository::new(state.db.clone()).list_all().await?;
        assert!(members.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_social_callback_missing_state_is_400() -> Result<()> {
        let state = create_test_app_state().await?;

        let err = social_callback(
            State(state),
            Path("google".to_string()),
            Query(CallbackParams {
                code: "abc".to_string(),
                state: String::new(),
            }),
            CookieJar::new(),
        )
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected an error"))?;

        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn test_provisioning_creates_member_and_link() -> Result<()> {
        let state = create_test_app_state().await?;

        let profile = SocialProfile {
            provider: "google".to_string(),
            identifier: "108012345".to_string(),
            member_id_hint: "108012345".to_string(),
            display_name: "Jane Doe".to_string(),
            ..Default::default()
        };

        let member_id =
            find_or_provision_member(&state, "google", "jane@example.com", &profile).await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

        let member = MemberRepository::new(state.db.clone())
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("member not created"))?;
        assert_eq!(member.username, "google_108012345");
        assert_eq!(member.email, "jane@example.com");
        assert_eq!(member.display_name(), "Jane Doe");

        let link = SocialProfileRepository::new(state.db.clone())
            .find_by_provider_identifier("google", "108012345")
            .await?
            .ok_or_else(|| anyhow::anyhow!("link not created"))?;
        assert_eq!(link.member_id, member_id);

        Ok(())
    }

    #[tokio::test]
    async fn test_provisioning_is_idempotent() -> Result<()> {
        let state = create_test_app_state().await?;

        let profile = SocialProfile {
            provider: "google".to_string(),
            identifier: "108012345".to_string(),
            ..Default::default()
        };

        let first = find_or_provision_member(&state, "google", "", &profile)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        let second = find_or_provision_member(&state, "google", "", &profile)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        assert_eq!(first, second);

        let members = MemberRepository::new(state.db.clone()).list_all().await?;
        assert_eq!(members.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_provisioning_synthesizes_email_when_absent() -> Result<()> {
        let state = create_test_app_state().await?;

        let profile = SocialProfile {
            provider: "google".to_string(),
            identifier: "42".to_string(),
            ..Default::default()
        };

        let member_id = find_or_provision_member(&state, "google", "", &profile)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        let member = MemberRepository::new(state.db.clone())
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("member not created"))?;
        assert_eq!(member.email, "google_42@social.local");

        Ok(())
    }

    #[tokio::test]
    async fn test_provisioning_avoids_taken_email() -> Result<()> {
        let state = create_test_app_state().await?;
        create_test_member(&state.db, "jane", "jane@example.com", false).await?;

        let profile = SocialProfile {
            provider: "google".to_string(),
            identifier: "42".to_string(),
            ..Default::default()
        };

        let member_id =
            find_or_provision_member(&state, "google", "jane@example.com", &profile).await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

        let member = MemberRepository::new(state.db.clone())
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("member not created"))?;
        assert_eq!(member.email, "google_42@social.local");

        Ok(())
    }

    #[tokio::test]
    async fn test_derive_username_filters_and_suffixes() -> Result<()> {
        let state = create_test_app_state().await?;
        let member_repo = MemberRepository::new(state.db.clone());

        // Identifier with characters usernames do not allow
        let username = derive_username(&member_repo, "google", "user@host!99").await?;
        assert_eq!(username, "google_userhost99");

        create_test_member(&state.db, "google_42", "g42@example.com", false).await?;
        let username = derive_username(&member_repo, "google", "42").await?;
        assert_eq!(username, "google_422");

        Ok(())
    }

    #[tokio::test]
    async fn test_derive_username_truncates_long_identifiers() -> Result<()> {
        let state = create_test_app_state().await?;
        let member_repo = MemberRepository::new(state.db.clone());

        let identifier = "x".repeat(100);
        let username = derive_username(&member_repo, "google", &identifier).await?;
        assert_eq!(username.len(), 45);
        assert!(username.starts_with("google_"));

        Ok(())
    }
}
