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

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    RequestPartsExt,
};
use corkboard_core::models::{member::Member, session::Session};
use corkboard_db::repositories::{MemberRepository, SessionRepository};

use crate::AppState;

/// Current authenticated member, extracted from request
#[derive(Debug, Clone)]
pub struct CurrentMember {
    pub member: Member,
    pub session: Session,
}

impl<S> FromRequestParts<S> for CurrentMember
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session_id = extract_session_id(parts).await?;

        let app_state = AppState::from_ref(state);

        // Look up session
        let session_repo = SessionRepository::new(app_state.db.clone());
        let session = session_repo
            .find_by_id(&session_id)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Database error"))?
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid session"))?;

        if session.is_expired() {
            return Err((StatusCode::UNAUTHORIZED, "Session expired"));
        }

        // Look up member
        let member_repo = MemberRepository::new(app_state.db);
        let member = member_repo
            .find_by_id(session.member_id)
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Database error"))?
            .ok_or((StatusCode::UNAUTHORIZED, "Member not found"))?;

        if !member.is_active {
            return Err((StatusCode::FORBIDDEN, "Account disabled"));
        }

        Ok(CurrentMember { member, session })
    }
}

/// Optional authenticated member
#[derive(Debug, Clone)]
pub struct OptionalMember(pub Option<CurrentMember>);

impl<S> FromRequestParts<S> for OptionalMember
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match CurrentMember::from_request_parts(parts, state).await {
            Ok(member) => Ok(OptionalMember(Some(member))),
            Err((StatusCode::UNAUTHORIZED, _)) => Ok(OptionalMember(None)),
            Err(e) => Err(e),
        }
    }
}

async fn extract_session_id(parts: &mut Parts) -> Result<String, (StatusCode, &'static str)> {
    let cookies = parts.extract::<axum_extra::extract::CookieJar>().await.ok();

    if let Some(cookies) = cookies {
        if let Some(session_cookie) = cookies.get("session_id") {
            return Ok(session_cookie.value().to_string());
        }
    }

    Err((StatusCode::UNAUTHORIZED, "No session found"))
}

/// Require an admin member. Anonymous requests are redirected to the login
/// page; authenticated non-admins get a 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    pub member: Member,
    pub session: Session,
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let current = match CurrentMember::from_request_parts(parts, state).await {
            Ok(current) => current,
            Err((StatusCode::UNAUTHORIZED, _)) => {
                return Err(Redirect::to("/bbs/login").into_response());
            }
            Err((status, message)) => return Err((status, message).into_response()),
        };

        if !current.member.is_admin {
            return Err((StatusCode::FORBIDDEN, "Admin access required").into_response());
        }

        Ok(RequireAdmin {
            member: current.member,
            session: current.session,
        })
    }
}
