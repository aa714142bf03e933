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
    extract::FromRequestParts,
    http::{header, request::Parts},
    RequestPartsExt,
};
use std::convert::Infallible;

/// Device class a request is rendered for. Picks the first template
/// directory segment (`pc/...` or `mobile/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Pc,
    Mobile,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Pc => "pc",
            Device::Mobile => "mobile",
        }
    }

    pub fn from_user_agent(user_agent: &str) -> Self {
        const MOBILE_MARKERS: [&str; 3] = ["Mobile", "Android", "iPhone"];

        if MOBILE_MARKERS.iter().any(|m| user_agent.contains(m)) {
            Device::Mobile
        } else {
            Device::Pc
        }
    }
}

impl<S> FromRequestParts<S> for Device
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A `device` cookie overrides sniffing, so visitors can switch views
        if let Ok(cookies) = parts.extract::<axum_extra::extract::CookieJar>().await {
            match cookies.get("device").map(|c| c.value()) {
                Some("mobile") => return Ok(Device::Mobile),
                Some("pc") => return Ok(Device::Pc),
                _ => {}
            }
        }

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        Ok(Device::from_user_agent(user_agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_user_agent() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";
        assert_eq!(Device::from_user_agent(ua), Device::Pc);
    }

    #[test]
    fn test_android_user_agent() {
        let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile Safari/537.36";
        assert_eq!(Device::from_user_agent(ua), Device::Mobile);
    }

    #[test]
    fn test_iphone_user_agent() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
        assert_eq!(Device::from_user_agent(ua), Device::Mobile);
    }

    #[test]
    fn test_empty_user_agent_defaults_to_pc() {
        assert_eq!(Device::from_user_agent(""), Device::Pc);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Device::Pc.as_str(), "pc");
        assert_eq!(Device::Mobile.as_str(), "mobile");
    }
}
