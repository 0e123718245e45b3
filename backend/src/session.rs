// Read-only session lookup against the external auth provider.

use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;

use crate::config::AuthConfig;

/// Cookie holding the auth provider's access token.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Auth provider unreachable: {0}")]
    Http(reqwest::Error),
    #[error("Auth provider returned {0}")]
    Status(u16),
}

impl From<reqwest::Error> for SessionError {
    fn from(e: reqwest::Error) -> Self {
        SessionError::Http(e.without_url())
    }
}

/// Answers "who is the current visitor?".
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `Ok(None)` means anonymous. Errors mean the check itself failed.
    async fn current_user(&self, token: Option<&str>) -> Result<Option<SessionUser>, SessionError>;
}

/// Used when no auth provider is configured: everyone is anonymous.
pub struct AnonymousSessions;

#[async_trait]
impl SessionProvider for AnonymousSessions {
    async fn current_user(&self, _token: Option<&str>) -> Result<Option<SessionUser>, SessionError> {
        Ok(None)
    }
}

/// Supabase GoTrue `/auth/v1/user` lookup.
pub struct SupabaseSessions {
    http: reqwest::Client,
    url: String,
    anon_key: String,
}

impl SupabaseSessions {
    pub fn new(config: &AuthConfig, timeout: Duration) -> Result<Self, SessionError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: config.url.clone(),
            anon_key: config.anon_key.clone(),
        })
    }
}

#[async_trait]
impl SessionProvider for SupabaseSessions {
    async fn current_user(&self, token: Option<&str>) -> Result<Option<SessionUser>, SessionError> {
        let Some(token) = token else {
            return Ok(None);
        };

        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SessionError::Status(status.as_u16()));
        }
        Ok(Some(response.json::<SessionUser>().await?))
    }
}

// ── Axum extractor: SessionToken ─────────────────────────────────────

/// Access token from `Authorization: Bearer ...`, else from the
/// `sb-access-token` cookie. Never rejects.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        if let Some(token) = bearer {
            return Ok(SessionToken(Some(token.to_string())));
        }

        let cookie = parts
            .headers
            .get_all("Cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|header| cookie_value(header, ACCESS_TOKEN_COOKIE));

        Ok(SessionToken(cookie))
    }
}

fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn token_from(req: Request<()>) -> Option<String> {
        let (mut parts, _) = req.into_parts();
        let SessionToken(token) = SessionToken::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        token
    }

    #[test]
    fn test_cookie_value() {
        assert_eq!(
            cookie_value("theme=dark; sb-access-token=abc.def; x=1", ACCESS_TOKEN_COOKIE),
            Some("abc.def".into())
        );
        assert_eq!(cookie_value("sb-access-token=", ACCESS_TOKEN_COOKIE), None);
        assert_eq!(cookie_value("other=1", ACCESS_TOKEN_COOKIE), None);
    }

    #[tokio::test]
    async fn test_bearer_header_wins_over_cookie() {
        let req = Request::builder()
            .header("Authorization", "Bearer header-token")
            .header("Cookie", "sb-access-token=cookie-token")
            .body(())
            .unwrap();
        assert_eq!(token_from(req).await.as_deref(), Some("header-token"));
    }

    #[tokio::test]
    async fn test_cookie_fallback_and_absent() {
        let req = Request::builder()
            .header("Cookie", "sb-access-token=cookie-token")
            .body(())
            .unwrap();
        assert_eq!(token_from(req).await.as_deref(), Some("cookie-token"));

        let req = Request::builder().body(()).unwrap();
        assert_eq!(token_from(req).await, None);
    }

    #[tokio::test]
    async fn test_anonymous_sessions() {
        let user = AnonymousSessions.current_user(Some("t")).await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_supabase_without_token_skips_lookup() {
        let sessions = SupabaseSessions::new(
            &AuthConfig {
                // Unroutable; a request here would fail
                url: "http://127.0.0.1:9".into(),
                anon_key: "anon".into(),
            },
            Duration::from_millis(200),
        )
        .unwrap();
        assert!(sessions.current_user(None).await.unwrap().is_none());
    }
}
