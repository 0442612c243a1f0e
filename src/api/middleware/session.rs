//! Session cookie extractors
//!
//! The session token travels in a cookie. `MaybeUser` resolves it when
//! present; `RequireUser` additionally sends anonymous visitors to the login
//! page.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::config::SessionConfig;
use crate::domain::User;

/// A signed-in user together with the session token that identified them
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Extractor for pages that work with or without a session
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref().map(|current| &current.user)
    }
}

/// Extractor for pages that need a session
#[derive(Debug, Clone)]
pub struct RequireUser(pub CurrentUser);

/// Why `RequireUser` refused the request
#[derive(Debug)]
pub enum AuthRejection {
    /// No live session; go log in
    LoginRequired,
    Failed(ApiError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::LoginRequired => Redirect::to("/login").into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers, &state.session_config.cookie_name) else {
            return Ok(MaybeUser(None));
        };

        let Some(session) = state.session_service.resolve(&token).await? else {
            debug!("Session cookie does not match a live session");
            return Ok(MaybeUser(None));
        };

        let user = state.user_service.get(session.user_id()).await?;

        Ok(MaybeUser(user.map(|user| CurrentUser { user, token })))
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await {
            Ok(MaybeUser(Some(current))) => Ok(RequireUser(current)),
            Ok(MaybeUser(None)) => Err(AuthRejection::LoginRequired),
            Err(err) => Err(AuthRejection::Failed(err)),
        }
    }
}

/// Read the session token from the `Cookie` headers
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value that stores a new session token
pub fn session_cookie(config: &SessionConfig, token: &str) -> String {
    Cookie::build((config.cookie_name.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(CookieDuration::seconds(config.max_age_secs))
        .build()
        .to_string()
}

/// `Set-Cookie` value that clears the session cookie
pub fn expired_session_cookie(config: &SessionConfig) -> String {
    Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(CookieDuration::ZERO)
        .build()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; farm_session=abc123; lang=en"),
        );

        assert_eq!(session_token(&headers, "farm_session").as_deref(), Some("abc123"));
        assert_eq!(session_token(&headers, "other"), None);
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("farm_session="));

        assert_eq!(session_token(&headers, "farm_session"), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = SessionConfig::default();
        let cookie = session_cookie(&config, "tok");

        assert!(cookie.starts_with("farm_session=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));

        let secure = SessionConfig {
            secure: true,
            ..SessionConfig::default()
        };
        assert!(session_cookie(&secure, "tok").contains("Secure"));
    }

    #[test]
    fn test_expired_cookie() {
        let cookie = expired_session_cookie(&SessionConfig::default());

        assert!(cookie.starts_with("farm_session="));
        assert!(cookie.contains("Max-Age=0"));
    }
}
