use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite};
use time::Duration;
use tracing::{debug, warn};

use super::{store::Session, token::SessionKeys};
use crate::{config::SessionConfig, error::AppError, state::AppState};

/// The caller's live session. Rejects with a redirect to the login page.
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let to_login = || Redirect::to("/").into_response();

        let Some(token) = session_cookie(&parts.headers, &state.config.session.cookie_name) else {
            return Err(to_login());
        };

        let keys = SessionKeys::from_ref(state);
        let claims = match keys.verify(&token) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "invalid or expired session token");
                return Err(to_login());
            }
        };

        match state.sessions.load(claims.sub).await {
            Ok(Some(session)) => Ok(CurrentSession(session)),
            Ok(None) => {
                debug!(session_id = %claims.sub, "session gone");
                Err(to_login())
            }
            Err(e) => Err(AppError::from(e).into_response()),
        }
    }
}

pub fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_owned())
}

/// `Set-Cookie` value carrying a freshly signed session token.
pub fn issue_cookie(cfg: &SessionConfig, token: String) -> String {
    Cookie::build((cfg.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cfg.secure_cookie)
        .max_age(Duration::minutes(cfg.ttl_minutes))
        .build()
        .to_string()
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn removal_cookie(cfg: &SessionConfig) -> String {
    Cookie::build((cfg.cookie_name.clone(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cfg.secure_cookie)
        .max_age(Duration::ZERO)
        .build()
        .to_string()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn cfg() -> SessionConfig {
        SessionConfig {
            secret: "s".into(),
            issuer: "i".into(),
            audience: "a".into(),
            ttl_minutes: 30,
            cookie_name: "stepfit_session".into(),
            secure_cookie: true,
            purge_interval_secs: 60,
        }
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; stepfit_session=abc.def.ghi; lang=en"),
        );
        assert_eq!(
            session_cookie(&headers, "stepfit_session").as_deref(),
            Some("abc.def.ghi")
        );
        assert_eq!(session_cookie(&headers, "missing"), None);
    }

    #[test]
    fn issued_cookie_is_scoped_and_http_only() {
        let value = issue_cookie(&cfg(), "tok".into());
        assert!(value.starts_with("stepfit_session=tok"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Path=/"));
        assert!(value.contains("Secure"));
        assert!(value.contains("Max-Age=1800"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let value = removal_cookie(&cfg());
        assert!(value.starts_with("stepfit_session=;"));
        assert!(value.contains("Max-Age=0"));
    }
}
