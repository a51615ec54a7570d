use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use tracing::warn;

use crate::error::ApiError;

use super::jwt::JwtKeys;

/// Name of the session cookie set on login/registration.
pub const SESSION_COOKIE: &str = "token";

/// Authenticated session extracted from the request cookie.
///
/// Carries only the claim email; handlers needing the full user record
/// look it up themselves (one extra query per protected route).
#[derive(Debug)]
pub struct Session {
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar
            .get(SESSION_COOKIE)
            .ok_or_else(|| ApiError::unauthenticated("Unauthorized: No token"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(cookie.value()).map_err(|_| {
            warn!("invalid or expired session token");
            ApiError::forbidden("Forbidden: Invalid token")
        })?;

        Ok(Session { email: claims.sub })
    }
}

/// Build the session cookie: httpOnly + Secure + SameSite=None so the
/// cross-site frontend can carry it.
pub fn session_cookie(token: String, ttl_days: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(Duration::days(ttl_days))
        .build()
}

/// Expired twin of the session cookie, used by logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(Duration::ZERO)
        .build()
}
