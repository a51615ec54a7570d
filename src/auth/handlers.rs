use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, MeResponse, MessageResponse, RegisterRequest,
            RegisterResponse,
        },
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        session::{clear_session_cookie, session_cookie, Session},
    },
    error::ApiError,
    state::AppState,
    users::repo::{NewUser, Role, User},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<RegisterResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::validation("Password too short"));
    }

    // A concurrent duplicate that slips past this check still hits the
    // unique index on email and maps to 409 in `From<sqlx::Error>`.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = hash_password(&payload.password)?;
    let address = payload.address.unwrap_or_default();
    let user = User::create(
        &state.db,
        &NewUser {
            email: payload.email,
            name: payload.name,
            phone: payload.phone,
            password_hash,
            role: payload.role.unwrap_or(Role::User),
            avatar_url: payload.avatar_url,
            blood_group: payload.blood_group,
            district: address.district,
            upazila: address.upazila,
        },
    )
    .await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user.email)?;
    let jar = jar.add(session_cookie(token, state.config.jwt.ttl_days));

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(RegisterResponse {
            message: "Registration successful".into(),
            user_id: user.id,
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::not_found("User not found")
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthenticated("Invalid password"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user.email)?;
    let jar = jar.add(session_cookie(token, state.config.jwt.ttl_days));

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".into(),
            user,
        }),
    ))
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    // Stateless tokens: logout only clears the cookie, there is no
    // server-side revocation list.
    let jar = jar.add(clear_session_cookie());
    (
        jar,
        Json(MessageResponse {
            message: "Logout successful".into(),
        }),
    )
}

#[instrument(skip(state, session))]
pub async fn me(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<MeResponse>, ApiError> {
    let user = User::find_by_email(&state.db, &session.email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(MeResponse { user }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@mail.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn register_response_serialization() {
        let resp = RegisterResponse {
            message: "Registration successful".into(),
            user_id: uuid::Uuid::new_v4(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("userId"));
        assert!(json.contains("Registration successful"));
    }
}
