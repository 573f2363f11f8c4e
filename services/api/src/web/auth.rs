//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, logout and the current user.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use mindtrack_core::domain::User;
use serde::{Deserialize, Serialize};
use mindtrack_core::ports::PortError;
use std::sync::{Arc, LazyLock};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::web::error::{ErrorBody, HttpError};
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;
use crate::web::validation::{require_non_blank, Validate, ValidatedJson};

/// Name of the cookie carrying the auth session id.
pub const SESSION_COOKIE: &str = "session";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl Validate for CredentialsRequest {
    fn validate(&self) -> Result<(), HttpError> {
        require_non_blank("username", "Username", &self.username)?;
        if self.password.is_empty() {
            return Err(HttpError::validation("password", "Password is required"));
        }
        Ok(())
    }
}

/// A user as exposed over the API. The password hash is never included.
#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

//=========================================================================================
// Password Hashing
//=========================================================================================

/// Hashes a password with Argon2 and a fresh random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Checks a password against a stored PHC string.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hashed)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("mindtrack-unknown-user").ok());

/// A hash with the same Argon2 parameters as stored passwords, verified against
/// when the username is unknown.
pub fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH.as_deref()
}

/// Verifies a login attempt. An unknown user (`stored_hash` is `None`) still costs one
/// Argon2 verification and always fails, so response time does not reveal which
/// usernames exist.
pub fn verify_login(
    password: &str,
    stored_hash: Option<&str>,
) -> Result<bool, argon2::password_hash::Error> {
    match stored_hash {
        Some(hashed) => verify_password(password, hashed),
        None => {
            if let Some(dummy) = dummy_hash() {
                verify_password(password, dummy)?;
            }
            Ok(false)
        }
    }
}

//=========================================================================================
// Session Cookies
//=========================================================================================

/// Extracts the auth session id from the request's `Cookie` header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
}

fn session_cookie(config: &Config, session_id: &str, ttl: Duration) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        session_id,
        ttl.num_seconds()
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn cleared_session_cookie(config: &Config) -> String {
    let mut cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Creates an auth session for `user_id` and returns the matching `Set-Cookie` value.
async fn start_session(state: &AppState, user_id: i32) -> Result<String, HttpError> {
    let ttl_days = state.config.session_ttl_days;
    let (ttl, expires_at) = Duration::try_days(ttl_days)
        .and_then(|ttl| Some((ttl, Utc::now().checked_add_signed(ttl)?)))
        .ok_or_else(|| {
            error!("Session lifetime of {} days is out of range", ttl_days);
            HttpError::Internal
        })?;
    let auth_session_id = Uuid::new_v4().to_string();

    state
        .auth_sessions
        .create_auth_session(&auth_session_id, user_id, expires_at)
        .await?;

    Ok(session_cookie(&state.config, &auth_session_id, ttl))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/register - Create a new account and log it in
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User created and logged in", body = UserResponse),
        (status = 400, description = "Duplicate username or invalid body", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let duplicate = || HttpError::validation("username", "Username already exists");

    // 1. Reject duplicates before touching anything
    if state.storage.get_user_by_username(&req.username).await?.is_some() {
        return Err(duplicate());
    }

    // 2. Hash the password
    let password_hash = hash_password(&req.password).map_err(|e| {
        error!("Failed to hash password: {:?}", e);
        HttpError::Internal
    })?;

    // 3. Store the user and log them in
    let user = state
        .storage
        .create_user(&req.username, &password_hash)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration of the same name
            PortError::Conflict(_) => duplicate(),
            other => other.into(),
        })?;
    let cookie = start_session(&state, user.id).await?;
    info!("Registered user {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    ))
}

/// POST /api/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = UserResponse),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let invalid = || HttpError::Unauthorized("Invalid username or password".to_string());

    // 1. Get user by username
    let credentials = state.storage.get_user_by_username(&req.username).await?;

    // 2. Verify password, paying the same hashing cost for unknown users
    let stored_hash = credentials.as_ref().map(|c| c.hashed_password.as_str());
    let valid = verify_login(&req.password, stored_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        HttpError::Internal
    })?;
    let credentials = match credentials {
        Some(credentials) if valid => credentials,
        _ => return Err(invalid()),
    };

    // 3. Establish the session
    let cookie = start_session(&state, credentials.id).await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(credentials.to_user())),
    ))
}

/// POST /api/logout - Invalidate the current session, if any
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logged out; the session cookie is cleared"),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    if let Some(auth_session_id) = session_id_from_headers(&headers) {
        state
            .auth_sessions
            .delete_auth_session(auth_session_id)
            .await?;
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cleared_session_cookie(&state.config))],
    ))
}

/// GET /api/user - The logged-in user
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "The current user", body = UserResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn current_user_handler(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn hashes_verify_only_the_matching_password() {
        let hashed = hash_password("demo123").unwrap();
        assert!(hashed.starts_with("$argon2"));
        assert!(verify_password("demo123", &hashed).unwrap());
        assert!(!verify_password("demo124", &hashed).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
    }

    #[test]
    fn unknown_users_are_checked_against_the_dummy_hash() {
        let dummy = dummy_hash().expect("dummy hash should be available");
        assert!(dummy.starts_with("$argon2"));
        let header = |phc: &str| phc.split('$').take(4).collect::<Vec<_>>().join("$");
        assert_eq!(header(dummy), header(&hash_password("pw").unwrap()));
        // Even the dummy's own plaintext never logs an unknown user in
        assert!(!verify_login("mindtrack-unknown-user", None).unwrap());
        assert!(verify_login("pw", Some(&hash_password("pw").unwrap())).unwrap());
    }

    #[test]
    fn unknown_user_check_costs_a_full_verification() {
        let stored = hash_password("secret").unwrap();
        let _ = dummy_hash();
        let fastest = |stored: Option<&str>| {
            (0..3)
                .map(|_| {
                    let started = std::time::Instant::now();
                    verify_login("guess", stored).unwrap();
                    started.elapsed()
                })
                .min()
                .unwrap()
        };
        let known = fastest(Some(&stored));
        let unknown = fastest(None);
        assert!(
            unknown * 4 >= known,
            "unknown user took {:?}, wrong password took {:?}",
            unknown,
            known
        );
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-phc-string").is_err());
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-123; sessionx=nope"),
        );
        assert_eq!(session_id_from_headers(&headers), Some("abc-123"));
    }

    #[test]
    fn ignores_lookalike_and_empty_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sessionx=nope"));
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(session_id_from_headers(&headers), None);

        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn cookie_attributes_follow_config() {
        let mut config = Config::default();
        let cookie = session_cookie(&config, "tok", Duration::days(30));
        assert!(cookie.starts_with("session=tok;"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(!cookie.contains("Secure"));

        config.cookie_secure = true;
        assert!(session_cookie(&config, "tok", Duration::days(30)).ends_with("; Secure"));
        assert!(cleared_session_cookie(&config).contains("Max-Age=0"));
    }
}
