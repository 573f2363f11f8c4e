//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use mindtrack_core::domain::User;
use std::sync::Arc;
use tracing::debug;

use crate::web::auth::session_id_from_headers;
use crate::web::error::HttpError;
use crate::web::state::AppState;

/// The authenticated caller, inserted into request extensions by `require_auth`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware that validates the auth session cookie and loads the user.
///
/// If valid, inserts a `CurrentUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized and the handler never runs.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    // 1. Parse session ID from cookie
    let auth_session_id = session_id_from_headers(req.headers())
        .ok_or_else(|| {
            debug!("Rejected {}: no session cookie", req.uri().path());
            HttpError::unauthorized()
        })?
        .to_string();

    // 2. Validate auth session, get user_id
    let user_id = state
        .auth_sessions
        .validate_auth_session(&auth_session_id)
        .await
        .map_err(|e| {
            debug!("Rejected {}: {}", req.uri().path(), e);
            HttpError::from(e)
        })?;

    // 3. Load the user the session belongs to
    let user = state.storage.get_user(user_id).await?.ok_or_else(|| {
        debug!("Rejected {}: user {} no longer exists", req.uri().path(), user_id);
        HttpError::unauthorized()
    })?;

    // 4. Insert the caller into request extensions
    req.extensions_mut().insert(CurrentUser(user));

    // 5. Continue to the handler
    Ok(next.run(req).await)
}
