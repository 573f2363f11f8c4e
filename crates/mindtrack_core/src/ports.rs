//! crates/mindtrack_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::domain::{
    AnalysisResult, AnalysisSession, NewAnalysis, NewReview, Review, ReviewWithAuthor, User,
    UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, RNG).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Record storage for users, analysis sessions and reviews.
///
/// Lookups that miss return `Ok(None)` rather than an error. List operations return
/// records newest first, ties broken by descending id.
#[async_trait]
pub trait StorageService: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: i32) -> PortResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> PortResult<Option<UserCredentials>>;

    /// Stores a new user. Only a backend with a unique constraint reports
    /// `PortError::Conflict`; callers check for an existing username first.
    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User>;

    // --- Analysis Sessions ---
    async fn create_session(&self, user_id: i32, data: NewAnalysis) -> PortResult<AnalysisSession>;

    async fn get_sessions_by_user(&self, user_id: i32) -> PortResult<Vec<AnalysisSession>>;

    // --- Reviews ---
    async fn create_review(&self, user_id: i32, data: NewReview) -> PortResult<Review>;

    async fn get_reviews(&self) -> PortResult<Vec<ReviewWithAuthor>>;
}

/// Server-side login sessions keyed by the opaque cookie token.
#[async_trait]
pub trait AuthSessionStore: Send + Sync {
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owning user id, or `PortError::Unauthorized` for unknown or expired tokens.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<i32>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Produces one emotion reading with its confidence percentage.
    async fn analyze(&self) -> PortResult<AnalysisResult>;
}
