//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `StorageService` and `AuthSessionStore` ports from the `core` crate. It
//! handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mindtrack_core::domain::{
    AnalysisSession, Emotion, NewAnalysis, NewReview, Review, ReviewWithAuthor, User,
    UserCredentials,
};
use mindtrack_core::ports::{AuthSessionStore, PortError, PortResult, StorageService};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the storage ports on PostgreSQL.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Creates a new `PgStorage`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the embedded schema migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i32,
    username: String,
    password: String,
}
impl UserRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            username: self.username,
            hashed_password: self.password,
        }
    }
}

#[derive(FromRow)]
struct SessionRecord {
    id: i32,
    user_id: i32,
    emotion: String,
    confidence: i32,
    created_at: DateTime<Utc>,
}
impl SessionRecord {
    fn to_domain(self) -> PortResult<AnalysisSession> {
        let emotion = self
            .emotion
            .parse::<Emotion>()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(AnalysisSession {
            id: self.id,
            user_id: self.user_id,
            emotion,
            confidence: self.confidence,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct ReviewRecord {
    id: i32,
    user_id: i32,
    rating: i32,
    comment: String,
    created_at: DateTime<Utc>,
}
impl ReviewRecord {
    fn to_domain(self) -> Review {
        Review {
            id: self.id,
            user_id: self.user_id,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ReviewWithAuthorRecord {
    #[sqlx(flatten)]
    review: ReviewRecord,
    username: String,
}
impl ReviewWithAuthorRecord {
    fn to_domain(self) -> ReviewWithAuthor {
        ReviewWithAuthor {
            review: self.review.to_domain(),
            username: self.username,
        }
    }
}

//=========================================================================================
// `StorageService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StorageService for PgStorage {
    async fn get_user(&self, id: i32) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(|r| r.to_domain().to_user()))
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<Option<UserCredentials>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(UserRecord::to_domain))
    }

    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id, username, password",
        )
        .bind(username)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                PortError::Conflict("Username already exists".to_string())
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain().to_user())
    }

    async fn create_session(&self, user_id: i32, data: NewAnalysis) -> PortResult<AnalysisSession> {
        let record = sqlx::query_as::<_, SessionRecord>(
            "INSERT INTO analysis_sessions (user_id, emotion, confidence) VALUES ($1, $2, $3) \
             RETURNING id, user_id, emotion, confidence, created_at",
        )
        .bind(user_id)
        .bind(data.emotion.as_str())
        .bind(data.confidence)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn get_sessions_by_user(&self, user_id: i32) -> PortResult<Vec<AnalysisSession>> {
        let records = sqlx::query_as::<_, SessionRecord>(
            "SELECT id, user_id, emotion, confidence, created_at FROM analysis_sessions \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(SessionRecord::to_domain).collect()
    }

    async fn create_review(&self, user_id: i32, data: NewReview) -> PortResult<Review> {
        let record = sqlx::query_as::<_, ReviewRecord>(
            "INSERT INTO reviews (user_id, rating, comment) VALUES ($1, $2, $3) \
             RETURNING id, user_id, rating, comment, created_at",
        )
        .bind(user_id)
        .bind(data.rating)
        .bind(&data.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_reviews(&self) -> PortResult<Vec<ReviewWithAuthor>> {
        let records = sqlx::query_as::<_, ReviewWithAuthorRecord>(
            "SELECT r.id, r.user_id, r.rating, r.comment, r.created_at, u.username \
             FROM reviews r INNER JOIN users u ON u.id = r.user_id \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(ReviewWithAuthorRecord::to_domain).collect())
    }
}

//=========================================================================================
// `AuthSessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthSessionStore for PgStorage {
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
