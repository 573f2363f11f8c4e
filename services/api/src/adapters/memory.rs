//! services/api/src/adapters/memory.rs
//!
//! A process-lifetime storage backend used when no database is configured.
//! It implements both `StorageService` and `AuthSessionStore` on top of
//! in-process maps guarded by a single async mutex.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use mindtrack_core::domain::{
    AnalysisSession, AuthSession, NewAnalysis, NewReview, Review, ReviewWithAuthor, User,
    UserCredentials,
};
use mindtrack_core::ports::{AuthSessionStore, PortError, PortResult, StorageService};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, UserCredentials>,
    sessions: BTreeMap<i32, AnalysisSession>,
    reviews: BTreeMap<i32, Review>,
    auth_sessions: HashMap<String, AuthSession>,
    last_user_id: i32,
    last_session_id: i32,
    last_review_id: i32,
    last_session_at: Option<DateTime<Utc>>,
    last_review_at: Option<DateTime<Utc>>,
}

/// In-memory implementation of the storage ports.
///
/// Ids start at 1 and increase by one per insert. Creation timestamps are kept at
/// microsecond precision and strictly increase per table, so newest-first ordering is
/// never ambiguous. Username uniqueness is not checked here.
#[derive(Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Returns the current time, nudged forward when the clock has not moved past `last`.
fn next_timestamp(last: &mut Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    let stamp = match *last {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    };
    *last = Some(stamp);
    stamp
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i32)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

//=========================================================================================
// `StorageService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StorageService for MemoryStorage {
    async fn get_user(&self, id: i32) -> PortResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).map(UserCredentials::to_user))
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<Option<UserCredentials>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User> {
        let mut tables = self.tables.lock().await;
        tables.last_user_id += 1;
        let credentials = UserCredentials {
            id: tables.last_user_id,
            username: username.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        let user = credentials.to_user();
        tables.users.insert(credentials.id, credentials);
        Ok(user)
    }

    async fn create_session(&self, user_id: i32, data: NewAnalysis) -> PortResult<AnalysisSession> {
        let mut tables = self.tables.lock().await;
        tables.last_session_id += 1;
        let session = AnalysisSession {
            id: tables.last_session_id,
            user_id,
            emotion: data.emotion,
            confidence: data.confidence,
            created_at: next_timestamp(&mut tables.last_session_at),
        };
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_sessions_by_user(&self, user_id: i32) -> PortResult<Vec<AnalysisSession>> {
        let tables = self.tables.lock().await;
        let mut sessions: Vec<AnalysisSession> = tables
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut sessions, |s| (s.created_at, s.id));
        Ok(sessions)
    }

    async fn create_review(&self, user_id: i32, data: NewReview) -> PortResult<Review> {
        let mut tables = self.tables.lock().await;
        tables.last_review_id += 1;
        let review = Review {
            id: tables.last_review_id,
            user_id,
            rating: data.rating,
            comment: data.comment,
            created_at: next_timestamp(&mut tables.last_review_at),
        };
        tables.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn get_reviews(&self) -> PortResult<Vec<ReviewWithAuthor>> {
        let tables = self.tables.lock().await;
        // Inner-join semantics: a review whose author is missing is not listed.
        let mut reviews: Vec<ReviewWithAuthor> = tables
            .reviews
            .values()
            .filter_map(|review| {
                tables.users.get(&review.user_id).map(|author| ReviewWithAuthor {
                    review: review.clone(),
                    username: author.username.clone(),
                })
            })
            .collect();
        newest_first(&mut reviews, |r| (r.review.created_at, r.review.id));
        Ok(reviews)
    }
}

//=========================================================================================
// `AuthSessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthSessionStore for MemoryStorage {
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        tables.auth_sessions.retain(|_, s| s.expires_at > now);
        tables.auth_sessions.insert(
            session_id.to_string(),
            AuthSession {
                id: session_id.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<i32> {
        let mut tables = self.tables.lock().await;
        let session = tables
            .auth_sessions
            .get(session_id)
            .cloned()
            .ok_or(PortError::Unauthorized)?;
        if session.expires_at <= Utc::now() {
            tables.auth_sessions.remove(session_id);
            return Err(PortError::Unauthorized);
        }
        Ok(session.user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        let mut tables = self.tables.lock().await;
        tables.auth_sessions.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindtrack_core::domain::Emotion;

    #[tokio::test]
    async fn assigns_sequential_ids_per_table() {
        let storage = MemoryStorage::new();
        let alice = storage.create_user("alice", "hash-a").await.unwrap();
        let bob = storage.create_user("bob", "hash-b").await.unwrap();
        assert_eq!((alice.id, bob.id), (1, 2));

        let first = storage
            .create_session(alice.id, NewAnalysis { emotion: Emotion::Calm, confidence: 80 })
            .await
            .unwrap();
        let review = storage
            .create_review(bob.id, NewReview { rating: 5, comment: "great".into() })
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(review.id, 1);
    }

    #[tokio::test]
    async fn lookups_miss_without_error() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_user(42).await.unwrap(), None);
        assert!(storage.get_user_by_username("ghost").await.unwrap().is_none());
        assert!(storage.get_sessions_by_user(42).await.unwrap().is_empty());
        assert!(storage.get_reviews().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn username_lookup_is_case_sensitive() {
        let storage = MemoryStorage::new();
        storage.create_user("Alice", "hash").await.unwrap();
        assert!(storage.get_user_by_username("alice").await.unwrap().is_none());
        let found = storage.get_user_by_username("Alice").await.unwrap().unwrap();
        assert_eq!(found.hashed_password, "hash");
    }

    #[tokio::test]
    async fn sessions_are_scoped_to_user_and_strictly_newest_first() {
        let storage = MemoryStorage::new();
        let alice = storage.create_user("alice", "h").await.unwrap();
        let bob = storage.create_user("bob", "h").await.unwrap();

        for confidence in 70..80 {
            storage
                .create_session(alice.id, NewAnalysis { emotion: Emotion::Focus, confidence })
                .await
                .unwrap();
        }
        storage
            .create_session(bob.id, NewAnalysis { emotion: Emotion::Stress, confidence: 99 })
            .await
            .unwrap();

        let history = storage.get_sessions_by_user(alice.id).await.unwrap();
        assert_eq!(history.len(), 10);
        assert!(history.iter().all(|s| s.user_id == alice.id));
        assert!(history.windows(2).all(|w| w[0].created_at > w[1].created_at));
        assert_eq!(history[0].confidence, 79);
    }

    #[tokio::test]
    async fn reviews_carry_author_username() {
        let storage = MemoryStorage::new();
        let alice = storage.create_user("alice", "h").await.unwrap();
        let bob = storage.create_user("bob", "h").await.unwrap();
        storage
            .create_review(alice.id, NewReview { rating: 4, comment: "nice".into() })
            .await
            .unwrap();
        storage
            .create_review(bob.id, NewReview { rating: 2, comment: "meh".into() })
            .await
            .unwrap();

        let reviews = storage.get_reviews().await.unwrap();
        let names: Vec<&str> = reviews.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
        assert_eq!(reviews[1].review.comment, "nice");
    }

    #[tokio::test]
    async fn auth_sessions_validate_until_deleted_or_expired() {
        let storage = MemoryStorage::new();
        let later = Utc::now() + Duration::days(1);
        storage.create_auth_session("live", 7, later).await.unwrap();
        assert_eq!(storage.validate_auth_session("live").await.unwrap(), 7);

        storage.delete_auth_session("live").await.unwrap();
        assert!(matches!(
            storage.validate_auth_session("live").await,
            Err(PortError::Unauthorized)
        ));

        let earlier = Utc::now() - Duration::seconds(1);
        storage.create_auth_session("stale", 7, earlier).await.unwrap();
        assert!(matches!(
            storage.validate_auth_session("stale").await,
            Err(PortError::Unauthorized)
        ));
        assert!(matches!(
            storage.validate_auth_session("unknown").await,
            Err(PortError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn creating_an_auth_session_prunes_expired_ones() {
        let storage = MemoryStorage::new();
        let earlier = Utc::now() - Duration::seconds(1);
        let later = Utc::now() + Duration::days(1);
        storage.create_auth_session("stale-1", 1, earlier).await.unwrap();
        storage.create_auth_session("stale-2", 2, earlier).await.unwrap();
        storage.create_auth_session("live", 3, later).await.unwrap();

        let tables = storage.tables.lock().await;
        let mut ids: Vec<&str> = tables.auth_sessions.keys().map(String::as_str).collect();
        ids.sort();
        assert_eq!(ids, vec!["live"]);
    }
}
