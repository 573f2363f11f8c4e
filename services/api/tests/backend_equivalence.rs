//! Runs the same call sequence against both storage backends and compares what
//! callers can observe. The PostgreSQL half only runs when `TEST_DATABASE_URL`
//! points at a disposable database; its tables are truncated first.

use api_lib::adapters::{MemoryStorage, PgStorage};
use mindtrack_core::domain::{Emotion, NewAnalysis, NewReview};
use mindtrack_core::ports::StorageService;
use sqlx::postgres::PgPoolOptions;

/// Everything observable about storage after the sequence, minus raw timestamps.
#[derive(Debug, PartialEq)]
struct Observed {
    users: Vec<(i32, String)>,
    missing_user: bool,
    lookup_by_name: Option<(i32, String, String)>,
    alice_sessions: Vec<(i32, i32, Emotion, i32)>,
    bob_sessions: Vec<(i32, i32, Emotion, i32)>,
    reviews: Vec<(i32, i32, i32, String, String)>,
    sessions_newest_first: bool,
    reviews_newest_first: bool,
}

async fn run_sequence(storage: &dyn StorageService) -> Observed {
    let alice = storage.create_user("alice", "hash-a").await.unwrap();
    let bob = storage.create_user("bob", "hash-b").await.unwrap();

    for (emotion, confidence) in [
        (Emotion::Stress, 85),
        (Emotion::Calm, 92),
        (Emotion::Focus, 78),
    ] {
        storage
            .create_session(alice.id, NewAnalysis { emotion, confidence })
            .await
            .unwrap();
    }
    storage
        .create_session(bob.id, NewAnalysis { emotion: Emotion::Calm, confidence: 71 })
        .await
        .unwrap();

    storage
        .create_review(alice.id, NewReview { rating: 5, comment: "lovely".into() })
        .await
        .unwrap();
    storage
        .create_review(bob.id, NewReview { rating: 0, comment: "".into() })
        .await
        .unwrap();
    storage
        .create_review(alice.id, NewReview { rating: 3, comment: "again".into() })
        .await
        .unwrap();

    let mut users = Vec::new();
    for id in [alice.id, bob.id] {
        let user = storage.get_user(id).await.unwrap().unwrap();
        users.push((user.id, user.username));
    }

    let alice_history = storage.get_sessions_by_user(alice.id).await.unwrap();
    let bob_history = storage.get_sessions_by_user(bob.id).await.unwrap();
    let reviews = storage.get_reviews().await.unwrap();

    Observed {
        users,
        missing_user: storage.get_user(999).await.unwrap().is_none(),
        lookup_by_name: storage
            .get_user_by_username("bob")
            .await
            .unwrap()
            .map(|c| (c.id, c.username, c.hashed_password)),
        sessions_newest_first: alice_history
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at),
        reviews_newest_first: reviews
            .windows(2)
            .all(|w| w[0].review.created_at >= w[1].review.created_at),
        alice_sessions: alice_history
            .into_iter()
            .map(|s| (s.id, s.user_id, s.emotion, s.confidence))
            .collect(),
        bob_sessions: bob_history
            .into_iter()
            .map(|s| (s.id, s.user_id, s.emotion, s.confidence))
            .collect(),
        reviews: reviews
            .into_iter()
            .map(|r| (r.review.id, r.review.user_id, r.review.rating, r.review.comment, r.username))
            .collect(),
    }
}

fn expected() -> Observed {
    Observed {
        users: vec![(1, "alice".into()), (2, "bob".into())],
        missing_user: true,
        lookup_by_name: Some((2, "bob".into(), "hash-b".into())),
        alice_sessions: vec![
            (3, 1, Emotion::Focus, 78),
            (2, 1, Emotion::Calm, 92),
            (1, 1, Emotion::Stress, 85),
        ],
        bob_sessions: vec![(4, 2, Emotion::Calm, 71)],
        reviews: vec![
            (3, 1, 3, "again".into(), "alice".into()),
            (2, 2, 0, "".into(), "bob".into()),
            (1, 1, 5, "lovely".into(), "alice".into()),
        ],
        sessions_newest_first: true,
        reviews_newest_first: true,
    }
}

#[tokio::test]
async fn memory_backend_matches_expected_observations() {
    let storage = MemoryStorage::new();
    assert_eq!(run_sequence(&storage).await, expected());
}

#[tokio::test]
async fn postgres_backend_matches_memory_backend() {
    let Some(database_url) = std::env::var("TEST_DATABASE_URL").ok() else {
        eprintln!("TEST_DATABASE_URL not set; skipping PostgreSQL comparison");
        return;
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Should connect to test database");
    let pg = PgStorage::new(pool.clone());
    pg.run_migrations().await.expect("Migrations should apply");
    sqlx::query(
        "TRUNCATE auth_sessions, reviews, analysis_sessions, users RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await
    .expect("Should reset tables");

    let memory = MemoryStorage::new();
    assert_eq!(run_sequence(&pg).await, run_sequence(&memory).await);
}
