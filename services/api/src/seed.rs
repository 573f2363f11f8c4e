//! services/api/src/seed.rs
//!
//! Startup seeding of the demo account.

use mindtrack_core::domain::{Emotion, NewAnalysis};
use mindtrack_core::ports::{PortError, PortResult, StorageService};
use tracing::info;

use crate::web::auth::hash_password;

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo123";

/// Sample history for the demo account, oldest first.
const DEMO_SESSIONS: [(Emotion, i32); 3] = [
    (Emotion::Stress, 85),
    (Emotion::Calm, 92),
    (Emotion::Focus, 78),
];

/// Creates the demo user and its sample sessions unless the user already exists.
///
/// Returns `true` when anything was created.
pub async fn seed_demo_data(storage: &dyn StorageService) -> PortResult<bool> {
    if storage.get_user_by_username(DEMO_USERNAME).await?.is_some() {
        return Ok(false);
    }

    let password_hash =
        hash_password(DEMO_PASSWORD).map_err(|e| PortError::Unexpected(e.to_string()))?;
    let user = storage.create_user(DEMO_USERNAME, &password_hash).await?;

    for (emotion, confidence) in DEMO_SESSIONS {
        storage
            .create_session(user.id, NewAnalysis { emotion, confidence })
            .await?;
    }

    info!("Seeded demo user {}", DEMO_USERNAME);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;

    #[tokio::test]
    async fn seeds_once_with_three_sessions() {
        let storage = MemoryStorage::new();
        assert!(seed_demo_data(&storage).await.unwrap());
        assert!(!seed_demo_data(&storage).await.unwrap());

        let demo = storage.get_user_by_username(DEMO_USERNAME).await.unwrap().unwrap();
        let sessions = storage.get_sessions_by_user(demo.id).await.unwrap();
        let emotions: Vec<Emotion> = sessions.iter().map(|s| s.emotion).collect();
        assert_eq!(emotions, vec![Emotion::Focus, Emotion::Calm, Emotion::Stress]);
    }
}
