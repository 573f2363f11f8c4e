//! crates/mindtrack_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// The fixed set of emotional states an analysis can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emotion {
    Stress,
    Calm,
    Focus,
}

impl Emotion {
    /// Every label, in canonical order.
    pub const ALL: [Emotion; 3] = [Emotion::Stress, Emotion::Calm, Emotion::Focus];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Stress => "Stress",
            Emotion::Calm => "Calm",
            Emotion::Focus => "Focus",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known emotion labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown emotion label: {0}")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    /// Labels match exactly: "Calm" parses, "calm" does not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: i32,
    pub username: String,
    pub hashed_password: String,
}

impl UserCredentials {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
}

/// One stored result of an emotion analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSession {
    pub id: i32,
    pub user_id: i32,
    pub emotion: Emotion,
    pub confidence: i32,
    pub created_at: DateTime<Utc>,
}

/// The payload needed to store a new analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAnalysis {
    pub emotion: Emotion,
    pub confidence: i32,
}

/// Alias used by the analysis port; a result is exactly what gets stored.
pub type AnalysisResult = NewAnalysis;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub rating: i32,
    pub comment: String,
}

/// A review joined with the username of its author, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithAuthor {
    pub review: Review,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_labels_parse_exactly() {
        for emotion in Emotion::ALL {
            assert_eq!(emotion.as_str().parse::<Emotion>(), Ok(emotion));
        }
        assert!("calm".parse::<Emotion>().is_err());
        assert!("".parse::<Emotion>().is_err());
        assert_eq!(
            "Anger".parse::<Emotion>(),
            Err(UnknownEmotion("Anger".to_string()))
        );
    }

    #[test]
    fn emotion_display_matches_label() {
        assert_eq!(Emotion::Focus.to_string(), "Focus");
    }
}
