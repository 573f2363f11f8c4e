//! crates/mindtrack_core/src/summary.rs
//!
//! Aggregate statistics over a user's analysis history.

use crate::domain::{AnalysisSession, Emotion};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmotionCounts {
    pub stress: usize,
    pub calm: usize,
    pub focus: usize,
}

impl EmotionCounts {
    pub fn get(&self, emotion: Emotion) -> usize {
        match emotion {
            Emotion::Stress => self.stress,
            Emotion::Calm => self.calm,
            Emotion::Focus => self.focus,
        }
    }

    fn bump(&mut self, emotion: Emotion) {
        match emotion {
            Emotion::Stress => self.stress += 1,
            Emotion::Calm => self.calm += 1,
            Emotion::Focus => self.focus += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySummary {
    pub total_sessions: usize,
    /// Mean confidence rounded to the nearest integer; `None` for an empty history.
    pub average_confidence: Option<i32>,
    pub counts: EmotionCounts,
    pub dominant_emotion: Option<Emotion>,
    pub latest: Option<AnalysisSession>,
}

/// Summarizes sessions as returned by storage (newest first).
pub fn summarize(sessions: &[AnalysisSession]) -> HistorySummary {
    let mut counts = EmotionCounts::default();
    let mut total_confidence: i64 = 0;
    for session in sessions {
        counts.bump(session.emotion);
        total_confidence += i64::from(session.confidence);
    }

    let average_confidence = if sessions.is_empty() {
        None
    } else {
        Some((total_confidence as f64 / sessions.len() as f64).round() as i32)
    };

    // Ties go to the earlier label in Emotion::ALL.
    let mut dominant_emotion: Option<Emotion> = None;
    for emotion in Emotion::ALL {
        let count = counts.get(emotion);
        if count == 0 {
            continue;
        }
        match dominant_emotion {
            Some(current) if counts.get(current) >= count => {}
            _ => dominant_emotion = Some(emotion),
        }
    }

    HistorySummary {
        total_sessions: sessions.len(),
        average_confidence,
        counts,
        dominant_emotion,
        latest: sessions.iter().max_by_key(|s| (s.created_at, s.id)).cloned(),
    }
}
