//! services/api/src/adapters/analysis.rs
//!
//! The stand-in emotion analyzer. It implements the `AnalysisService` port
//! without consuming any signal input.

use async_trait::async_trait;
use mindtrack_core::domain::{AnalysisResult, Emotion};
use mindtrack_core::ports::{AnalysisService, PortResult};
use rand::Rng;
use std::ops::Range;

/// Confidence percentages are drawn from this half-open range.
pub const CONFIDENCE_RANGE: Range<i32> = 70..100;

/// Picks an emotion uniformly at random with a uniform confidence in `CONFIDENCE_RANGE`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomAnalysisAdapter;

impl RandomAnalysisAdapter {
    pub fn new() -> Self {
        Self
    }

    fn sample<R: Rng>(rng: &mut R) -> AnalysisResult {
        let emotion = Emotion::ALL[rng.random_range(0..Emotion::ALL.len())];
        let confidence = rng.random_range(CONFIDENCE_RANGE);
        AnalysisResult { emotion, confidence }
    }
}

#[async_trait]
impl AnalysisService for RandomAnalysisAdapter {
    async fn analyze(&self) -> PortResult<AnalysisResult> {
        let result = {
            let mut rng = rand::rng();
            Self::sample(&mut rng)
        };
        Ok(result)
    }
}
