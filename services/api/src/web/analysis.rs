//! services/api/src/web/analysis.rs
//!
//! Endpoints for running analyses and reading back a user's history.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use mindtrack_core::domain::{AnalysisSession, Emotion, NewAnalysis};
use mindtrack_core::summary::{summarize, HistorySummary};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::web::error::{ErrorBody, HttpError};
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;

//=========================================================================================
// Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSessionResponse {
    pub id: i32,
    pub user_id: i32,
    /// One of `Stress`, `Calm`, `Focus`.
    #[schema(example = "Calm")]
    pub emotion: String,
    pub confidence: i32,
    pub created_at: DateTime<Utc>,
}

impl From<AnalysisSession> for AnalysisSessionResponse {
    fn from(session: AnalysisSession) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            emotion: session.emotion.to_string(),
            confidence: session.confidence,
            created_at: session.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct EmotionCountsResponse {
    #[serde(rename = "Stress")]
    pub stress: usize,
    #[serde(rename = "Calm")]
    pub calm: usize,
    #[serde(rename = "Focus")]
    pub focus: usize,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummaryResponse {
    pub total_sessions: usize,
    pub average_confidence: Option<i32>,
    pub counts: EmotionCountsResponse,
    pub dominant_emotion: Option<String>,
    pub latest: Option<AnalysisSessionResponse>,
}

impl From<HistorySummary> for HistorySummaryResponse {
    fn from(summary: HistorySummary) -> Self {
        Self {
            total_sessions: summary.total_sessions,
            average_confidence: summary.average_confidence,
            counts: EmotionCountsResponse {
                stress: summary.counts.get(Emotion::Stress),
                calm: summary.counts.get(Emotion::Calm),
                focus: summary.counts.get(Emotion::Focus),
            },
            dominant_emotion: summary.dominant_emotion.map(|e| e.to_string()),
            latest: summary.latest.map(AnalysisSessionResponse::from),
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/analyze - Run an analysis for the current user
///
/// Any request body is ignored.
#[utoipa::path(
    post,
    path = "/api/analyze",
    responses(
        (status = 201, description = "Analysis stored", body = AnalysisSessionResponse),
        (status = 401, description = "Not logged in", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "analysis"
)]
pub async fn create_analysis_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HttpError> {
    let result = state.analysis.analyze().await?;
    let session = state
        .storage
        .create_session(
            user.id,
            NewAnalysis {
                emotion: result.emotion,
                confidence: result.confidence,
            },
        )
        .await?;
    info!(
        "Analysis {} for user {}: {} ({}%)",
        session.id, user.id, session.emotion, session.confidence
    );

    Ok((StatusCode::CREATED, Json(AnalysisSessionResponse::from(session))))
}

/// GET /api/history - The current user's analyses, newest first
#[utoipa::path(
    get,
    path = "/api/history",
    responses(
        (status = 200, description = "Analysis history", body = [AnalysisSessionResponse]),
        (status = 401, description = "Not logged in", body = ErrorBody)
    ),
    tag = "analysis"
)]
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<AnalysisSessionResponse>>, HttpError> {
    let sessions = state.storage.get_sessions_by_user(user.id).await?;
    Ok(Json(
        sessions.into_iter().map(AnalysisSessionResponse::from).collect(),
    ))
}

/// GET /api/history/summary - Aggregate statistics over the current user's history
#[utoipa::path(
    get,
    path = "/api/history/summary",
    responses(
        (status = 200, description = "History statistics", body = HistorySummaryResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    ),
    tag = "analysis"
)]
pub async fn history_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<HistorySummaryResponse>, HttpError> {
    let sessions = state.storage.get_sessions_by_user(user.id).await?;
    Ok(Json(summarize(&sessions).into()))
}
