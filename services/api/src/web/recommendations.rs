//! services/api/src/web/recommendations.rs

use axum::{extract::Path, Json};
use mindtrack_core::recommendations::{self, Recommendation};
use serde::Serialize;
use utoipa::ToSchema;

use crate::web::error::ErrorBody;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category: String,
}

impl From<&Recommendation> for RecommendationResponse {
    fn from(r: &Recommendation) -> Self {
        Self {
            name: r.name.to_string(),
            description: r.description.to_string(),
            image_url: r.image_url.to_string(),
            category: r.category.to_string(),
        }
    }
}

/// GET /api/recommendations/{emotion} - Exercises suited to an emotional state
///
/// Labels are matched exactly; anything unrecognized gets the suggestions for `Calm`.
#[utoipa::path(
    get,
    path = "/api/recommendations/{emotion}",
    params(
        ("emotion" = String, Path, description = "Emotion label: Stress, Calm or Focus")
    ),
    responses(
        (status = 200, description = "Suggested exercises", body = [RecommendationResponse]),
        (status = 401, description = "Not logged in", body = ErrorBody)
    ),
    tag = "recommendations"
)]
pub async fn recommendations_handler(Path(emotion): Path<String>) -> Json<Vec<RecommendationResponse>> {
    Json(
        recommendations::for_label(&emotion)
            .iter()
            .map(RecommendationResponse::from)
            .collect(),
    )
}
