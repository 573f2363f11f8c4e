//! services/api/src/web/reviews.rs
//!
//! Endpoints for posting and reading reviews.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use mindtrack_core::domain::{NewReview, Review, ReviewWithAuthor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::error::{ErrorBody, HttpError};
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Ratings are expected to be 1-5 but any integer is accepted.
#[derive(Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub comment: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthorResponse {
    pub id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub username: String,
}

impl From<ReviewWithAuthor> for ReviewWithAuthorResponse {
    fn from(entry: ReviewWithAuthor) -> Self {
        let ReviewWithAuthor { review, username } = entry;
        Self {
            id: review.id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            username,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/reviews - Post a review as the current user
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = ReviewResponse),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 401, description = "Not logged in", body = ErrorBody)
    ),
    tag = "reviews"
)]
pub async fn create_review_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload?;
    let review = state
        .storage
        .create_review(
            user.id,
            NewReview {
                rating: req.rating,
                comment: req.comment,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

/// GET /api/reviews - All reviews, newest first, with author usernames
#[utoipa::path(
    get,
    path = "/api/reviews",
    responses(
        (status = 200, description = "All reviews", body = [ReviewWithAuthorResponse])
    ),
    tag = "reviews"
)]
pub async fn list_reviews_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReviewWithAuthorResponse>>, HttpError> {
    let reviews = state.storage.get_reviews().await?;
    Ok(Json(
        reviews.into_iter().map(ReviewWithAuthorResponse::from).collect(),
    ))
}
