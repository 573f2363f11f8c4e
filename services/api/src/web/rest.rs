//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification.

use utoipa::OpenApi;

use crate::web::{analysis, assistant, auth, error, recommendations, reviews};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::current_user_handler,
        analysis::create_analysis_handler,
        analysis::history_handler,
        analysis::history_summary_handler,
        reviews::create_review_handler,
        reviews::list_reviews_handler,
        recommendations::recommendations_handler,
        assistant::assistant_handler,
    ),
    components(
        schemas(
            error::ErrorBody,
            auth::CredentialsRequest,
            auth::UserResponse,
            analysis::AnalysisSessionResponse,
            analysis::EmotionCountsResponse,
            analysis::HistorySummaryResponse,
            reviews::CreateReviewRequest,
            reviews::ReviewResponse,
            reviews::ReviewWithAuthorResponse,
            recommendations::RecommendationResponse,
            assistant::AssistantRequest,
            assistant::AssistantResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and the session cookie."),
        (name = "analysis", description = "Emotion analyses and history."),
        (name = "reviews", description = "User reviews."),
        (name = "recommendations", description = "Exercises keyed by emotion."),
        (name = "assistant", description = "FAQ-style wellness assistant.")
    )
)]
pub struct ApiDoc;
