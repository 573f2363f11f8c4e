pub mod analysis;
pub mod assistant;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod paths;
pub mod recommendations;
pub mod rest;
pub mod reviews;
pub mod state;
pub mod validation;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::require_auth;
pub use state::AppState;

/// Builds the API router with its routes and the auth guard applied.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route(paths::REGISTER, post(auth::register_handler))
        .route(paths::LOGIN, post(auth::login_handler))
        .route(paths::LOGOUT, post(auth::logout_handler))
        .route(paths::REVIEWS, get(reviews::list_reviews_handler))
        .route(paths::ASSISTANT, post(assistant::assistant_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(paths::CURRENT_USER, get(auth::current_user_handler))
        .route(paths::ANALYZE, post(analysis::create_analysis_handler))
        .route(paths::HISTORY, get(analysis::history_handler))
        .route(paths::HISTORY_SUMMARY, get(analysis::history_summary_handler))
        .route(paths::REVIEWS, post(reviews::create_review_handler))
        .route(
            paths::RECOMMENDATIONS,
            get(recommendations::recommendations_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
