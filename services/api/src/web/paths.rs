//! services/api/src/web/paths.rs
//!
//! The catalog of API endpoint paths shared by the router and its tests.

pub const REGISTER: &str = "/api/register";
pub const LOGIN: &str = "/api/login";
pub const LOGOUT: &str = "/api/logout";
pub const CURRENT_USER: &str = "/api/user";

pub const ANALYZE: &str = "/api/analyze";
pub const HISTORY: &str = "/api/history";
pub const HISTORY_SUMMARY: &str = "/api/history/summary";

pub const REVIEWS: &str = "/api/reviews";

/// Takes the emotion label as its single path parameter.
pub const RECOMMENDATIONS: &str = "/api/recommendations/{emotion}";

pub const ASSISTANT: &str = "/api/assistant";

/// Fills the `{emotion}` parameter of `RECOMMENDATIONS`.
pub fn recommendations_for(emotion: &str) -> String {
    RECOMMENDATIONS.replace("{emotion}", emotion)
}
