//! services/api/src/web/assistant.rs
//!
//! The FAQ assistant endpoint.

use axum::Json;
use mindtrack_core::assistant;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::web::error::{ErrorBody, HttpError};
use crate::web::validation::{require_non_blank, Validate, ValidatedJson};

#[derive(Deserialize, ToSchema)]
pub struct AssistantRequest {
    pub message: String,
}

impl Validate for AssistantRequest {
    fn validate(&self) -> Result<(), HttpError> {
        require_non_blank("message", "Message", &self.message)
    }
}

#[derive(Serialize, ToSchema)]
pub struct AssistantResponse {
    pub reply: String,
}

/// POST /api/assistant - Answer a general wellness question
#[utoipa::path(
    post,
    path = "/api/assistant",
    request_body = AssistantRequest,
    responses(
        (status = 200, description = "The assistant's reply", body = AssistantResponse),
        (status = 400, description = "Empty message", body = ErrorBody)
    ),
    tag = "assistant"
)]
pub async fn assistant_handler(
    ValidatedJson(req): ValidatedJson<AssistantRequest>,
) -> Json<AssistantResponse> {
    Json(AssistantResponse {
        reply: assistant::reply_to(&req.message).to_string(),
    })
}
