//! services/api/src/web/validation.rs
//!
//! Request body validation. Bodies are deserialized with `serde` and then checked
//! field by field; the first failing field is reported and nothing is stored.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::web::error::HttpError;

/// A request body that can check its own fields after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), HttpError>;
}

/// A JSON extractor that rejects malformed or invalid bodies with a 400.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Fails when `value` is empty or only whitespace.
pub fn require_non_blank(field: &str, label: &str, value: &str) -> Result<(), HttpError> {
    if value.trim().is_empty() {
        return Err(HttpError::validation(field, format!("{} is required", label)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected_with_field_name() {
        let err = require_non_blank("username", "Username", "   ").unwrap_err();
        match err {
            HttpError::Validation { message, field } => {
                assert_eq!(message, "Username is required");
                assert_eq!(field.as_deref(), Some("username"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(require_non_blank("username", "Username", "demo").is_ok());
    }
}
