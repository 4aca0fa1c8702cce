//! Axum extractor for validated request bodies
//!
//! `ValidatedJson<T>` parses the JSON body and runs `T`'s `validator` rules
//! before the handler sees it, rejecting with the crate's error response.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::core::error::{ValidationError, WizardError};

/// Axum extractor that deserializes and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn request_approval(
///     ValidatedJson(customer): ValidatedJson<Customer>,
/// ) -> Result<Json<Order>, WizardError> {
///     // customer already passed its field rules
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = WizardError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ValidationError::field("body", e.body_text()))?;

        payload.validate()?;
        Ok(ValidatedJson(payload))
    }
}
