//! Axum extractor for JSON request bodies
//!
//! `JsonBody<T>` behaves like `axum::Json<T>` but reports malformed bodies as an
//! [`OrderError`], so clients get the same error envelope for every failure.

use crate::core::error::{OrderError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// Axum extractor that deserializes a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_order(
///     State(state): State<OrderState>,
///     JsonBody(request): JsonBody<NewOrder>,
/// ) -> Result<Json<Order>, OrderError> {
///     // request is a typed NewOrder
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = OrderError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(payload)) => Ok(JsonBody(payload)),
            Err(rejection) => Err(ValidationError::InvalidJson {
                message: rejection.body_text(),
            }
            .into()),
        }
    }
}
