//! Typed error handling for order and report operations
//!
//! Every failure a caller can observe is an [`OrderError`]. Each variant maps to
//! an HTTP status code and a stable error code so the transport layer never has
//! to inspect messages.
//!
//! # Error Categories
//!
//! - Line item and pricing failures: [`OrderError::InvalidItem`], [`OrderError::InvalidPricing`]
//! - Query failures: [`OrderError::InvalidFilter`], [`OrderError::InvalidDate`]
//! - Request shape failures: [`ValidationError`]
//! - Missing records: [`OrderError::NotFound`]
//! - Backend failures: [`StorageError`], [`OrderError::Internal`]
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get(&id).await {
//!     Ok(order) => println!("Found: {:?}", order),
//!     Err(OrderError::NotFound { id }) => println!("Order {} not found", id),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for order and report operations
#[derive(Debug)]
pub enum OrderError {
    /// A line item is malformed
    InvalidItem {
        /// Position of the item in the request, for diagnostics only
        position: usize,
        message: String,
    },

    /// The computed total is not strictly positive
    InvalidPricing { total: f64 },

    /// A listing filter or page parameter is malformed
    InvalidFilter { field: String, message: String },

    /// A report date is malformed or in the future
    InvalidDate { date: String, message: String },

    /// The request body failed shape validation
    Validation(ValidationError),

    /// The referenced order does not exist
    NotFound { id: String },

    /// Storage backend errors
    Storage(StorageError),

    /// Unexpected failure (e.g. the store was unavailable while building a report)
    Internal(String),
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::InvalidItem { position, message } => {
                write!(f, "Item at index {}: {}", position, message)
            }
            OrderError::InvalidPricing { total } => {
                write!(f, "Total price must be greater than zero (got {})", total)
            }
            OrderError::InvalidFilter { field, message } => {
                write!(f, "Invalid filter '{}': {}", field, message)
            }
            OrderError::InvalidDate { date, message } => {
                write!(f, "Invalid report date '{}': {}", date, message)
            }
            OrderError::Validation(e) => write!(f, "{}", e),
            OrderError::NotFound { id } => write!(f, "Order with ID {} not found", id),
            OrderError::Storage(e) => write!(f, "{}", e),
            OrderError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for OrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrderError::Validation(e) => Some(e),
            OrderError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl OrderError {
    pub fn invalid_item(position: usize, message: impl Into<String>) -> Self {
        OrderError::InvalidItem {
            position,
            message: message.into(),
        }
    }

    pub fn invalid_filter(field: impl Into<String>, message: impl Into<String>) -> Self {
        OrderError::InvalidFilter {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_date(date: impl Into<String>, message: impl Into<String>) -> Self {
        OrderError::InvalidDate {
            date: date.into(),
            message: message.into(),
        }
    }

    pub fn not_found(id: impl fmt::Display) -> Self {
        OrderError::NotFound { id: id.to_string() }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::InvalidItem { .. }
            | OrderError::InvalidPricing { .. }
            | OrderError::InvalidFilter { .. }
            | OrderError::InvalidDate { .. }
            | OrderError::Validation(_) => StatusCode::BAD_REQUEST,
            OrderError::NotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::Storage(_) | OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::InvalidItem { .. } => "INVALID_ITEM",
            OrderError::InvalidPricing { .. } => "INVALID_PRICING",
            OrderError::InvalidFilter { .. } => "INVALID_FILTER",
            OrderError::InvalidDate { .. } => "INVALID_DATE",
            OrderError::Validation(_) => "VALIDATION_ERROR",
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::Storage(_) => "STORAGE_ERROR",
            OrderError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            OrderError::NotFound { id } => Some(serde_json::json!({ "id": id })),
            OrderError::InvalidItem { position, .. } => {
                Some(serde_json::json!({ "position": position }))
            }
            OrderError::InvalidFilter { field, .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            OrderError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation failure
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

/// Errors raised while checking the shape of a request body
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields failed validation
    FieldErrors(Vec<FieldValidationError>),

    /// The body is not valid JSON for the expected payload
    InvalidJson { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let fields: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation failed: {}", fields.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldValidationError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        // HashMap iteration order is arbitrary
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for OrderError {
    fn from(errors: validator::ValidationErrors) -> Self {
        OrderError::Validation(errors.into())
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the order store
#[derive(Debug)]
pub enum StorageError {
    /// A query against the store failed
    QueryError { operation: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QueryError { operation, message } => {
                write!(f, "Storage {} failed: {}", operation, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for OrderError {
    fn from(err: StorageError) -> Self {
        OrderError::Storage(err)
    }
}

impl StorageError {
    /// Wrap an opaque backend error raised by `operation`
    pub fn query(operation: &str, err: anyhow::Error) -> Self {
        StorageError::QueryError {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for order operations
pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_invalid_item_display_includes_position() {
        let err = OrderError::invalid_item(2, "name is required");
        assert_eq!(err.to_string(), "Item at index 2: name is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_ITEM");
    }

    #[test]
    fn test_not_found_status_and_details() {
        let id = Uuid::nil();
        let err = OrderError::not_found(id);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let response = err.to_response();
        assert_eq!(response.code, "ORDER_NOT_FOUND");
        assert_eq!(response.details.unwrap()["id"], id.to_string());
    }

    #[test]
    fn test_pricing_and_date_errors_are_bad_requests() {
        assert_eq!(
            OrderError::InvalidPricing { total: 0.0 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OrderError::invalid_date("2025-13-01", "not a calendar day").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OrderError::invalid_filter("limit", "must be between 1 and 100").error_code(),
            "INVALID_FILTER"
        );
    }

    #[test]
    fn test_backend_errors_are_server_errors() {
        let err: OrderError =
            StorageError::query("insert", anyhow::anyhow!("memory store poisoned")).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.to_string().contains("memory"));

        let err = OrderError::Internal("Failed to generate sales report".to_string());
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "customer_name".to_string(),
                message: "required".to_string(),
            },
            FieldValidationError {
                field: "customer_email".to_string(),
                message: "invalid format".to_string(),
            },
        ]);
        let display = err.to_string();
        assert!(display.contains("customer_name"));
        assert!(display.contains("customer_email"));

        let response = OrderError::from(err).to_response();
        assert_eq!(response.code, "VALIDATION_ERROR");
        assert!(response.details.is_some());
    }
}
