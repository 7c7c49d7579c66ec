use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// All errors raised by the GraphQL view outside of query execution
#[derive(Debug)]
pub enum AppError {
    /// Generic bad request. It is handled with a message value
    BadRequest(String),
    /// The `variables` parameter is not a JSON object
    InvalidVariables(String),
    /// Not found error
    NotFound(String),
    /// Raised when the view's context factory can't build the execution data
    ContextFactory(String),
}

/// Use `AppError` as response for an endpoint
impl IntoResponse for AppError {
    /// Matches `AppError` into a tuple of status and error message.
    /// The response will be a JSON in the format of:
    /// ```json
    /// { "error": "<message>" }
    /// ```
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(value) => (StatusCode::BAD_REQUEST, value),
            AppError::InvalidVariables(value) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid variables: {}", value),
            ),
            AppError::NotFound(value) => (StatusCode::NOT_FOUND, value),
            AppError::ContextFactory(value) => {
                tracing::error!("Context factory failed: {}", value);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Can't build the request context".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Raise a generic error from a string
impl From<std::string::String> for AppError {
    fn from(error: std::string::String) -> AppError {
        AppError::BadRequest(error)
    }
}
