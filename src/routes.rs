use crate::errors::AppError;
use axum::{http::Uri, response::IntoResponse};

/// Fallback for every path no view is mounted at
pub async fn page_404(uri: Uri) -> impl IntoResponse {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
