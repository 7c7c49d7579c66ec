use super::format::FormattedResult;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Turns a formatted result into the HTTP response. Views use `GraphQLResult`
/// unless they are given another one.
pub type ResultClass = Arc<dyn Fn(Option<FormattedResult>) -> Response + Send + Sync>;

/// Default result class: the result as a JSON body, `null` if nothing ran
#[derive(Debug)]
pub struct GraphQLResult(pub Option<FormattedResult>);

impl IntoResponse for GraphQLResult {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

pub(crate) fn default_result_class() -> ResultClass {
    Arc::new(|result| GraphQLResult(result).into_response())
}
