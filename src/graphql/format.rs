use crate::config::Environment;
use async_graphql::{ErrorExtensions, Response, ServerError, Value};
use serde::Serialize;

/// What clients see instead of an internal error message outside of
/// development and test.
pub const MASKED_ERROR_MESSAGE: &str = "Oops! Something went wrong!";

/// Extension key marking a resolver error as safe to show to clients
const PUBLIC_EXTENSION: &str = "public";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// JSON shape of a single GraphQL error
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormattedError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Location>>,
}

/// JSON shape of an execution result
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FormattedResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FormattedError>>,
}

/// An error a resolver wants the client to read verbatim, in any environment.
///
/// Example:
/// ```
/// use axum_graphql_view::graphql::format::client_error;
///
/// let error = client_error("Email must contain `@`");
/// assert_eq!(error.message, "Email must contain `@`");
/// ```
pub fn client_error(message: impl Into<String>) -> async_graphql::Error {
    async_graphql::Error::new(message).extend_with(|_, e| e.set(PUBLIC_EXTENSION, true))
}

/// Errors raised before any resolver ran (syntax, validation, variable
/// coercion) have no path. Those, and errors built with `client_error`, are
/// safe to pass through.
fn is_client_facing(error: &ServerError) -> bool {
    if error.path.is_empty() {
        return true;
    }

    matches!(
        error
            .extensions
            .as_ref()
            .and_then(|extensions| extensions.get(PUBLIC_EXTENSION)),
        Some(Value::Boolean(true))
    )
}

pub fn format_error(error: &ServerError, env: Environment) -> FormattedError {
    if env.reveals_errors() {
        let locations = (!error.locations.is_empty()).then(|| {
            error
                .locations
                .iter()
                .map(|pos| Location {
                    line: pos.line,
                    column: pos.column,
                })
                .collect()
        });

        return FormattedError {
            message: error.message.clone(),
            locations,
        };
    }

    let message = if is_client_facing(error) {
        error.message.clone()
    } else {
        MASKED_ERROR_MESSAGE.to_string()
    };

    FormattedError {
        message,
        locations: None,
    }
}

/// Transforms the executor's `Response` into a JSON encodable entity. `None`
/// when nothing was executed.
pub fn format_execution_result(
    result: Option<&Response>,
    env: Environment,
) -> Option<FormattedResult> {
    let result = result?;

    let data = match &result.data {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        data => Some(data.clone()),
    };

    let errors = (!result.errors.is_empty()).then(|| {
        result
            .errors
            .iter()
            .map(|error| format_error(error, env))
            .collect()
    });

    Some(FormattedResult { data, errors })
}
