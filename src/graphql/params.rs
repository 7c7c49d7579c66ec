use crate::errors::AppError;
use async_graphql::Variables;
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Query, Request},
    http::{header::CONTENT_TYPE, HeaderMap, Method},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three GraphQL request parameters, wherever the client put them
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLParams {
    pub query: Option<String>,
    pub operation_name: Option<String>,
    /// Either a JSON object or, for query strings and form bodies, the
    /// JSON-encoded string the client sent.
    pub variables: Option<Value>,
}

/// Params sent as text fields: query strings and form bodies
#[derive(Default)]
struct TextParams {
    query: Option<String>,
    operation_name: Option<String>,
    variables: Option<String>,
}

impl TextParams {
    /// Repeated keys keep their first value
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "query" => &mut params.query,
                "operationName" => &mut params.operation_name,
                "variables" => &mut params.variables,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        params
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonParams {
    query: Option<String>,
    operation_name: Option<String>,
    variables: Option<Value>,
}

impl From<TextParams> for GraphQLParams {
    fn from(params: TextParams) -> Self {
        Self {
            query: params.query,
            operation_name: params.operation_name,
            variables: params.variables.map(Value::String),
        }
    }
}

impl From<JsonParams> for GraphQLParams {
    fn from(params: JsonParams) -> Self {
        Self {
            query: params.query,
            operation_name: params.operation_name,
            variables: params.variables,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl GraphQLParams {
    /// The query document, if one was sent and it is not blank
    pub fn query(&self) -> Option<&str> {
        non_empty(&self.query)
    }

    pub fn operation_name(&self) -> Option<&str> {
        non_empty(&self.operation_name)
    }

    /// Decode `variables` into the map handed to the executor.
    ///
    /// Missing, blank, `null` and `{}` all mean "no variables". Strings are
    /// decoded as JSON first; whatever comes out has to be an object.
    pub fn variables(&self) -> Result<Option<Variables>, AppError> {
        let value = match &self.variables {
            None => return Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(Value::String(s)) => serde_json::from_str::<Value>(s)
                .map_err(|e| AppError::InvalidVariables(e.to_string()))?,
            Some(value) => value.clone(),
        };

        match value {
            Value::Null => Ok(None),
            Value::Object(ref map) if map.is_empty() => Ok(None),
            Value::Object(_) => Ok(Some(Variables::from_json(value))),
            other => Err(AppError::InvalidVariables(format!(
                "expected an object, got `{}`",
                other
            ))),
        }
    }

    /// `variables` as pretty JSON text, for pre-filling the console editor
    pub fn variables_text(&self) -> Option<String> {
        match &self.variables {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(
                serde_json::from_str::<Value>(s)
                    .and_then(|v| serde_json::to_string_pretty(&v))
                    .unwrap_or_else(|_| s.clone()),
            ),
            Some(value) => serde_json::to_string_pretty(value).ok(),
        }
    }
}

/// Essence (`type/subtype`, lower-cased, no parameters) of the `Content-Type`
pub(crate) fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .map(|mime| mime.essence_str().to_ascii_lowercase())
}

fn rejection(rejection: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(rejection.to_string())
}

#[async_trait]
impl<S> FromRequest<S> for GraphQLParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.method() == Method::GET {
            let Query(pairs) =
                Query::<Vec<(String, String)>>::try_from_uri(req.uri()).map_err(rejection)?;
            return Ok(TextParams::from_pairs(pairs).into());
        }

        if req.method() != Method::POST {
            return Ok(Self::default());
        }

        match content_type(req.headers()).as_deref() {
            Some("application/graphql") => {
                let query = String::from_request(req, state)
                    .await
                    .map_err(rejection)?;

                Ok(Self {
                    query: Some(query),
                    ..Default::default()
                })
            }
            Some("application/json") => {
                let Json(params) = Json::<JsonParams>::from_request(req, state)
                    .await
                    .map_err(rejection)?;
                Ok(params.into())
            }
            Some("application/x-www-form-urlencoded") => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(rejection)?;
                Ok(TextParams::from_pairs(pairs).into())
            }
            Some("multipart/form-data") => {
                let mut multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(rejection)?;
                let mut params = Self::default();

                while let Some(field) = multipart.next_field().await.map_err(rejection)? {
                    let name = field.name().map(str::to_owned);
                    match name.as_deref() {
                        Some("query") => params.query = Some(field.text().await.map_err(rejection)?),
                        Some("operationName") => {
                            params.operation_name = Some(field.text().await.map_err(rejection)?)
                        }
                        Some("variables") => {
                            params.variables =
                                Some(Value::String(field.text().await.map_err(rejection)?))
                        }
                        _ => {}
                    }
                }

                Ok(params)
            }
            _ => Ok(Self::default()),
        }
    }
}
