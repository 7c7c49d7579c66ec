use super::{
    format::{format_execution_result, FormattedResult},
    graphiql,
    negotiate::request_wants_html,
    params::GraphQLParams,
    result::{default_result_class, ResultClass},
};
use crate::{config::Environment, errors::AppError};
use async_graphql::{Data, Executor, Request, ServerError};
use axum::{
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Called once per error of an execution, with the request's params
pub type ErrorHandler = Arc<dyn Fn(&ServerError, &GraphQLParams) + Send + Sync>;

/// Builds the data every resolver can read through `Context::data`
pub type ContextFactory = Arc<dyn Fn(&HeaderMap) -> Result<Data, AppError> + Send + Sync>;

/// A GraphQL schema mounted as an HTTP view.
///
/// ```no_run
/// use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
/// use axum_graphql_view::GraphQLView;
///
/// struct Query;
///
/// #[Object]
/// impl Query {
///     async fn debug(&self) -> &'static str {
///         "Hi from GraphQL"
///     }
/// }
///
/// let schema = Schema::new(Query, EmptyMutation, EmptySubscription);
/// let app: axum::Router = GraphQLView::new(schema)
///     .enable_graphiql(false)
///     .router("/graphql");
/// ```
pub struct GraphQLView<E> {
    schema: E,
    error_handler: Option<ErrorHandler>,
    result_class: ResultClass,
    enable_graphiql: bool,
    context_factory: Option<ContextFactory>,
    environment: Environment,
}

impl<E: Executor> GraphQLView<E> {
    pub fn new(schema: E) -> Self {
        Self {
            schema,
            error_handler: None,
            result_class: default_result_class(),
            enable_graphiql: true,
            context_factory: None,
            environment: Environment::from_env(),
        }
    }

    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ServerError, &GraphQLParams) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Replace the JSON response built for results
    pub fn result_class<F>(mut self, result_class: F) -> Self
    where
        F: Fn(Option<FormattedResult>) -> Response + Send + Sync + 'static,
    {
        self.result_class = Arc::new(result_class);
        self
    }

    pub fn enable_graphiql(mut self, enable: bool) -> Self {
        self.enable_graphiql = enable;
        self
    }

    pub fn context_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&HeaderMap) -> Result<Data, AppError> + Send + Sync + 'static,
    {
        self.context_factory = Some(Arc::new(factory));
        self
    }

    /// Override the environment read from `ENVIRONMENT` at construction
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Are we *allowed* to display the console? `raw` asks for JSON anyway.
    pub fn can_display_graphiql(&self, raw: bool) -> bool {
        self.enable_graphiql && !raw
    }

    /// Should we show the console for this request?
    pub fn should_display_graphiql(&self, raw: bool, headers: &HeaderMap) -> bool {
        self.can_display_graphiql(raw) && request_wants_html(headers)
    }

    pub fn context(&self, headers: &HeaderMap) -> Result<Option<Data>, AppError> {
        match &self.context_factory {
            Some(factory) => factory(headers).map(Some),
            None => Ok(None),
        }
    }

    fn track_errors(&self, errors: &[ServerError], params: &GraphQLParams) {
        for error in errors {
            tracing::debug!(path = ?error.path, "GraphQL error: {}", error.message);
        }

        if let Some(handler) = &self.error_handler {
            for error in errors {
                handler(error, params);
            }
        }
    }

    /// Execute the query in `params`, if there is one
    pub async fn handle_request(
        &self,
        params: &GraphQLParams,
        headers: &HeaderMap,
    ) -> Result<Option<FormattedResult>, AppError> {
        let Some(query) = params.query() else {
            return Ok(None);
        };

        let mut request = Request::new(query);
        if let Some(variables) = params.variables()? {
            request = request.variables(variables);
        }
        if let Some(operation_name) = params.operation_name() {
            request = request.operation_name(operation_name);
        }
        if let Some(data) = self.context(headers)? {
            request.data = data;
        }

        tracing::debug!(operation = ?params.operation_name(), "Executing GraphQL query");
        let response = self.schema.execute(request).await;

        if response.is_err() {
            self.track_errors(&response.errors, params);
        }

        Ok(format_execution_result(Some(&response), self.environment))
    }

    /// For displaying the GraphiQL console, and for queries
    pub async fn get(
        &self,
        params: &GraphQLParams,
        headers: &HeaderMap,
        raw: bool,
    ) -> Result<Response, AppError> {
        let result = self.handle_request(params, headers).await?;

        if self.should_display_graphiql(raw, headers) {
            return Ok(graphiql::render(params, result.as_ref()).into_response());
        }

        Ok((self.result_class)(result))
    }

    /// For mutations, and queries sent in a body
    pub async fn post(
        &self,
        params: &GraphQLParams,
        headers: &HeaderMap,
    ) -> Result<Response, AppError> {
        let result = self.handle_request(params, headers).await?;

        Ok((self.result_class)(result))
    }
}
