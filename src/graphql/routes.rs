use super::{params::GraphQLParams, view::GraphQLView};
use crate::errors::AppError;
use async_graphql::Executor;
use axum::{
    extract::{Extension, Query},
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use std::{collections::HashMap, sync::Arc};

pub async fn graphql_get<E: Executor>(
    Extension(view): Extension<Arc<GraphQLView<E>>>,
    Query(args): Query<HashMap<String, String>>,
    headers: HeaderMap,
    params: GraphQLParams,
) -> Result<Response, AppError> {
    view.get(&params, &headers, args.contains_key("raw")).await
}

pub async fn graphql_post<E: Executor>(
    Extension(view): Extension<Arc<GraphQLView<E>>>,
    headers: HeaderMap,
    params: GraphQLParams,
) -> Result<Response, AppError> {
    view.post(&params, &headers).await
}

impl<E: Executor> GraphQLView<E> {
    /// Mount the view at `path`. `GET` and `POST` are routed to it, other
    /// methods get a 405.
    pub fn router(self, path: &str) -> Router {
        Router::new()
            .route(path, get(graphql_get::<E>).post(graphql_post::<E>))
            .layer(Extension(Arc::new(self)))
    }
}
