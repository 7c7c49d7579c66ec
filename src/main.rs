use std::{net::SocketAddr, time::Duration};

use async_graphql::Data;
use axum::{
    http::{header, Method, Request},
    Router,
};
use axum_graphql_view::{
    config::CONFIG,
    graphql::{self, query::RequestMeta},
    logger, routes, GraphQLView,
};
use tokio::net::TcpListener;
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::{Any, CorsLayer},
    sensitive_headers::SetSensitiveHeadersLayer,
    trace::TraceLayer,
};

use tracing::Span;

/// Create the app: setup everything and returns a `Router`
fn create_app() -> Router {
    logger::setup(&CONFIG.rust_log);

    let view = GraphQLView::new(graphql::build_schema())
        .environment(CONFIG.environment())
        .enable_graphiql(CONFIG.enable_graphiql)
        .context_factory(|headers| {
            let mut data = Data::default();
            data.insert(RequestMeta::from_headers(headers));
            Ok(data)
        })
        .error_handler(|error, params| {
            tracing::warn!(
                operation = ?params.operation_name(),
                path = ?error.path,
                "{}",
                error.message
            );
        });

    Router::new()
        .merge(view.router(&CONFIG.graphql_path))
        .fallback(routes::page_404)
        // Mark the `Authorization` request header as sensitive so it doesn't
        // show in logs.
        .layer(SetSensitiveHeadersLayer::new(std::iter::once(
            header::AUTHORIZATION,
        )))
        // Use a layer for `TraceLayer`
        .layer(
            TraceLayer::new_for_http()
                .on_request(|request: &Request<_>, _span: &Span| {
                    tracing::info!("{} {}", request.method(), request.uri());
                })
                .on_failure(
                    |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                        tracing::error!("{} | {} s", error, latency.as_secs());
                    },
                ),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([Method::OPTIONS, Method::GET, Method::POST])
                .allow_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_origin(Any),
        )
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let app = create_app();
    let host = &CONFIG.allowed_host;

    let addr = match host.parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(e) => {
            panic!("`{}` {}", host, e);
        }
    };

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Can't bind {}: {}", addr, e);
            return;
        }
    };
    tracing::info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
