use std::sync::{Arc, Mutex};

use async_graphql::Data;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use axum_graphql_view::{
    graphql::{build_schema, query::RequestMeta, AppSchema},
    routes, Environment, GraphQLView, MASKED_ERROR_MESSAGE,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn view() -> GraphQLView<AppSchema> {
    GraphQLView::new(build_schema()).environment(Environment::Live)
}

fn app(view: GraphQLView<AppSchema>) -> Router {
    view.router("/graphql").fallback(routes::page_404)
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn get(uri: &str, accept: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::ACCEPT, accept)
        .body(Body::empty())
        .unwrap()
}

fn post(content_type: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/graphql")
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn get_query_as_json() {
    let response = send(
        app(view()),
        get("/graphql?query=%7Bdebug%7D", "application/json"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        body_json(response).await,
        json!({ "data": { "debug": "Hi from GraphQL" } })
    );
}

#[tokio::test]
async fn get_from_browser_renders_graphiql() {
    let response = send(
        app(view()),
        get(
            "/graphql?query=%7Bdebug%7D",
            "text/html,application/xhtml+xml,*/*;q=0.8",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let page = body_text(response).await;
    assert!(page.contains("graphiql.min.js"));
    assert!(page.contains("Hi from GraphQL"));
}

#[tokio::test]
async fn raw_forces_json_for_browsers() {
    let response = send(
        app(view()),
        get("/graphql?query=%7Bdebug%7D&raw", "text/html"),
    )
    .await;

    assert_eq!(
        body_json(response).await,
        json!({ "data": { "debug": "Hi from GraphQL" } })
    );
}

#[tokio::test]
async fn repeated_query_parameter_uses_first() {
    let response = send(
        app(view()),
        get(
            "/graphql?query=%7Bdebug%7D&query=%7BapiVersion%7D",
            "application/json",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "data": { "debug": "Hi from GraphQL" } })
    );
}

#[tokio::test]
async fn disabled_graphiql_answers_json() {
    let response = send(
        app(view().enable_graphiql(false)),
        get("/graphql?query=%7Bdebug%7D", "text/html"),
    )
    .await;

    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn empty_get_is_null() {
    let response = send(app(view()), get("/graphql", "application/json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "null");
}

#[tokio::test]
async fn empty_get_from_browser_shows_blank_console() {
    let response = send(app(view()), get("/graphql", "text/html")).await;

    let page = body_text(response).await;
    assert!(page.contains("var initialResponse = null;"));
}

#[tokio::test]
async fn post_json_with_variables() {
    let body = json!({
        "query": "mutation Echo($message: String!) { echo(message: $message) }",
        "operationName": "Echo",
        "variables": { "message": "hello" }
    });
    let response = send(app(view()), post("application/json", body.to_string())).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "data": { "echo": "hello" } }));
}

#[tokio::test]
async fn post_json_with_string_variables() {
    let body = json!({
        "query": "query Sum($a: Int!) { add(a: $a) }",
        "variables": "{\"a\": 5}"
    });
    let response = send(app(view()), post("application/json", body.to_string())).await;

    assert_eq!(body_json(response).await, json!({ "data": { "add": 5 } }));
}

#[tokio::test]
async fn post_raw_graphql() {
    let response = send(app(view()), post("application/graphql", "{ apiVersion }")).await;

    assert_eq!(
        body_json(response).await,
        json!({ "data": { "apiVersion": "1.0" } })
    );
}

#[tokio::test]
async fn post_form() {
    let response = send(
        app(view()),
        post(
            "application/x-www-form-urlencoded",
            "query=query+Sum%28%24a%3A+Int%21%29+%7B+add%28a%3A+%24a%2C+b%3A+1%29+%7D&variables=%7B%22a%22%3A+1%7D",
        ),
    )
    .await;

    assert_eq!(body_json(response).await, json!({ "data": { "add": 2 } }));
}

#[tokio::test]
async fn post_multipart() {
    let body = "--BOUNDARY\r\n\
        Content-Disposition: form-data; name=\"query\"\r\n\r\n\
        { debug }\r\n\
        --BOUNDARY--\r\n";
    let response = send(
        app(view()),
        post("multipart/form-data; boundary=BOUNDARY", body),
    )
    .await;

    assert_eq!(
        body_json(response).await,
        json!({ "data": { "debug": "Hi from GraphQL" } })
    );
}

#[tokio::test]
async fn post_never_renders_graphiql() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/graphql")
        .header(header::ACCEPT, "text/html")
        .body(Body::from("{ debug }"))
        .unwrap();
    let response = send(app(view()), request).await;

    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn unsupported_content_type_executes_nothing() {
    let response = send(app(view()), post("text/plain", "{ debug }")).await;

    assert_eq!(body_text(response).await, "null");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let response = send(app(view()), post("application/json", "{ nope")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn invalid_variables_are_bad_request() {
    let response = send(
        app(view()),
        get(
            "/graphql?query=%7Bdebug%7D&variables=%5B1%5D",
            "application/json",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/graphql")
        .body(Body::empty())
        .unwrap();
    let response = send(app(view()), request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let response = send(app(view()), get("/nope", "application/json")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "No route for /nope" })
    );
}

#[tokio::test]
async fn internal_errors_are_masked_live() {
    let response = send(app(view()), post("application/graphql", "{ broken }")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "errors": [{ "message": MASKED_ERROR_MESSAGE }] })
    );
}

#[tokio::test]
async fn internal_errors_are_revealed_in_development() {
    let response = send(
        app(view().environment(Environment::Development)),
        post("application/graphql", "{ broken }"),
    )
    .await;

    assert_eq!(
        body_json(response).await,
        json!({
            "errors": [{
                "message": "database exploded",
                "locations": [{ "line": 1, "column": 3 }]
            }]
        })
    );
}

#[tokio::test]
async fn client_errors_are_shown_live() {
    let response = send(
        app(view()),
        post(
            "application/graphql",
            "{ checkEmail(email: \"nobody\") }",
        ),
    )
    .await;

    assert_eq!(
        body_json(response).await,
        json!({ "errors": [{ "message": "Email must contain `@`" }] })
    );
}

#[tokio::test]
async fn syntax_errors_are_shown_live() {
    let response = send(app(view()), post("application/graphql", "{ debug")).await;

    let body = body_json(response).await;
    let message = body["errors"][0]["message"].as_str().unwrap();
    assert_ne!(message, MASKED_ERROR_MESSAGE);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn error_handler_gets_params() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let view = view().error_handler(move |error, params| {
        sink.lock()
            .unwrap()
            .push((error.message.clone(), params.operation_name.clone()));
    });
    let body = json!({ "query": "query Boom { broken }", "operationName": "Boom" });

    send(app(view), post("application/json", body.to_string())).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![("database exploded".to_string(), Some("Boom".to_string()))]
    );
}

#[tokio::test]
async fn context_factory_sees_request_headers() {
    let view = view().context_factory(|headers| {
        let mut data = Data::default();
        data.insert(RequestMeta::from_headers(headers));
        Ok(data)
    });
    let request = Request::builder()
        .uri("/graphql?query=%7BuserAgent%7D")
        .header(header::USER_AGENT, "integration/0.1")
        .body(Body::empty())
        .unwrap();
    let response = send(app(view), request).await;

    assert_eq!(
        body_json(response).await,
        json!({ "data": { "userAgent": "integration/0.1" } })
    );
}

#[tokio::test]
async fn failing_context_factory_is_server_error() {
    let view = view().context_factory(|_| {
        Err(axum_graphql_view::AppError::ContextFactory(
            "session store down".to_string(),
        ))
    });
    let response = send(app(view), get("/graphql?query=%7Bdebug%7D", "application/json")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Can't build the request context" })
    );
}
