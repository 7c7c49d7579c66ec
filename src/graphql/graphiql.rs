use super::{format::FormattedResult, params::GraphQLParams};
use axum::response::Html;

const TEMPLATE: &str = include_str!("graphiql.html");

/// A JS literal (string or `null`) that is safe inside a `<script>` element and
/// can't contain one of the template's `{{...}}` markers.
fn js_literal(value: Option<&str>) -> String {
    let mut out = String::new();
    // A string literal always serialises
    for c in serde_json::to_string(&value).unwrap_or_else(|_| "null".to_string()).chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '{' => out.push_str("\\u007b"),
            '}' => out.push_str("\\u007d"),
            c => out.push(c),
        }
    }
    out
}

/// GraphiQL page pre-filled with the request and, if one ran, its result
pub fn render(params: &GraphQLParams, result: Option<&FormattedResult>) -> Html<String> {
    let result = result.and_then(|result| serde_json::to_string_pretty(result).ok());

    let page = TEMPLATE
        .replace("{{QUERY}}", &js_literal(params.query.as_deref()))
        .replace("{{VARIABLES}}", &js_literal(params.variables_text().as_deref()))
        .replace(
            "{{OPERATION_NAME}}",
            &js_literal(params.operation_name.as_deref()),
        )
        .replace("{{RESULT}}", &js_literal(result.as_deref()));

    Html(page)
}
