use crate::graphql::format::client_error;
use async_graphql::{Context, FieldResult, Object};
use axum::http::{header::USER_AGENT, HeaderMap};

/// Request details a context factory can hand to resolvers
#[derive(Clone, Debug, Default)]
pub struct RequestMeta {
    pub user_agent: Option<String>,
}

impl RequestMeta {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            user_agent: headers
                .get(USER_AGENT)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
        }
    }
}

pub struct Query;

#[Object]
impl Query {
    async fn api_version(&self) -> &'static str {
        "1.0"
    }

    async fn debug(&self) -> &'static str {
        "Hi from GraphQL"
    }

    /// Returns the sum of a and b
    async fn add(
        &self,
        #[graphql(desc = "First value")] a: i32,
        #[graphql(desc = "Second value")] b: Option<i32>,
    ) -> i32 {
        match b {
            Some(x) => a + x,
            None => a,
        }
    }

    /// User agent of the request, when the view has a context factory
    async fn user_agent<'ctx>(&self, ctx: &Context<'ctx>) -> Option<String> {
        ctx.data_opt::<RequestMeta>()
            .and_then(|meta| meta.user_agent.clone())
    }

    /// Always fails with an internal error, which is masked outside of
    /// development
    async fn broken(&self) -> Result<String, String> {
        Err("database exploded".to_string())
    }

    /// Validates an email address. Invalid ones fail with a message shown in
    /// every environment.
    async fn check_email(&self, email: String) -> FieldResult<bool> {
        if !email.contains('@') {
            return Err(client_error("Email must contain `@`"));
        }

        Ok(true)
    }
}
