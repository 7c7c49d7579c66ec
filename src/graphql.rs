pub mod format;
pub mod graphiql;
pub mod mutation;
pub mod negotiate;
pub mod params;
pub mod query;
pub mod result;
pub mod routes;
pub mod view;

use async_graphql::{EmptySubscription, Schema};

/// The example schema served by the binary
pub type AppSchema = Schema<query::Query, mutation::Mutation, EmptySubscription>;

pub fn build_schema() -> AppSchema {
    Schema::build(query::Query, mutation::Mutation, EmptySubscription).finish()
}
