#![doc = include_str!("../README.md")]
pub mod config;
pub mod errors;
pub mod graphql;
pub mod logger;
pub mod routes;

pub use crate::config::Environment;
pub use errors::AppError;
pub use graphql::{
    format::{client_error, FormattedError, FormattedResult, MASKED_ERROR_MESSAGE},
    params::GraphQLParams,
    result::GraphQLResult,
    view::GraphQLView,
};
