use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing subscriber logger. `filter` takes `EnvFilter` directives,
/// e.g. `info,axum_graphql_view=debug`.
pub fn setup(filter: &str) {
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_target(false));

    if registry.try_init().is_err() {
        tracing::warn!("A global tracing subscriber is already installed");
    }
}
