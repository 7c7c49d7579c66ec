use config::ConfigError;
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize)]
/// App config
pub struct Configuration {
    /// Level of Rust logging
    #[serde(default = "default_rust_log")]
    pub rust_log: String,

    /// Host URL
    #[serde(default = "default_allowed_host")]
    pub allowed_host: String,

    /// Deployment environment. `development` and `test` reveal error messages
    #[serde(default)]
    pub environment: String,

    /// Serve the GraphiQL console to browsers
    #[serde(default = "default_enable_graphiql")]
    pub enable_graphiql: bool,

    /// Path where the GraphQL view is mounted
    #[serde(default = "default_graphql_path")]
    pub graphql_path: String,
}

fn default_rust_log() -> String {
    "info".to_string()
}

fn default_allowed_host() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_enable_graphiql() -> bool {
    true
}

fn default_graphql_path() -> String {
    "/graphql".to_string()
}

impl Configuration {
    /// A new configuration read from the env
    pub fn new() -> Result<Self, ConfigError> {
        let builder = config::Config::builder().add_source(config::Environment::default());

        builder.build()?.try_deserialize()
    }

    /// The parsed `environment` value
    pub fn environment(&self) -> Environment {
        Environment::from(self.environment.as_str())
    }
}

lazy_static! {
    pub static ref CONFIG: Configuration = Configuration::new().expect("Config can be loaded");
}

/// Only the `ENVIRONMENT` key, so a bad value elsewhere can't hide it
#[derive(Deserialize)]
struct EnvironmentOnly {
    #[serde(default)]
    environment: String,
}

/// Where the app is running. Decides whether real error messages reach clients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    #[default]
    Live,
}

impl Environment {
    /// Read `ENVIRONMENT` from the process environment right now, without
    /// going through the cached `CONFIG`.
    pub fn from_env() -> Self {
        let environment = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .and_then(|config| config.try_deserialize::<EnvironmentOnly>());

        match environment {
            Ok(only) => Environment::from(only.environment.as_str()),
            Err(e) => {
                tracing::warn!("Can't read ENVIRONMENT, masking errors: {}", e);
                Environment::Live
            }
        }
    }

    /// Development and test environments pass error messages through unmasked
    pub fn reveals_errors(&self) -> bool {
        matches!(self, Environment::Development | Environment::Test)
    }
}

impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        match value {
            "development" => Environment::Development,
            "test" => Environment::Test,
            _ => Environment::Live,
        }
    }
}
