//! Typed configuration.
//!
//! [`ClientOptions`] is the constructor-time surface of the client: locale,
//! retry and queue tuning, progress. [`Config`] carries credentials and
//! process settings and is only read from the environment by the binary.

pub mod options;

pub use options::{ClientOptions, QueueOptions, RetryOptions};

use crate::error::{Error, Result};
use secrecy::SecretString;

pub const DEFAULT_API_URL: &str = "https://api.contentful.com";
pub const DEFAULT_ENVIRONMENT: &str = "master";

#[derive(Debug)]
pub struct Config {
    pub space_id: String,
    pub access_token: SecretString,
    pub environment: String,
    pub api_url: String,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            space_id: required_var("CONTENTFUL_SPACE")?,
            access_token: SecretString::from(required_var("CONTENTFUL_MANAGEMENT_ACCESS_TOKEN")?),
            environment: std::env::var("CONTENTFUL_ENVIRONMENT")
                .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string()),
            api_url: std::env::var("CONTENTFUL_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}
