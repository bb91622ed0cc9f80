use std::env;

use url::Url;

use crate::error::{Result, StreetlightError};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the outreach API, e.g. `http://10.0.0.5:8000`.
    pub api_base: Url,

    /// Vault key the bearer token is stored under.
    pub token_key: String,
}

pub const DEFAULT_TOKEN_KEY: &str = "streetlight_auth_token";

impl Config {
    /// Load configuration from environment variables.
    /// `STREETLIGHT_API_BASE` is required; everything else has defaults.
    pub fn from_env() -> Result<Self> {
        let raw = env::var("STREETLIGHT_API_BASE").map_err(|_| {
            StreetlightError::Config("STREETLIGHT_API_BASE environment variable is required".into())
        })?;
        let api_base = Url::parse(&raw)
            .map_err(|e| StreetlightError::Config(format!("invalid STREETLIGHT_API_BASE: {e}")))?;
        let token_key =
            env::var("STREETLIGHT_TOKEN_KEY").unwrap_or_else(|_| DEFAULT_TOKEN_KEY.to_string());
        Ok(Self { api_base, token_key })
    }

    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}
