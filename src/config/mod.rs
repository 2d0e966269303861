//! Environment-driven node configuration

use anyhow::{anyhow, Context, Result};
use std::env;

/// Default inference provider API base (OpenAI-compatible)
const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1";

/// Default vision model for image description
const DEFAULT_VISION_MODEL: &str = "llama-3.2-90b-vision-preview";

/// Default text model for PII analysis
const DEFAULT_TEXT_MODEL: &str = "llama-3.2-3b-preview";

/// Connection settings for the hosted inference provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_url: String,
    pub api_key: String,
    pub vision_model: String,
    pub text_model: String,
    pub request_timeout_secs: u64,
}

/// Top-level node configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub port: u16,
    pub provider: ProviderConfig,
}

impl NodeConfig {
    /// Read configuration from the environment
    ///
    /// `GROQ_API_KEY` is required; everything else has defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GROQ_API_KEY")
            .map_err(|_| anyhow!("GROQ_API_KEY environment variable is not set"))?;

        let api_url = env::var("GROQ_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let vision_model =
            env::var("VISION_MODEL").unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string());
        let text_model = env::var("TEXT_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string());

        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(120);

        Ok(Self {
            port,
            provider: ProviderConfig {
                api_url,
                api_key,
                vision_model,
                text_model,
                request_timeout_secs,
            },
        })
    }
}
