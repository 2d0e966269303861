// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted inference provider client via OpenAI-compatible API

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::ProviderConfig;

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

// --- Errors ---

/// Failure modes of a provider call, kept distinct so the API layer can map
/// each to its own HTTP status
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    #[error("Inference provider unreachable: {0}")]
    Unreachable(String),

    #[error("Inference provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed completion from inference provider: {0}")]
    MalformedCompletion(String),
}

// System instruction for the PII analysis pass. The wording is load-bearing:
// the "No PII Detected" phrase it requests is one of the markers the
// classifier clears the flag on.
const PII_ANALYSIS_INSTRUCTION: &str = "Give me a Output which explains about the text if it has Personally Identifiable Information (PII) give it in the output and write No PII Detected as output";

/// Abstraction over the inference provider so request handlers can be tested
/// without network access
#[async_trait::async_trait]
pub trait InferenceService: Send + Sync {
    /// Generate a natural-language description of a base64 JPEG image
    async fn describe_image(
        &self,
        base64_image: &str,
        prompt: &str,
    ) -> Result<String, InferenceError>;

    /// Run the PII analysis pass over a previously generated description
    async fn analyze_description(&self, description: &str) -> Result<String, InferenceError>;
}

/// Client for a hosted OpenAI-compatible chat completion provider
pub struct InferenceClient {
    client: Client,
    api_url: String,
    api_key: String,
    vision_model: String,
    text_model: String,
}

impl InferenceClient {
    /// Create a new provider client from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let api_url = config.api_url.trim_end_matches('/').to_string();
        debug!(
            "Inference client configured: api_url={}, vision_model={}, text_model={}",
            api_url, config.vision_model, config.text_model
        );

        Ok(Self {
            client,
            api_url,
            api_key: config.api_key.clone(),
            vision_model: config.vision_model.clone(),
            text_model: config.text_model.clone(),
        })
    }

    /// Post a chat completion request and extract the first choice's content
    async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, InferenceError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Provider { status, body });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::MalformedCompletion(e.to_string()))?;

        if let Some(usage) = &chat_response.usage {
            debug!("Chat completion used {} tokens", usage.total_tokens);
        }

        chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| {
                InferenceError::MalformedCompletion("response contained no choices".to_string())
            })
    }
}

#[async_trait::async_trait]
impl InferenceService for InferenceClient {
    async fn describe_image(
        &self,
        base64_image: &str,
        prompt: &str,
    ) -> Result<String, InferenceError> {
        let data_url = format!("data:image/jpeg;base64,{}", base64_image);
        debug!(
            "Requesting image description: model={}, prompt_len={}",
            self.vision_model,
            prompt.len()
        );

        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: serde_json::json!([
                {"type": "text", "text": prompt},
                {"type": "image_url", "image_url": {"url": data_url}}
            ]),
        }];

        self.chat_completion(&self.vision_model, messages).await
    }

    async fn analyze_description(&self, description: &str) -> Result<String, InferenceError> {
        debug!(
            "Requesting PII analysis: model={}, description_len={}",
            self.text_model,
            description.len()
        );

        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: serde_json::Value::String(PII_ANALYSIS_INSTRUCTION.to_string()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: serde_json::Value::String(description.to_string()),
            },
        ];

        self.chat_completion(&self.text_model, messages).await
    }
}
