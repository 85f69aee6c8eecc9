// ABOUTME: Google Gemini LLM provider implementation over the Generative Language REST API
// ABOUTME: Sends system instructions with JSON-mode output for technique categorization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Gemini Provider
//!
//! [`LlmProvider`] for Google's Gemini models. The API key comes from
//! `GEMINI_API_KEY` through [`LlmConfig`].

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessageRole};
use crate::config::LlmConfig;
use crate::errors::{AppError, ErrorCode};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// MIME type that switches Gemini into JSON output
const JSON_MIME_TYPE: &str = "application/json";

const SERVICE: &str = "Gemini";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_owned),
            parts: vec![Part {
                text: Some(text.to_owned()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    candidate_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Google Gemini LLM provider
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    default_model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a provider with an API key and the default model
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            default_model: DEFAULT_MODEL.to_owned(),
            base_url: API_BASE_URL.to_owned(),
        }
    }

    /// Create a provider from loaded configuration
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        let provider = Self::new(config.api_key.clone());
        match &config.model {
            Some(model) => provider.with_default_model(model.clone()),
            None => provider,
        }
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Point the provider at a different API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent?key={}",
            self.base_url, self.api_key
        )
    }

    /// Gemini takes system text as a separate instruction; the rest are user turns
    fn build_body(request: &ChatRequest) -> GenerateContentRequest {
        let (system, conversation): (Vec<&ChatMessage>, Vec<&ChatMessage>) = request
            .messages
            .iter()
            .partition(|message| message.role == MessageRole::System);

        let system_instruction = (!system.is_empty()).then(|| {
            let joined = system
                .iter()
                .map(|message| message.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            Content::text(None, &joined)
        });

        GenerateContentRequest {
            contents: conversation
                .into_iter()
                .map(|message| Content::text(Some("user"), &message.content))
                .collect(),
            system_instruction,
            generation_config: GenerationConfig {
                candidate_count: 1,
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request.json_response.then_some(JSON_MIME_TYPE),
            },
        }
    }

    fn first_candidate_text(response: &GenerateContentResponse) -> Result<String, AppError> {
        let text: String = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .ok_or_else(|| AppError::external_service(SERVICE, "No candidates in response"))?;

        if text.trim().is_empty() {
            return Err(AppError::external_service(SERVICE, "Empty text in response"));
        }
        Ok(text)
    }

    /// Map an HTTP error status to an error code
    fn map_api_error(status: u16, body: &str) -> AppError {
        let message = serde_json::from_str::<GenerateContentResponse>(body)
            .ok()
            .and_then(|response| response.error)
            .map_or_else(|| body.to_owned(), |error| error.message);

        match status {
            429 => AppError::new(ErrorCode::ExternalRateLimited, quota_message(&message)),
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("Gemini rejected the API key: {message}"),
            ),
            500..=599 => AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("Gemini API unavailable ({status}): {message}"),
            ),
            _ => AppError::external_service(SERVICE, format!("API error ({status}): {message}")),
        }
    }
}

/// Turn "Please retry in 6.4s" into a whole number of seconds
fn quota_message(message: &str) -> String {
    const PREFIX: &str = "Please retry in ";
    let seconds = message.find(PREFIX).and_then(|position| {
        let rest = &message[position + PREFIX.len()..];
        rest.find('s')
            .and_then(|end| rest[..end].parse::<f64>().ok())
    });
    seconds.map_or_else(
        || "Gemini quota exceeded".to_owned(),
        |seconds| {
            format!(
                "Gemini quota exceeded, retry in {} seconds",
                seconds.ceil() as u64
            )
        },
    )
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::json_capable()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        debug!(messages = request.messages.len(), "Sending Gemini request");

        let response = self
            .client
            .post(self.endpoint(model))
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| {
                AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("Gemini request failed: {e}"),
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(SERVICE, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response");
            AppError::external_service(SERVICE, format!("Failed to parse response: {e}"))
        })?;
        if let Some(error) = &parsed.error {
            return Err(AppError::external_service(
                SERVICE,
                format!("API error: {}", error.message),
            ));
        }

        let content = Self::first_candidate_text(&parsed)?;
        let total_tokens = parsed
            .usage_metadata
            .as_ref()
            .and_then(|usage| usage.total_token_count);
        debug!(total_tokens, "Received Gemini response");

        Ok(ChatResponse {
            content,
            model: model.to_owned(),
            total_tokens,
        })
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("default_model", &self.default_model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
