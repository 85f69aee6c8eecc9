// ABOUTME: LLM provider abstraction layer for pluggable generative model integration
// ABOUTME: Defines the provider contract used to categorize techniques missing from the catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Interface
//!
//! The only generative-model use in Strikelog is guessing the category of a
//! technique name the catalog does not know. Providers implement
//! [`LlmProvider`]; the categorizer in [`crate::categorizer`] builds the
//! prompt and parses the answer.
//!
//! ```rust,no_run
//! use strikelog::llm::{ChatMessage, ChatRequest, GeminiProvider, LlmProvider};
//!
//! async fn example(provider: &GeminiProvider) {
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::system("Answer with JSON."),
//!         ChatMessage::user("Tornado Kick"),
//!     ])
//!     .with_json_response();
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod gemini;
pub mod prompts;

pub use gemini::GeminiProvider;
pub use prompts::technique_categorization_prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

bitflags::bitflags! {
    /// What a provider can do beyond plain text completion
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider can be forced to answer with a JSON document
        const JSON_MODE = 0b0000_0001;
        /// Provider accepts a separate system instruction
        const SYSTEM_MESSAGES = 0b0000_0010;
    }
}

impl LlmCapabilities {
    /// Plain text provider that still honors system messages
    #[must_use]
    pub const fn text_only() -> Self {
        Self::SYSTEM_MESSAGES
    }

    /// Provider with constrained JSON output, such as Gemini
    #[must_use]
    pub const fn json_capable() -> Self {
        Self::JSON_MODE.union(Self::SYSTEM_MESSAGES)
    }

    /// Check if JSON mode is supported
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.contains(Self::JSON_MODE)
    }

    /// Check if system messages are supported
    #[must_use]
    pub const fn supports_system_messages(&self) -> bool {
        self.contains(Self::SYSTEM_MESSAGES)
    }
}

/// Who a message comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions for the model
    System,
    /// The names to categorize
    User,
}

/// A single message in a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender
    pub role: MessageRole,
    /// Text
    pub content: String,
}

impl ChatMessage {
    /// System instruction
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// User message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// One completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Messages in order
    pub messages: Vec<ChatMessage>,
    /// Model override; provider default when `None`
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
    /// Ask the provider for a JSON document instead of prose
    pub json_response: bool,
}

impl ChatRequest {
    /// Request with default sampling settings
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            json_response: false,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request JSON output
    #[must_use]
    pub const fn with_json_response(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// Model answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
    /// Model that answered
    pub model: String,
    /// Tokens billed for the call, when the provider reports them
    pub total_tokens: Option<u32>,
}

/// Generative model backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short identifier used in logs (e.g. "gemini")
    fn name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}
