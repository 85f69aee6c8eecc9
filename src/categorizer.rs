// ABOUTME: Generative-model categorizer for technique names missing from the catalog
// ABOUTME: Prompts an LlmProvider for JSON guesses and parses them into categorizations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Technique Categorizer
//!
//! Adapts any [`LlmProvider`] to the [`TechniqueCategorizer`] contract. The
//! model is asked for a JSON array of `{name, category, confidence}` objects;
//! markdown fences and surrounding prose are tolerated. Whether a guess is
//! confident enough is decided by the attribution engine, not here.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use strikelog_core::constants::categorization::{LLM_MAX_TOKENS, LLM_TEMPERATURE};
use strikelog_intelligence::{Categorization, TechniqueCategorizer};
use tracing::{debug, instrument};

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::prompts::{technique_categorization_prompt, technique_names_message};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

#[derive(Debug, Deserialize)]
struct RawCategorization {
    name: String,
    category: String,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawResponse {
    List(Vec<RawCategorization>),
    Wrapped { results: Vec<RawCategorization> },
    Single(RawCategorization),
}

/// Categorizer backed by a generative model
#[derive(Clone)]
pub struct LlmTechniqueCategorizer {
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
}

impl LlmTechniqueCategorizer {
    /// Wrap a provider, using its default model
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Use a specific model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn build_request(&self, names: &[String]) -> ChatRequest {
        let mut request = ChatRequest::new(vec![
            ChatMessage::system(technique_categorization_prompt()),
            ChatMessage::user(technique_names_message(names)),
        ])
        .with_temperature(LLM_TEMPERATURE)
        .with_max_tokens(LLM_MAX_TOKENS);
        if self.provider.capabilities().supports_json_mode() {
            request = request.with_json_response();
        }
        match &self.model {
            Some(model) => request.with_model(model.clone()),
            None => request,
        }
    }
}

impl fmt::Debug for LlmTechniqueCategorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmTechniqueCategorizer")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl TechniqueCategorizer for LlmTechniqueCategorizer {
    fn name(&self) -> &'static str {
        self.provider.name()
    }

    #[instrument(skip(self, names), fields(provider = self.provider.name(), count = names.len()))]
    async fn categorize(&self, names: &[String]) -> AppResult<Vec<Categorization>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let response = self.provider.complete(&self.build_request(names)).await?;
        let results = parse_categorizations(&response.content)?;
        debug!(returned = results.len(), "Categorizer response parsed");
        Ok(results)
    }
}

/// Parse a model answer into categorizations
///
/// Entries with a blank name or a confidence outside `[0, 1]` are dropped.
///
/// # Errors
///
/// Returns an `InvalidFormat` error if no JSON document can be found
pub fn parse_categorizations(content: &str) -> AppResult<Vec<Categorization>> {
    let body = extract_json(content).ok_or_else(|| {
        AppError::new(
            ErrorCode::InvalidFormat,
            "Categorizer response contained no JSON document",
        )
    })?;
    let parsed: RawResponse = serde_json::from_str(body).map_err(|e| {
        AppError::new(
            ErrorCode::InvalidFormat,
            format!("Categorizer response was not valid categorization JSON: {e}"),
        )
        .with_source(e)
    })?;
    let raw = match parsed {
        RawResponse::List(items) | RawResponse::Wrapped { results: items } => items,
        RawResponse::Single(item) => vec![item],
    };
    Ok(raw
        .into_iter()
        .filter(|item| {
            let keep = !item.name.trim().is_empty()
                && item.confidence.is_finite()
                && (0.0..=1.0).contains(&item.confidence);
            if !keep {
                debug!(name = %item.name, confidence = item.confidence, "Dropping malformed categorization");
            }
            keep
        })
        .map(|item| Categorization::new(item.name, item.category.trim(), item.confidence))
        .collect())
}

/// Locate the JSON array or object inside a response, skipping fences and prose
fn extract_json(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map_or(trimmed, |rest| rest.trim_end().trim_end_matches("```"))
        .trim();

    let array = unfenced.find('[').zip(unfenced.rfind(']'));
    let object = unfenced.find('{').zip(unfenced.rfind('}'));
    let (start, end) = match (array, object) {
        (Some(a), Some(o)) => {
            if a.0 < o.0 {
                a
            } else {
                o
            }
        }
        (Some(a), None) => a,
        (None, Some(o)) => o,
        (None, None) => return None,
    };
    (start < end).then(|| &unfenced[start..=end])
}
