// ABOUTME: Integration tests for the model-backed technique categorizer
// ABOUTME: Uses an in-process mock provider to check request shape, parsing and failure handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use strikelog::categorizer::LlmTechniqueCategorizer;
use strikelog::errors::{AppError, ErrorCode};
use strikelog::intelligence::{SkipReason, TechniqueCategorizer};
use strikelog::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessageRole};
use strikelog::models::Category;

use common::{create_test_engine, init_test_logging, reps_combo};

/// Provider that replays a canned answer and records every request
struct MockProvider {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    fn answering(content: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(content.to_owned()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_owned()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::json_capable()
    }

    fn default_model(&self) -> &str {
        "mock-1"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(content) => Ok(ChatResponse {
                content: content.clone(),
                model: "mock-1".to_owned(),
                total_tokens: None,
            }),
            Err(message) => Err(AppError::external_service("mock", message.clone())),
        }
    }
}

#[tokio::test]
async fn test_request_carries_prompt_and_names() {
    let provider = MockProvider::answering(
        r#"[{"name":"Tornado Kick","category":"Kicks","confidence":0.9}]"#,
    );
    let categorizer = LlmTechniqueCategorizer::new(provider.clone()).with_model("mock-2");

    let results = categorizer
        .categorize(&["Tornado Kick".to_owned()])
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].category, "Kicks");

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.model.as_deref(), Some("mock-2"));
    assert!(request.json_response);
    assert_eq!(request.messages[0].role, MessageRole::System);
    assert!(request.messages[1].content.contains("Tornado Kick"));
}

#[tokio::test]
async fn test_empty_input_skips_the_provider() {
    let provider = MockProvider::answering("[]");
    let categorizer = LlmTechniqueCategorizer::new(provider.clone());

    assert!(categorizer.categorize(&[]).await.unwrap().is_empty());
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_fenced_answer_credits_xp() {
    init_test_logging();
    let provider = MockProvider::answering(
        "Sure!\n```json\n[{\"name\":\"Tornado Kick\",\"category\":\"kicks\",\"confidence\":0.88}]\n```",
    );
    let categorizer = LlmTechniqueCategorizer::new(provider.clone());
    let engine = create_test_engine();

    let report = engine
        .attribute(&[reps_combo(&["Jab", "Tornado Kick"], 1)], &categorizer)
        .await;
    assert_eq!(report.category_xp.get(Category::Kicks), 120);
    assert_eq!(report.category_xp.get(Category::Punches), 88);
    // Only the unknown name is sent
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn test_provider_error_is_reported() {
    init_test_logging();
    let provider = MockProvider::failing("quota exceeded");
    let categorizer = LlmTechniqueCategorizer::new(provider);

    let error = categorizer
        .categorize(&["Tornado Kick".to_owned()])
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);

    let report = create_test_engine()
        .attribute(&[reps_combo(&["Tornado Kick"], 1)], &categorizer)
        .await;
    assert!(report.category_xp.is_empty());
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::CategorizerFailed { .. }
    ));
}

#[tokio::test]
async fn test_prose_answer_is_invalid_format() {
    let categorizer = LlmTechniqueCategorizer::new(MockProvider::answering("No idea, sorry."));
    let error = categorizer
        .categorize(&["Mystery Move".to_owned()])
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidFormat);
}
