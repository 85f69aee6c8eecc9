// ABOUTME: Shared utilities used across services
// ABOUTME: Currently bounded retry and polling helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Bounded retry with exponential backoff and polling with a deadline
pub mod retry;

pub use retry::RetryPolicy;
