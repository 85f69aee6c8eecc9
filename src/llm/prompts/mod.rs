// ABOUTME: Prompts for LLM interactions loaded at compile time
// ABOUTME: Provides the technique categorization instruction and the per-request user message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! Prompt text lives in markdown files next to this module and is embedded at
//! compile time.

use serde_json::Value;
use strikelog_core::models::Category;

/// System instruction for categorizing unknown technique names
pub const TECHNIQUE_CATEGORIZATION_PROMPT: &str = include_str!("technique_categorization.md");

/// System instruction with the list of valid categories appended
#[must_use]
pub fn technique_categorization_prompt() -> String {
    let categories = Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{TECHNIQUE_CATEGORIZATION_PROMPT}\nValid categories: {categories}\n")
}

/// User message listing the names to categorize, one JSON string per line
#[must_use]
pub fn technique_names_message(names: &[String]) -> String {
    let listed = names
        .iter()
        .map(|name| Value::String(name.clone()).to_string())
        .collect::<Vec<_>>()
        .join("\n");
    format!("Categorize these technique names:\n{listed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_category() {
        let prompt = technique_categorization_prompt();
        for category in Category::ALL {
            assert!(prompt.contains(category.as_str()));
        }
    }

    #[test]
    fn test_names_are_quoted() {
        let message = technique_names_message(&["Tornado \"Kick\"".to_owned()]);
        assert!(message.contains(r#""Tornado \"Kick\"""#));
    }
}
