// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::error::{InsightError, InsightResult};
use std::collections::HashMap;
use tirith_core::Category;
use tracing::{debug, warn};

pub type PromptContext = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: String,
    pub template: String,
    pub variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            variables: Vec::new(),
        }
    }

    pub fn with_variables(mut self, variables: &[&str]) -> Self {
        self.variables = variables.iter().map(|v| (*v).to_string()).collect();
        self
    }

    /// Substitutes every `{{name}}` placeholder; all declared variables must
    /// be present in `context`.
    pub fn render(&self, context: &PromptContext) -> InsightResult<String> {
        let missing: Vec<&String> = self
            .variables
            .iter()
            .filter(|var| !context.contains_key(*var))
            .collect();
        if !missing.is_empty() {
            return Err(InsightError::Prompt(format!(
                "Missing required variables for template '{}': {missing:?}",
                self.name
            )));
        }

        let mut result = self.template.clone();
        for (key, value) in context {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        if result.contains("{{") && result.contains("}}") {
            warn!(template = %self.name, "prompt contains unsubstituted placeholders");
        }
        debug!(template = %self.name, chars = result.len(), "prompt rendered");
        Ok(result)
    }
}

pub fn fast_insight_template() -> PromptTemplate {
    PromptTemplate::new(
        "fast_insight",
        r"You are an expert business analyst. Analyze the following dashboard data for the category: {{category}}.

Metrics:
{{metrics}}

Data Summary:
{{data}}

Provide 3 bullet points of key insights. Keep it concise and actionable.
Focus on anomalies, trends, or opportunities.",
    )
    .with_variables(&["category", "metrics", "data"])
}

pub fn deep_strategy_template() -> PromptTemplate {
    PromptTemplate::new(
        "deep_strategy",
        r"Create a detailed strategic improvement plan based on the following {{category}} data.
Identify the weakest metric and propose a 3-step roadmap to improve it.

Data:
{{data}}",
    )
    .with_variables(&["category", "data"])
}

/// Fills the variables both templates draw on. `pretty` selects indented
/// JSON for the data snapshot.
pub fn category_context(category: &Category, pretty: bool) -> InsightResult<PromptContext> {
    let data = if pretty {
        serde_json::to_string_pretty(&category.data)?
    } else {
        serde_json::to_string(&category.data)?
    };
    let metrics = category
        .metrics
        .iter()
        .map(|metric| format!("- {}: {}", metric.name, metric.description))
        .collect::<Vec<_>>()
        .join("\n");

    let mut context = PromptContext::new();
    context.insert("category".to_string(), category.name.clone());
    context.insert("metrics".to_string(), metrics);
    context.insert("data".to_string(), data);
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tirith_core::Catalog;

    #[test]
    fn test_fast_prompt_lists_metrics_and_pretty_data() {
        let catalog = Catalog::builtin(1);
        let sales = catalog.get("sales").unwrap();
        let prompt = fast_insight_template()
            .render(&category_context(sales, true).unwrap())
            .unwrap();
        assert!(prompt.contains("for the category: Sales."));
        assert!(prompt.contains("- Revenue Trend: Daily revenue over the last 30 days"));
        assert!(prompt.contains("\"product_mix\": ["));
        assert!(prompt.contains("3 bullet points"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_deep_prompt_uses_compact_data() {
        let catalog = Catalog::builtin(1);
        let inventory = catalog.get("inventory").unwrap();
        let prompt = deep_strategy_template()
            .render(&category_context(inventory, false).unwrap())
            .unwrap();
        assert!(prompt.contains("following Inventory data"));
        assert!(prompt.contains("weakest metric"));
        assert!(prompt.contains(r#"{"stock_levels":[{"name":"WH-Alpha""#));
    }

    #[test]
    fn test_missing_variable_is_rejected() {
        let mut context = PromptContext::new();
        context.insert("category".to_string(), "Sales".to_string());
        let err = deep_strategy_template().render(&context).unwrap_err();
        assert!(matches!(err, InsightError::Prompt(_)));
    }
}
