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

//! Fast insight and deep strategy requests for one category, with the
//! fixed fallback texts shown when the generator fails.

use crate::client::{GeminiClient, GenerationRequest, TextGenerator};
use crate::error::InsightResult;
use crate::prompts::{category_context, deep_strategy_template, fast_insight_template};
use std::sync::atomic::{AtomicBool, Ordering};
use tirith_core::{Category, InsightConfig};
use tracing::{debug, info, warn};

pub const MISSING_KEY_MESSAGE: &str =
    "Please provide a Gemini API key in the environment to use AI features.";
pub const FAST_FALLBACK: &str =
    "Unable to generate insights at this time. Please check your API key.";
pub const DEEP_FALLBACK: &str = "Unable to generate strategy.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightKind {
    /// Short bullet-point analysis on the low-latency model.
    Fast,
    /// Weakest-metric roadmap on the reasoning model.
    Deep,
}

impl InsightKind {
    pub fn fallback(&self) -> &'static str {
        match self {
            InsightKind::Fast => FAST_FALLBACK,
            InsightKind::Deep => DEEP_FALLBACK,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Fast => "fast",
            InsightKind::Deep => "deep",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightReply {
    Generated(String),
    Fallback(String),
    MissingKey(String),
}

impl InsightReply {
    pub fn text(&self) -> &str {
        match self {
            InsightReply::Generated(text)
            | InsightReply::Fallback(text)
            | InsightReply::MissingKey(text) => text,
        }
    }
    pub fn into_text(self) -> String {
        match self {
            InsightReply::Generated(text)
            | InsightReply::Fallback(text)
            | InsightReply::MissingKey(text) => text,
        }
    }
    pub fn is_generated(&self) -> bool {
        matches!(self, InsightReply::Generated(_))
    }
}

/// Clears its flag on drop, so a request that errors or is cancelled
/// still frees its kind.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct InsightService<G: TextGenerator> {
    generator: Option<G>,
    config: InsightConfig,
    fast_busy: AtomicBool,
    deep_busy: AtomicBool,
}

impl InsightService<GeminiClient> {
    /// Builds a Gemini-backed service from the key found in the environment.
    /// No key leaves the service unconfigured rather than failing.
    pub fn from_config(config: InsightConfig) -> InsightResult<Self> {
        let generator = match config.api_key() {
            Some(key) => Some(GeminiClient::from_config(&config, key)?),
            None => {
                debug!(vars = ?config.api_key_env, "no API key in environment");
                None
            }
        };
        Ok(Self::new(generator, config))
    }
}

impl<G: TextGenerator> InsightService<G> {
    pub fn new(generator: Option<G>, config: InsightConfig) -> Self {
        Self {
            generator,
            config,
            fast_busy: AtomicBool::new(false),
            deep_busy: AtomicBool::new(false),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn is_busy(&self, kind: InsightKind) -> bool {
        self.flag(kind).load(Ordering::Acquire)
    }

    /// `None` while a request of the same kind is already in flight.
    pub async fn request(&self, kind: InsightKind, category: &Category) -> Option<InsightReply> {
        let Some(_guard) = BusyGuard::acquire(self.flag(kind)) else {
            debug!(kind = kind.as_str(), "insight request refused, already busy");
            return None;
        };
        let Some(generator) = &self.generator else {
            return Some(InsightReply::MissingKey(MISSING_KEY_MESSAGE.to_string()));
        };

        info!(
            kind = kind.as_str(),
            category = %category.id,
            provider = generator.provider_name(),
            "requesting insight"
        );
        let result = match self.build_request(kind, category) {
            Ok(request) => generator.generate(&request).await,
            Err(e) => Err(e),
        };
        Some(match result {
            Ok(text) => InsightReply::Generated(text),
            Err(e) => {
                warn!(
                    kind = kind.as_str(),
                    category = %category.id,
                    error = %e,
                    error_category = e.category(),
                    transient = e.is_transient(),
                    "insight generation failed"
                );
                InsightReply::Fallback(kind.fallback().to_string())
            }
        })
    }

    pub async fn fast_insight(&self, category: &Category) -> Option<InsightReply> {
        self.request(InsightKind::Fast, category).await
    }

    pub async fn deep_strategy(&self, category: &Category) -> Option<InsightReply> {
        self.request(InsightKind::Deep, category).await
    }

    fn flag(&self, kind: InsightKind) -> &AtomicBool {
        match kind {
            InsightKind::Fast => &self.fast_busy,
            InsightKind::Deep => &self.deep_busy,
        }
    }

    fn build_request(
        &self,
        kind: InsightKind,
        category: &Category,
    ) -> InsightResult<GenerationRequest> {
        match kind {
            InsightKind::Fast => {
                let prompt = fast_insight_template().render(&category_context(category, true)?)?;
                Ok(GenerationRequest::new(&self.config.fast_model, prompt))
            }
            InsightKind::Deep => {
                let prompt = deep_strategy_template().render(&category_context(category, false)?)?;
                Ok(GenerationRequest::new(&self.config.deep_model, prompt)
                    .with_thinking_budget(self.config.thinking_budget))
            }
        }
    }
}
