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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Serialisation error: {0}")]
    Serialisation(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Timeout error")]
    Timeout,
}

pub type InsightResult<T> = Result<T, InsightError>;

impl InsightError {
    pub fn category(&self) -> &'static str {
        match self {
            InsightError::Configuration(_) => "configuration",
            InsightError::Authentication(_) => "authentication",
            InsightError::RateLimit => "rate_limit",
            InsightError::Network(_) => "network",
            InsightError::Provider(_) => "provider",
            InsightError::Serialisation(_) => "serialisation",
            InsightError::Prompt(_) => "prompt",
            InsightError::Timeout => "timeout",
        }
    }

    /// Whether a later attempt could plausibly succeed unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            InsightError::RateLimit | InsightError::Network(_) | InsightError::Timeout
        )
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::Serialisation(err.to_string())
    }
}

impl From<reqwest::Error> for InsightError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            InsightError::Timeout
        } else if err.is_decode() {
            InsightError::Serialisation(err.to_string())
        } else {
            InsightError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(InsightError::Timeout.is_transient());
        assert!(InsightError::RateLimit.is_transient());
        assert!(!InsightError::Authentication("bad key".into()).is_transient());
        assert_eq!(InsightError::Prompt("x".into()).category(), "prompt");
    }
}
