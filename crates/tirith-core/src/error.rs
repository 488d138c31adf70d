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
pub enum DashboardError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse catalog YAML: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Failed to read catalog file '{path}': {source}")]
    CatalogFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Catalog contains no categories")]
    EmptyCatalog,
    #[error("Duplicate category id found: '{id}'")]
    DuplicateCategory { id: String },
    #[error("Duplicate metric id found: '{id}' (in '{first}' and '{second}')")]
    DuplicateMetric {
        id: String,
        first: String,
        second: String,
    },
    #[error("Category id '{id}' is reserved")]
    ReservedCategoryId { id: String },
    #[error("Metric '{metric}' in category '{category}' has no data series")]
    MissingSeries { category: String, metric: String },
}
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage file '{path}' is not a JSON object: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON serialisation failed: {0}")]
    Serialisation(#[from] serde_json::Error),
    #[error("Storage lock poisoned")]
    Poisoned,
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse configuration TOML: {source}")]
    TomlParseError {
        #[from]
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {field} = {value}")]
    InvalidValue { field: String, value: String },
    #[error("Missing required configuration: {field}")]
    MissingRequiredConfig { field: String },
}
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("expected '#rrggbb', got '{0}'")]
    BadFormat(String),
}
pub type Result<T> = std::result::Result<T, DashboardError>;
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
pub type StorageResult<T> = std::result::Result<T, StorageError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
impl DashboardError {
    pub fn category(&self) -> &'static str {
        match self {
            DashboardError::Catalog(_) => "Catalog",
            DashboardError::Config(_) => "Configuration",
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Catalog(CatalogError::EmptyCatalog) => {
                "The metric catalog is empty. Add at least one category.".to_string()
            }
            DashboardError::Catalog(CatalogError::CatalogFileError { path, .. }) => {
                format!("Unable to load the metric catalog from '{path}'.")
            }
            _ => self.to_string(),
        }
    }
}
