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

pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod favorites;
pub mod model;
pub mod navigator;
pub mod palette;
pub mod recommender;
pub mod storage;
pub mod timeline;

pub use catalog::{Catalog, Category};
pub use config::{InsightConfig, StorageConfig, TimingConfig, TirithConfig};
pub use dashboard::{
    Dashboard, DashboardView, FavoriteItem, InsightPanel, MetricCard, Selection, FAVORITES_ID,
};
pub use error::{
    CatalogError, ColorError, ConfigError, DashboardError, Result, StorageError,
};
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use model::{
    ChartConfig, ChartFocus, ChartKind, DataNode, Granularity, MetricMetadata, MetricType,
};
pub use navigator::{
    transition, AnimationMode, Effect, NavEvent, NavigationFrame, Navigator, NavigatorState,
    Phase, PhaseKind, RenderPlan, Transition, TransitionTiming,
};
pub use palette::{color_for, Color, Swatch, PALETTE};
pub use recommender::{explain, recommend, RecommendationRule};
pub use storage::{JsonFileStorage, MemoryStorage, StoragePort};
pub use timeline::Timeline;

use std::path::Path;

/// Loads the catalog named by the configuration, or the built-in mock one.
pub fn load_catalog(config: &TirithConfig) -> Result<Catalog> {
    match config.catalog.as_deref() {
        Some(path) => Ok(Catalog::from_yaml_file(path)?),
        None => Ok(Catalog::builtin(config.seed)),
    }
}

/// Builds a dashboard over file-backed favorites at `storage_path`.
pub fn open_dashboard(
    config: &TirithConfig,
    storage_path: Option<&Path>,
) -> Result<Dashboard<JsonFileStorage>> {
    let catalog = load_catalog(config)?;
    let path = storage_path.unwrap_or(config.storage.path.as_path());
    let favorites = FavoritesStore::load(JsonFileStorage::new(path));
    Ok(Dashboard::new(catalog, favorites, config.timing.to_timing()))
}
