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

//! Top-level dashboard state: which category is showing, which metrics are
//! starred, and one navigator per visible chart.

use crate::catalog::{Catalog, Category};
use crate::favorites::FavoritesStore;
use crate::model::{ChartConfig, DataNode, MetricMetadata};
use crate::navigator::{Effect, NavEvent, Navigator, TransitionTiming};
use crate::recommender::recommend;
use crate::storage::StoragePort;
use indexmap::IndexMap;
use tracing::{debug, info};

pub const FAVORITES_ID: &str = "favorites";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Category(String),
    Favorites,
}

impl Selection {
    pub fn id(&self) -> &str {
        match self {
            Selection::Category(id) => id,
            Selection::Favorites => FAVORITES_ID,
        }
    }
}

/// A favorited metric with the category that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavoriteItem<'a> {
    pub metric: &'a MetricMetadata,
    pub category_name: &'a str,
    pub data: &'a [DataNode],
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard<'a> {
    pub metric: &'a MetricMetadata,
    pub data: &'a [DataNode],
    /// Set only in the favorites view, where cards come from many categories.
    pub category_name: Option<&'a str>,
    pub config: ChartConfig,
    pub is_favorite: bool,
    pub wide: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView<'a> {
    Category {
        category: &'a Category,
        cards: Vec<MetricCard<'a>>,
    },
    Favorites {
        cards: Vec<MetricCard<'a>>,
    },
    FavoritesEmpty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightPanel {
    pub insight: Option<String>,
    pub strategy: Option<String>,
}

impl InsightPanel {
    pub fn is_empty(&self) -> bool {
        self.insight.is_none() && self.strategy.is_none()
    }
}

pub struct Dashboard<P: StoragePort> {
    catalog: Catalog,
    favorites: FavoritesStore<P>,
    selection: Selection,
    navigators: IndexMap<String, Navigator>,
    timing: TransitionTiming,
    panel: InsightPanel,
}

impl<P: StoragePort> Dashboard<P> {
    pub fn new(catalog: Catalog, favorites: FavoritesStore<P>, timing: TransitionTiming) -> Self {
        let selection = Selection::Category(catalog.first().id.clone());
        let mut dashboard = Self {
            catalog,
            favorites,
            selection,
            navigators: IndexMap::new(),
            timing,
            panel: InsightPanel::default(),
        };
        dashboard.reset_navigators();
        dashboard
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
    pub fn favorites(&self) -> &FavoritesStore<P> {
        &self.favorites
    }
    pub fn selection(&self) -> &Selection {
        &self.selection
    }
    pub fn is_favorites_view(&self) -> bool {
        self.selection == Selection::Favorites
    }
    /// The selected real category; `None` in the favorites view.
    pub fn active_category(&self) -> Option<&Category> {
        match &self.selection {
            Selection::Category(id) => self.catalog.get(id),
            Selection::Favorites => None,
        }
    }

    /// Unknown ids fall back to the first category.
    pub fn select(&mut self, id: &str) {
        self.selection = if id == FAVORITES_ID {
            Selection::Favorites
        } else if self.catalog.get(id).is_some() {
            Selection::Category(id.to_string())
        } else {
            debug!(id, "unknown category, falling back to the first one");
            Selection::Category(self.catalog.first().id.clone())
        };
        info!(selection = self.selection.id(), "category selected");
        self.panel = InsightPanel::default();
        self.reset_navigators();
    }

    pub fn toggle_favorite(&mut self, metric_id: &str) -> bool {
        let now_favorite = self.favorites.toggle(metric_id);
        info!(metric_id, now_favorite, "favorite toggled");
        if self.is_favorites_view() {
            self.sync_favorite_navigators();
        }
        now_favorite
    }

    pub fn favorite_items(&self) -> Vec<FavoriteItem<'_>> {
        let mut items = Vec::new();
        for category in self.catalog.categories() {
            for metric in &category.metrics {
                if self.favorites.contains(&metric.id) {
                    items.push(FavoriteItem {
                        metric,
                        category_name: &category.name,
                        data: category.series(&metric.id),
                    });
                }
            }
        }
        items
    }

    pub fn view(&self) -> DashboardView<'_> {
        match &self.selection {
            Selection::Favorites => {
                let cards: Vec<_> = self
                    .favorite_items()
                    .into_iter()
                    .map(|item| self.card(item.metric, item.data, Some(item.category_name)))
                    .collect();
                if cards.is_empty() {
                    DashboardView::FavoritesEmpty
                } else {
                    DashboardView::Favorites { cards }
                }
            }
            Selection::Category(id) => {
                let category = self.catalog.get(id).unwrap_or_else(|| self.catalog.first());
                let cards = category
                    .metrics
                    .iter()
                    .map(|metric| self.card(metric, category.series(&metric.id), None))
                    .collect();
                DashboardView::Category { category, cards }
            }
        }
    }

    pub fn navigator(&self, metric_id: &str) -> Option<&Navigator> {
        self.navigators.get(metric_id)
    }
    pub fn navigators(&self) -> impl Iterator<Item = (&str, &Navigator)> {
        self.navigators.iter().map(|(id, nav)| (id.as_str(), nav))
    }
    /// Routes an event to the navigator of a visible chart.
    pub fn dispatch(&mut self, metric_id: &str, event: NavEvent) -> Option<Vec<Effect>> {
        self.navigators
            .get_mut(metric_id)
            .map(|navigator| navigator.dispatch(event))
    }

    pub fn insights_enabled(&self) -> bool {
        !self.is_favorites_view()
    }
    pub fn insight_panel(&self) -> &InsightPanel {
        &self.panel
    }
    pub fn set_insight(&mut self, text: String) {
        self.panel.insight = Some(text);
    }
    pub fn set_strategy(&mut self, text: String) {
        self.panel.strategy = Some(text);
    }

    fn card<'a>(
        &'a self,
        metric: &'a MetricMetadata,
        data: &'a [DataNode],
        category_name: Option<&'a str>,
    ) -> MetricCard<'a> {
        MetricCard {
            metric,
            data,
            category_name,
            config: recommend(metric),
            is_favorite: self.favorites.contains(&metric.id),
            wide: metric.is_wide(),
        }
    }

    fn visible_series(&self) -> Vec<(String, Vec<DataNode>, ChartConfig)> {
        let cards = match self.view() {
            DashboardView::Category { cards, .. } | DashboardView::Favorites { cards } => cards,
            DashboardView::FavoritesEmpty => Vec::new(),
        };
        cards
            .into_iter()
            .map(|card| (card.metric.id.clone(), card.data.to_vec(), card.config))
            .collect()
    }

    fn reset_navigators(&mut self) {
        let visible = self.visible_series();
        let mut navigators = IndexMap::with_capacity(visible.len());
        for (metric_id, data, config) in visible {
            let mut navigator = self
                .navigators
                .swap_remove(&metric_id)
                .unwrap_or_else(|| {
                    Navigator::with_timing(Vec::new(), config.clone(), self.timing)
                });
            navigator.reset(data, config);
            navigators.insert(metric_id, navigator);
        }
        self.navigators = navigators;
    }

    fn sync_favorite_navigators(&mut self) {
        let visible = self.visible_series();
        let mut navigators = IndexMap::with_capacity(visible.len());
        for (metric_id, data, config) in visible {
            let navigator = self
                .navigators
                .swap_remove(&metric_id)
                .unwrap_or_else(|| Navigator::with_timing(data, config, self.timing));
            navigators.insert(metric_id, navigator);
        }
        self.navigators = navigators;
    }
}
