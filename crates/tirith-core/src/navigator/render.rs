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

use super::state::{AnimationMode, NavigatorState, PhaseKind};
use crate::model::ChartKind;
use crate::palette::{self, Swatch};
use serde::Serialize;

pub const CURRENT_SERIES: &str = "Current";
pub const PREVIOUS_SERIES: &str = "Previous";
pub const VALUE_SERIES: &str = "Value";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub name: String,
    pub value: f64,
    pub prev_value: Option<f64>,
    /// Position in the unfiltered data; colors are keyed on it.
    pub original_index: usize,
    pub swatch: Swatch,
    pub drillable: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesState {
    pub name: String,
    pub hidden: bool,
}

/// Everything a renderer needs to draw the navigator's current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub key: String,
    pub kind: ChartKind,
    pub phase: PhaseKind,
    pub animation: AnimationMode,
    pub items: Vec<RenderItem>,
    pub series: Vec<SeriesState>,
    pub back_available: bool,
    pub breadcrumbs: Vec<String>,
}

impl NavigatorState {
    pub fn render_plan(&self) -> RenderPlan {
        let kind = self.kind();
        let len = self.data.len();
        let items = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, node)| kind != ChartKind::Donut || !self.is_hidden(node.name()))
            .map(|(index, node)| RenderItem {
                name: node.name().to_string(),
                value: node.value(),
                prev_value: node.prev_value(),
                original_index: index,
                swatch: self.swatch_for(index, len),
                drillable: node.is_drillable(),
                active: self.active_index == Some(index),
            })
            .collect();
        RenderPlan {
            key: self.chart_key(),
            kind,
            phase: self.phase.kind(),
            animation: self.animation,
            items,
            series: self.series(),
            back_available: self.can_go_back(),
            breadcrumbs: self.breadcrumbs().into_iter().map(String::from).collect(),
        }
    }

    fn swatch_for(&self, index: usize, len: usize) -> Swatch {
        match self.seed_color {
            Some(seed) => match self.kind() {
                ChartKind::Bar | ChartKind::Bar3d | ChartKind::Treemap => Swatch {
                    color: seed,
                    opacity: palette::shade_opacity(index, len),
                },
                _ => Swatch::solid(seed),
            },
            None => Swatch::solid(palette::color_for(index)),
        }
    }

    /// Legend entries. Donut slices are their own series; line and area have
    /// a current and, when the data carries one, a previous period.
    fn series(&self) -> Vec<SeriesState> {
        let named = |name: &str| SeriesState {
            name: name.to_string(),
            hidden: self.is_hidden(name),
        };
        match self.kind() {
            ChartKind::Donut => self.data.iter().map(|node| named(node.name())).collect(),
            ChartKind::Line | ChartKind::Area => {
                let mut series = vec![named(CURRENT_SERIES)];
                if self.data.first().and_then(|node| node.prev_value()).is_some() {
                    series.push(named(PREVIOUS_SERIES));
                }
                series
            }
            kind if kind.is_cartesian() => vec![named(VALUE_SERIES)],
            _ => Vec::new(),
        }
    }
}
