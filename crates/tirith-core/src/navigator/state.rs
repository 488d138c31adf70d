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

use crate::model::{ChartConfig, ChartKind, DataNode};
use crate::palette::Color;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationMode {
    #[default]
    Fade,
    Zoom,
    Morph,
}

/// What happens when the exit delay of the current transition elapses.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingStep {
    Drill {
        title: String,
        children: Vec<DataNode>,
        seed_color: Option<Color>,
    },
    Back,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Exiting(PendingStep),
    Entering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Idle,
    Exiting,
    Entering,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Exiting(_) => PhaseKind::Exiting,
            Phase::Entering => PhaseKind::Entering,
        }
    }
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

/// Snapshot of a parent view, pushed when drilling down.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFrame {
    pub config: ChartConfig,
    pub data: Vec<DataNode>,
    pub title: Option<String>,
    pub seed_color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorState {
    pub(crate) data: Vec<DataNode>,
    pub(crate) config: ChartConfig,
    pub(crate) history: Vec<NavigationFrame>,
    pub(crate) seed_color: Option<Color>,
    pub(crate) phase: Phase,
    pub(crate) hidden_series: BTreeSet<String>,
    pub(crate) animation: AnimationMode,
    pub(crate) active_index: Option<usize>,
    pub(crate) epoch: u64,
}

impl NavigatorState {
    pub fn new(data: Vec<DataNode>, config: ChartConfig) -> Self {
        Self {
            data,
            config,
            history: Vec::new(),
            seed_color: None,
            phase: Phase::Idle,
            hidden_series: BTreeSet::new(),
            animation: AnimationMode::Fade,
            active_index: None,
            epoch: 0,
        }
    }
    pub fn data(&self) -> &[DataNode] {
        &self.data
    }
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }
    pub fn kind(&self) -> ChartKind {
        self.config.kind
    }
    pub fn history(&self) -> &[NavigationFrame] {
        &self.history
    }
    pub fn depth(&self) -> usize {
        self.history.len()
    }
    pub fn seed_color(&self) -> Option<Color> {
        self.seed_color
    }
    pub fn phase(&self) -> &Phase {
        &self.phase
    }
    pub fn hidden_series(&self) -> &BTreeSet<String> {
        &self.hidden_series
    }
    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden_series.contains(name)
    }
    pub fn animation(&self) -> AnimationMode {
        self.animation
    }
    /// Index of the donut slice shown as exploded while its drill is pending.
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
    /// Drill and back requests are only taken while nothing is in flight.
    pub fn accepts_navigation(&self) -> bool {
        self.phase.is_idle() && self.active_index.is_none()
    }
    pub fn breadcrumbs(&self) -> Vec<&str> {
        self.history
            .iter()
            .filter_map(|frame| frame.title.as_deref())
            .collect()
    }
    /// Key under which the renderer must mount the chart; changes on every
    /// drill or back step so entry animations replay.
    pub fn chart_key(&self) -> String {
        format!("chart-{}-{}", self.history.len(), self.config.kind)
    }
}

impl Default for NavigatorState {
    fn default() -> Self {
        Self::new(Vec::new(), ChartConfig::new(ChartKind::Bar))
    }
}
