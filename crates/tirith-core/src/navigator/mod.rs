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

pub mod render;
pub mod state;
pub mod transition;

pub use render::{RenderItem, RenderPlan, SeriesState};
pub use state::{AnimationMode, NavigationFrame, NavigatorState, PendingStep, Phase, PhaseKind};
pub use transition::{transition, Effect, NavEvent, Timer, TimerKind, Transition, TransitionTiming};

use crate::model::{ChartConfig, DataNode};

/// Owns one chart's navigator state and applies events to it in place.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: NavigatorState,
    timing: TransitionTiming,
}

impl Navigator {
    pub fn new(data: Vec<DataNode>, config: ChartConfig) -> Self {
        Self::with_timing(data, config, TransitionTiming::default())
    }
    pub fn with_timing(data: Vec<DataNode>, config: ChartConfig, timing: TransitionTiming) -> Self {
        Self {
            state: NavigatorState::new(data, config),
            timing,
        }
    }
    pub fn state(&self) -> &NavigatorState {
        &self.state
    }
    pub fn timing(&self) -> &TransitionTiming {
        &self.timing
    }
    pub fn dispatch(&mut self, event: NavEvent) -> Vec<Effect> {
        let current = std::mem::take(&mut self.state);
        let Transition { state, effects } = transition(current, event, &self.timing);
        self.state = state;
        effects
    }
    pub fn reset(&mut self, data: Vec<DataNode>, config: ChartConfig) {
        self.dispatch(NavEvent::Reset { data, config });
    }
    pub fn render_plan(&self) -> RenderPlan {
        self.state.render_plan()
    }
}
