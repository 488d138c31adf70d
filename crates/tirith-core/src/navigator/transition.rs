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

//! The navigator's transition function.
//!
//! `transition` never sleeps. Timed steps come back as [`Effect::Schedule`]
//! carrying a [`NavEvent::Timer`]; the driver feeds that event back once the
//! delay has passed. Timers are stamped with the state's epoch and a reset
//! bumps the epoch, so a timer armed before a reset is dropped on arrival.

use super::state::{AnimationMode, NavigationFrame, NavigatorState, PendingStep, Phase};
use crate::model::{ChartConfig, ChartKind, DataNode};
use crate::palette::{self, Color};
use std::mem;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    pub exit_delay: Duration,
    pub settle_delay: Duration,
    pub explode_delay: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            exit_delay: Duration::from_millis(300),
            settle_delay: Duration::from_millis(50),
            explode_delay: Duration::from_millis(450),
        }
    }
}

impl TransitionTiming {
    pub fn immediate() -> Self {
        Self {
            exit_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
            explode_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    /// Upstream selection changed; load an unrelated view without animating.
    Reset {
        data: Vec<DataNode>,
        config: ChartConfig,
    },
    /// Renderer click callback. `index` is set for positionally indexed kinds.
    Click {
        node: DataNode,
        index: Option<usize>,
        color: Option<Color>,
    },
    Drill {
        node: DataNode,
        color: Option<Color>,
    },
    Back,
    ToggleSeries(String),
    Timer(Timer),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    pub epoch: u64,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerKind {
    ExitElapsed,
    SettleElapsed,
    ExplodeElapsed {
        node: DataNode,
        color: Option<Color>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Schedule { after: Duration, event: NavEvent },
    /// A data item was clicked; hosts may react (the navigator already has).
    Selected { name: String, drillable: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: NavigatorState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: NavigatorState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
    fn with_effect(state: NavigatorState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}

pub fn transition(
    state: NavigatorState,
    event: NavEvent,
    timing: &TransitionTiming,
) -> Transition {
    match event {
        NavEvent::Reset { data, config } => reset(state, data, config),
        NavEvent::Click { node, index, color } => click(state, node, index, color, timing),
        NavEvent::Drill { node, color } => {
            if !state.accepts_navigation() {
                debug!(node = node.name(), "drill ignored, transition in flight");
                return Transition::unchanged(state);
            }
            begin_drill(state, node, color, timing)
        }
        NavEvent::Back => back(state, timing),
        NavEvent::ToggleSeries(name) => toggle_series(state, name),
        NavEvent::Timer(timer) => {
            if timer.epoch != state.epoch {
                debug!(
                    timer_epoch = timer.epoch,
                    epoch = state.epoch,
                    "stale timer dropped"
                );
                return Transition::unchanged(state);
            }
            match timer.kind {
                TimerKind::ExitElapsed => exit_elapsed(state, timing),
                TimerKind::SettleElapsed => settle_elapsed(state),
                TimerKind::ExplodeElapsed { node, color } => {
                    explode_elapsed(state, node, color, timing)
                }
            }
        }
    }
}

fn schedule(state: &NavigatorState, after: Duration, kind: TimerKind) -> Effect {
    Effect::Schedule {
        after,
        event: NavEvent::Timer(Timer {
            epoch: state.epoch,
            kind,
        }),
    }
}

fn reset(mut state: NavigatorState, data: Vec<DataNode>, config: ChartConfig) -> Transition {
    state.data = data;
    state.config = config;
    state.history.clear();
    state.seed_color = None;
    state.hidden_series.clear();
    state.active_index = None;
    state.phase = Phase::Idle;
    state.animation = AnimationMode::Fade;
    state.epoch = state.epoch.wrapping_add(1);
    Transition::unchanged(state)
}

fn click(
    mut state: NavigatorState,
    node: DataNode,
    index: Option<usize>,
    color: Option<Color>,
    timing: &TransitionTiming,
) -> Transition {
    let selected = Effect::Selected {
        name: node.name().to_string(),
        drillable: node.is_drillable(),
    };
    if !state.accepts_navigation() {
        debug!(node = node.name(), "click ignored, transition in flight");
        return Transition::with_effect(state, selected);
    }
    let color = color.or_else(|| index.map(palette::color_for));

    if state.config.kind == ChartKind::Donut {
        if let Some(index) = index {
            if !node.is_drillable() {
                return Transition::with_effect(state, selected);
            }
            state.active_index = Some(index);
            let timer = schedule(
                &state,
                timing.explode_delay,
                TimerKind::ExplodeElapsed { node, color },
            );
            return Transition {
                state,
                effects: vec![selected, timer],
            };
        }
    }

    let mut next = begin_drill(state, node, color, timing);
    next.effects.insert(0, selected);
    next
}

fn begin_drill(
    mut state: NavigatorState,
    node: DataNode,
    color: Option<Color>,
    timing: &TransitionTiming,
) -> Transition {
    if !node.is_drillable() {
        debug!(node = node.name(), "drill ignored, node has no children");
        return Transition::unchanged(state);
    }
    state.animation = if state.config.kind == ChartKind::Donut {
        AnimationMode::Morph
    } else {
        AnimationMode::Zoom
    };
    let title = node.name().to_string();
    state.phase = Phase::Exiting(PendingStep::Drill {
        title,
        children: node.into_children(),
        seed_color: color,
    });
    let timer = schedule(&state, timing.exit_delay, TimerKind::ExitElapsed);
    Transition::with_effect(state, timer)
}

fn back(mut state: NavigatorState, timing: &TransitionTiming) -> Transition {
    if !state.can_go_back() {
        debug!("back ignored, history is empty");
        return Transition::unchanged(state);
    }
    if !state.accepts_navigation() {
        debug!("back ignored, transition in flight");
        return Transition::unchanged(state);
    }
    state.animation = AnimationMode::Fade;
    state.phase = Phase::Exiting(PendingStep::Back);
    let timer = schedule(&state, timing.exit_delay, TimerKind::ExitElapsed);
    Transition::with_effect(state, timer)
}

fn toggle_series(mut state: NavigatorState, name: String) -> Transition {
    if name.is_empty() {
        return Transition::unchanged(state);
    }
    if !state.hidden_series.remove(&name) {
        state.hidden_series.insert(name);
    }
    Transition::unchanged(state)
}

fn exit_elapsed(mut state: NavigatorState, timing: &TransitionTiming) -> Transition {
    let step = match mem::take(&mut state.phase) {
        Phase::Exiting(step) => step,
        other => {
            state.phase = other;
            return Transition::unchanged(state);
        }
    };
    match step {
        PendingStep::Drill {
            title,
            children,
            seed_color,
        } => {
            let parent = NavigationFrame {
                config: state.config.clone(),
                data: mem::replace(&mut state.data, children),
                title: Some(title),
                seed_color: state.seed_color,
            };
            state.history.push(parent);
            state.seed_color = seed_color;
            if state.config.kind == ChartKind::Donut {
                state.config = ChartConfig::new(ChartKind::Bar);
            }
        }
        PendingStep::Back => {
            if let Some(frame) = state.history.pop() {
                state.config = frame.config;
                state.data = frame.data;
                state.seed_color = frame.seed_color;
            }
        }
    }
    state.hidden_series.clear();
    state.active_index = None;
    state.phase = Phase::Entering;
    let timer = schedule(&state, timing.settle_delay, TimerKind::SettleElapsed);
    Transition::with_effect(state, timer)
}

fn settle_elapsed(mut state: NavigatorState) -> Transition {
    if state.phase == Phase::Entering {
        state.phase = Phase::Idle;
    }
    Transition::unchanged(state)
}

fn explode_elapsed(
    state: NavigatorState,
    node: DataNode,
    color: Option<Color>,
    timing: &TransitionTiming,
) -> Transition {
    if !state.phase.is_idle() || state.active_index.is_none() {
        return Transition::unchanged(state);
    }
    begin_drill(state, node, color, timing)
}
