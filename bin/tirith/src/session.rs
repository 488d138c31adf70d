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

//! Drives one chart's navigator: interactively on real timers, or from a
//! script on the virtual timeline.

use crate::render;
use crate::script::{event_for, parse_script, Step};
use anyhow::Result;
use tirith_core::{Effect, NavEvent, Navigator, RenderPlan, Timeline};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    fn print(&self, plan: &RenderPlan) -> Result<()> {
        match self {
            Output::Text => print!("{}", render::plan(plan)),
            Output::Json => println!("{}", serde_json::to_string(plan)?),
        }
        Ok(())
    }
}

fn report(notices: &[Effect]) {
    for notice in notices {
        if let Effect::Selected { name, drillable } = notice {
            info!(name = %name, drillable, "item selected");
        }
    }
}

enum Input {
    Line(String),
    Timer(NavEvent),
    Closed,
}

/// Reads commands from stdin. Timer effects become sleeping tasks that feed
/// their event back into the same loop, so the navigator sees one ordered
/// stream of events.
pub async fn explore(mut navigator: Navigator, output: Output) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Input>();

    let stdin_tx = tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if stdin_tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = stdin_tx.send(Input::Closed);
    });

    let mut timers_in_flight = 0usize;
    let mut closing = false;
    output.print(&navigator.render_plan())?;

    while let Some(input) = rx.recv().await {
        let event = match input {
            Input::Line(line) if line.trim().is_empty() => continue,
            Input::Line(line) => match line.parse::<Step>() {
                Ok(Step::Quit) => break,
                Ok(Step::Show) => {
                    output.print(&navigator.render_plan())?;
                    continue;
                }
                Ok(Step::Wait(duration)) => {
                    tokio::time::sleep(duration).await;
                    continue;
                }
                Ok(step) => match event_for(&navigator, &step) {
                    Some(event) => event,
                    None => continue,
                },
                Err(e) => {
                    warn!(error = %e, "ignored input");
                    continue;
                }
            },
            Input::Timer(event) => {
                timers_in_flight = timers_in_flight.saturating_sub(1);
                event
            }
            Input::Closed => {
                closing = true;
                if timers_in_flight == 0 {
                    break;
                }
                continue;
            }
        };

        let before = navigator.state().phase().kind();
        let effects = navigator.dispatch(event);
        for effect in effects {
            match effect {
                Effect::Schedule { after, event } => {
                    timers_in_flight += 1;
                    let timer_tx = tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let _ = timer_tx.send(Input::Timer(event));
                    });
                }
                notice @ Effect::Selected { .. } => report(&[notice]),
            }
        }
        if navigator.state().phase().kind() != before || navigator.state().phase().is_idle() {
            output.print(&navigator.render_plan())?;
        }
        if closing && timers_in_flight == 0 {
            break;
        }
    }
    debug!("explore loop finished");
    Ok(())
}

/// Runs a script against the virtual clock; `wait` advances it without
/// sleeping.
pub fn replay(mut navigator: Navigator, source: &str, output: Output) -> Result<()> {
    let steps = parse_script(source)?;
    let mut timeline = Timeline::new();
    output.print(&navigator.render_plan())?;

    for step in &steps {
        match step {
            Step::Quit => break,
            Step::Show => output.print(&navigator.render_plan())?,
            Step::Wait(duration) => {
                let notices = timeline.advance(&mut navigator, *duration);
                report(&notices);
                debug!(now_ms = timeline.now().as_millis() as u64, "clock advanced");
            }
            step => {
                if let Some(event) = event_for(&navigator, step) {
                    let notices = timeline.dispatch(&mut navigator, event);
                    report(&notices);
                }
            }
        }
    }
    let notices = timeline.settle(&mut navigator);
    report(&notices);
    info!(
        steps = steps.len(),
        elapsed_ms = timeline.now().as_millis() as u64,
        "replay finished"
    );
    output.print(&navigator.render_plan())
}
