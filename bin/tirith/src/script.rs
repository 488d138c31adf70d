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

//! Line commands understood by `explore` and `replay`.

use anyhow::{anyhow, bail, Context, Result};
use std::str::FromStr;
use std::time::Duration;
use tirith_core::{color_for, NavEvent, Navigator};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Chart click on the named item, as a renderer would report it.
    Click(String),
    Drill(String),
    Back,
    Toggle(String),
    Wait(Duration),
    Show,
    Quit,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let needs_name = |step: fn(String) -> Step| {
            if rest.is_empty() {
                Err(anyhow!("'{word}' needs a name"))
            } else {
                Ok(step(rest.to_string()))
            }
        };
        match word {
            "click" => needs_name(Step::Click),
            "drill" => needs_name(Step::Drill),
            "toggle" => needs_name(Step::Toggle),
            "back" => Ok(Step::Back),
            "show" => Ok(Step::Show),
            "quit" | "exit" => Ok(Step::Quit),
            "wait" => {
                let ms = rest.trim_end_matches("ms");
                let ms: u64 = ms
                    .parse()
                    .with_context(|| format!("'wait' expects milliseconds, got '{rest}'"))?;
                Ok(Step::Wait(Duration::from_millis(ms)))
            }
            other => bail!("unknown command '{other}'"),
        }
    }
}

/// Parses a script, skipping blank lines and `#` comments. Errors name the
/// offending line.
pub fn parse_script(source: &str) -> Result<Vec<Step>> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(number, line)| {
            line.parse::<Step>()
                .with_context(|| format!("line {}", number + 1))
        })
        .collect()
}

/// Turns a step into the navigator event a renderer would send. Names are
/// looked up in the current view.
pub fn event_for(navigator: &Navigator, step: &Step) -> Option<NavEvent> {
    let find = |name: &str| {
        let found = navigator
            .state()
            .data()
            .iter()
            .enumerate()
            .find(|(_, node)| node.name() == name)
            .map(|(index, node)| (index, node.clone()));
        if found.is_none() {
            warn!(name, "no item with that name in the current view");
        }
        found
    };
    match step {
        Step::Click(name) => find(name).map(|(index, node)| NavEvent::Click {
            node,
            index: Some(index),
            color: None,
        }),
        Step::Drill(name) => find(name).map(|(index, node)| NavEvent::Drill {
            node,
            color: Some(color_for(index)),
        }),
        Step::Back => Some(NavEvent::Back),
        Step::Toggle(name) => Some(NavEvent::ToggleSeries(name.clone())),
        Step::Wait(_) | Step::Show | Step::Quit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tirith_core::{ChartConfig, ChartKind, DataNode};

    #[test]
    fn test_parse_script() {
        let steps = parse_script(
            "# drill into electronics\nclick Electronics\n\n\
             wait 450ms\nwait 350\ntoggle Previous\nback\n",
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Click("Electronics".into()),
                Step::Wait(Duration::from_millis(450)),
                Step::Wait(Duration::from_millis(350)),
                Step::Toggle("Previous".into()),
                Step::Back,
            ]
        );
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        let err = parse_script("back\nhop\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2");
        assert!("drill".parse::<Step>().is_err());
        assert!("wait soon".parse::<Step>().is_err());
    }

    #[test]
    fn test_click_carries_index() {
        let navigator = Navigator::new(
            vec![
                DataNode::leaf("A", 1.0),
                DataNode::branch("Multi Word", 2.0, vec![DataNode::leaf("x", 1.0)]),
            ],
            ChartConfig::new(ChartKind::Donut),
        );
        let event = event_for(&navigator, &"click Multi Word".parse().unwrap()).unwrap();
        assert!(matches!(event, NavEvent::Click { index: Some(1), .. }));
        assert!(event_for(&navigator, &Step::Drill("missing".into())).is_none());
    }
}
