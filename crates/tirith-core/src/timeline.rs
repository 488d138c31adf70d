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

//! Virtual clock for navigator timers. Scheduled events wait in due order
//! and fire when the clock is advanced past them; nothing sleeps.

use crate::navigator::{Effect, NavEvent, Navigator};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    seq: u64,
    queue: BTreeMap<(Duration, u64), NavEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn now(&self) -> Duration {
        self.now
    }
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Queues every `Schedule` effect and hands back the rest.
    pub fn absorb(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        let mut passthrough = Vec::new();
        for effect in effects {
            match effect {
                Effect::Schedule { after, event } => {
                    self.queue.insert((self.now + after, self.seq), event);
                    self.seq += 1;
                }
                other => passthrough.push(other),
            }
        }
        passthrough
    }

    pub fn dispatch(&mut self, navigator: &mut Navigator, event: NavEvent) -> Vec<Effect> {
        let effects = navigator.dispatch(event);
        self.absorb(effects)
    }

    /// Moves the clock forward by `by`, firing every event that falls due,
    /// including events scheduled by the ones fired along the way.
    pub fn advance(&mut self, navigator: &mut Navigator, by: Duration) -> Vec<Effect> {
        let deadline = self.now + by;
        let mut notices = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            let (due, _) = *entry.key();
            if due > deadline {
                break;
            }
            let event = entry.remove();
            self.now = due;
            notices.extend(self.dispatch(navigator, event));
        }
        self.now = deadline;
        notices
    }

    /// Fires events until the queue is empty.
    pub fn settle(&mut self, navigator: &mut Navigator) -> Vec<Effect> {
        let mut notices = Vec::new();
        while let Some(due) = self.next_due() {
            let by = due.saturating_sub(self.now);
            notices.extend(self.advance(navigator, by));
        }
        notices
    }
}
