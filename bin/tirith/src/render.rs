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

//! Plain-text stand-ins for the chart renderer.

use std::fmt::Write;
use tirith_core::{
    explain, Catalog, DashboardView, FavoritesStore, InsightPanel, MetricCard, PhaseKind,
    RenderPlan, StoragePort,
};

pub fn plan(plan: &RenderPlan) -> String {
    let mut out = String::new();
    let phase = match plan.phase {
        PhaseKind::Idle => "idle",
        PhaseKind::Exiting => "exiting",
        PhaseKind::Entering => "entering",
    };
    let _ = write!(out, "[{}] {} {phase} ({:?})", plan.key, plan.kind, plan.animation);
    if !plan.breadcrumbs.is_empty() {
        let _ = write!(out, "  {}", plan.breadcrumbs.join(" > "));
    }
    out.push('\n');

    for item in &plan.items {
        let marker = match (item.active, item.drillable) {
            (true, _) => '*',
            (false, true) => '>',
            (false, false) => ' ',
        };
        let _ = write!(
            out,
            " {marker} {:<18} {:>10.2}",
            item.name, item.value
        );
        if let Some(prev) = item.prev_value {
            let _ = write!(out, " (prev {prev:.2})");
        }
        let _ = writeln!(out, "  {} @{:.2}", item.swatch.color, item.swatch.opacity);
    }

    if !plan.series.is_empty() {
        let legend: Vec<String> = plan
            .series
            .iter()
            .map(|s| {
                if s.hidden {
                    format!("[{}]", s.name)
                } else {
                    s.name.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "   series: {}", legend.join(", "));
    }
    if plan.back_available {
        out.push_str("   (back available)\n");
    }
    out
}

pub fn categories<P: StoragePort>(catalog: &Catalog, favorites: &FavoritesStore<P>) -> String {
    let mut out = String::new();
    for category in catalog.categories() {
        let _ = writeln!(
            out,
            "{} {:<14} {:<18} {} metrics",
            category.icon,
            category.id,
            category.name,
            category.metrics.len()
        );
    }
    let _ = writeln!(
        out,
        "★ {:<14} {:<18} {} starred",
        "favorites",
        "Favorites",
        favorites.len()
    );
    out
}

pub fn view(view: &DashboardView<'_>) -> String {
    let mut out = String::new();
    match view {
        DashboardView::Category { category, cards } => {
            let _ = writeln!(out, "{} {}", category.icon, category.name);
            for card in cards {
                push_card(&mut out, card);
            }
        }
        DashboardView::Favorites { cards } => {
            out.push_str("★ Favorites\n");
            for card in cards {
                push_card(&mut out, card);
            }
        }
        DashboardView::FavoritesEmpty => {
            out.push_str("No favorites yet\n");
            out.push_str("Star your most important charts in other categories ");
            out.push_str("to see them all here at a glance.\n");
        }
    }
    out
}

fn push_card(out: &mut String, card: &MetricCard<'_>) {
    let star = if card.is_favorite { '★' } else { '☆' };
    let _ = write!(out, "  {star} {:<24} {:<8}", card.metric.name, card.config.kind);
    if let Some(owner) = card.category_name {
        let _ = write!(out, " [{owner}]");
    }
    if card.wide {
        out.push_str(" (wide)");
    }
    let _ = writeln!(
        out,
        "  {} points, {}",
        card.data.len(),
        explain(card.metric).description()
    );
}

pub fn panel(panel: &InsightPanel) -> String {
    let mut out = String::new();
    if let Some(insight) = &panel.insight {
        let _ = writeln!(out, "Insights\n{insight}");
    }
    if let Some(strategy) = &panel.strategy {
        let _ = writeln!(out, "Strategy\n{strategy}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tirith_core::{ChartConfig, ChartKind, DataNode, NavEvent, Navigator};

    #[test]
    fn test_plan_marks_hidden_series_and_drillable_items() {
        let mut navigator = Navigator::new(
            vec![
                DataNode::branch("Assembly", 400.0, vec![DataNode::leaf("Zone A", 150.0)]),
                DataNode::leaf_with_prev("Office", 100.0, 90.0),
            ],
            ChartConfig::new(ChartKind::Bar),
        );
        navigator.dispatch(NavEvent::ToggleSeries("Value".into()));
        let text = plan(&navigator.render_plan());
        assert!(text.starts_with("[chart-0-bar] bar idle (Fade)"));
        assert!(text.contains(" > Assembly"));
        assert!(text.contains("(prev 90.00)"));
        assert!(text.contains("series: [Value]"));
    }
}
