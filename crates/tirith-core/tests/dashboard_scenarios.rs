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

use std::time::Duration;
use tempfile::tempdir;
use tirith_core::{
    open_dashboard, AnimationMode, Catalog, ChartConfig, ChartKind, Dashboard, DashboardView,
    Effect, FavoritesStore, MemoryStorage, NavEvent, Navigator, PhaseKind, StoragePort, Timeline,
    TirithConfig, TransitionTiming, FAVORITES_ID, FAVORITES_KEY, PALETTE,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn product_mix() -> Navigator {
    let catalog = Catalog::builtin(11);
    let sales = catalog.get("sales").unwrap();
    Navigator::new(
        sales.series("product_mix").to_vec(),
        tirith_core::recommend(sales.metric("product_mix").unwrap()),
    )
}

#[test]
fn donut_slice_explodes_then_drills_into_bar() {
    let mut navigator = product_mix();
    let mut timeline = Timeline::new();
    assert_eq!(navigator.state().kind(), ChartKind::Donut);
    assert_eq!(navigator.render_plan().key, "chart-0-donut");

    let electronics = navigator.state().data()[0].clone();
    let children = electronics.children().to_vec();
    let notices = timeline.dispatch(
        &mut navigator,
        NavEvent::Click {
            node: electronics,
            index: Some(0),
            color: Some(PALETTE[0]),
        },
    );
    assert_eq!(
        notices,
        vec![Effect::Selected {
            name: "Electronics".to_string(),
            drillable: true,
        }]
    );
    assert_eq!(navigator.state().active_index(), Some(0));
    assert!(navigator.render_plan().items[0].active);

    // a second click while the slice is out is swallowed
    let clothing = navigator.state().data()[1].clone();
    timeline.dispatch(
        &mut navigator,
        NavEvent::Click {
            node: clothing,
            index: Some(1),
            color: None,
        },
    );
    assert_eq!(timeline.pending(), 1);

    timeline.advance(&mut navigator, ms(450));
    assert_eq!(navigator.state().phase().kind(), PhaseKind::Exiting);
    assert_eq!(navigator.state().animation(), AnimationMode::Morph);
    assert_eq!(navigator.state().depth(), 0);

    timeline.advance(&mut navigator, ms(300));
    assert_eq!(navigator.state().phase().kind(), PhaseKind::Entering);
    assert_eq!(navigator.state().kind(), ChartKind::Bar);
    assert_eq!(navigator.state().data(), children.as_slice());
    assert_eq!(navigator.state().seed_color(), Some(PALETTE[0]));
    assert_eq!(navigator.state().active_index(), None);

    timeline.advance(&mut navigator, ms(50));
    let plan = navigator.render_plan();
    assert_eq!(plan.phase, PhaseKind::Idle);
    assert_eq!(plan.key, "chart-1-bar");
    assert_eq!(plan.breadcrumbs, vec!["Electronics".to_string()]);
    assert!(plan.back_available);
    assert_eq!(plan.items.len(), 5);
    assert!(plan.items.iter().all(|item| item.swatch.color == PALETTE[0]));
    assert_eq!(plan.items[0].swatch.opacity, 1.0);
    assert!(plan.items[4].swatch.opacity < plan.items[1].swatch.opacity);
    assert!(plan.items.iter().all(|item| item.swatch.opacity >= 0.4));

    timeline.dispatch(&mut navigator, NavEvent::Back);
    assert_eq!(navigator.state().animation(), AnimationMode::Fade);
    timeline.advance(&mut navigator, ms(350));
    let plan = navigator.render_plan();
    assert_eq!(plan.kind, ChartKind::Donut);
    assert_eq!(plan.key, "chart-0-donut");
    assert_eq!(plan.items.len(), 4);
    assert_eq!(plan.items[2].swatch.color, PALETTE[2]);
    assert!(!plan.back_available);
    assert_eq!(navigator.state().seed_color(), None);
}

#[test]
fn hidden_donut_slices_keep_their_colors() {
    let mut navigator = product_mix();
    navigator.dispatch(NavEvent::ToggleSeries("Clothing".to_string()));
    let plan = navigator.render_plan();
    let names: Vec<_> = plan.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Electronics", "Home", "Other"]);
    assert_eq!(plan.items[1].original_index, 2);
    assert_eq!(plan.items[1].swatch.color, PALETTE[2]);
    assert!(plan.series.iter().any(|s| s.name == "Clothing" && s.hidden));
}

#[test]
fn reset_during_exit_drops_the_pending_commit() {
    let mut navigator = product_mix();
    let mut timeline = Timeline::new();
    let home = navigator.state().data()[2].clone();
    timeline.dispatch(&mut navigator, NavEvent::Drill { node: home, color: None });
    timeline.advance(&mut navigator, ms(100));

    let fresh = Catalog::builtin(12).get("sales").unwrap().series("product_mix").to_vec();
    navigator.reset(fresh.clone(), ChartConfig::new(ChartKind::Donut));
    timeline.settle(&mut navigator);

    assert_eq!(navigator.state().depth(), 0);
    assert_eq!(navigator.state().data(), fresh.as_slice());
    assert!(navigator.state().phase().is_idle());
}

#[test]
fn series_toggles_apply_while_exiting_and_clear_on_commit() {
    let mut navigator = product_mix();
    let mut timeline = Timeline::new();
    let root_data = navigator.state().data().to_vec();
    let home = root_data[2].clone();
    timeline.dispatch(&mut navigator, NavEvent::Drill { node: home, color: None });
    assert_eq!(navigator.state().phase().kind(), PhaseKind::Exiting);

    timeline.dispatch(&mut navigator, NavEvent::ToggleSeries("Home".to_string()));
    assert!(navigator.state().is_hidden("Home"));
    timeline.dispatch(&mut navigator, NavEvent::ToggleSeries("Clothing".to_string()));
    timeline.dispatch(&mut navigator, NavEvent::ToggleSeries("Home".to_string()));
    assert!(!navigator.state().is_hidden("Home"));
    assert_eq!(
        navigator.state().hidden_series().iter().collect::<Vec<_>>(),
        vec!["Clothing"]
    );
    assert_eq!(navigator.state().phase().kind(), PhaseKind::Exiting);

    timeline.advance(&mut navigator, ms(300));
    assert_eq!(navigator.state().depth(), 1);
    assert!(navigator.state().hidden_series().is_empty());

    let parent = &navigator.state().history()[0];
    assert_eq!(parent.config, ChartConfig::new(ChartKind::Donut));
    assert_eq!(parent.data, root_data);
    assert_eq!(parent.title.as_deref(), Some("Home"));
    assert_eq!(parent.seed_color, None);
}

#[test]
fn back_at_the_root_changes_nothing() {
    let mut navigator = product_mix();
    let before = navigator.state().clone();
    let effects = navigator.dispatch(NavEvent::Back);
    assert!(effects.is_empty());
    assert_eq!(navigator.state(), &before);
}

#[test]
fn back_restores_the_parent_config_options() {
    let config = ChartConfig {
        kind: ChartKind::Donut,
        options: Some(serde_json::json!({ "radius": ["40%", "70%"], "legend": false })),
    };
    let data = Catalog::builtin(11).get("sales").unwrap().series("product_mix").to_vec();
    let mut navigator =
        Navigator::with_timing(data.clone(), config.clone(), TransitionTiming::immediate());
    let mut timeline = Timeline::new();

    let electronics = data[0].clone();
    timeline.dispatch(&mut navigator, NavEvent::Drill { node: electronics, color: None });
    timeline.settle(&mut navigator);
    assert_eq!(navigator.state().kind(), ChartKind::Bar);
    assert_eq!(navigator.state().history()[0].config, config);

    timeline.dispatch(&mut navigator, NavEvent::Back);
    timeline.settle(&mut navigator);
    assert!(navigator.state().phase().is_idle());
    assert_eq!(navigator.state().config(), &config);
    assert_eq!(navigator.state().data(), data.as_slice());
    assert!(navigator.state().history().is_empty());
}

#[test]
fn stored_favorites_aggregate_across_categories() {
    let storage = MemoryStorage::with_entry(FAVORITES_KEY, r#"["revenue_trend","flow_rate"]"#);
    let mut dashboard = Dashboard::new(
        Catalog::builtin(5),
        FavoritesStore::load(storage),
        TransitionTiming::default(),
    );

    let items = dashboard.favorite_items();
    let owners: Vec<_> = items
        .iter()
        .map(|item| (item.metric.id.as_str(), item.category_name))
        .collect();
    assert_eq!(
        owners,
        vec![("revenue_trend", "Sales"), ("flow_rate", "PumpTracker Ops")]
    );

    dashboard.select(FAVORITES_ID);
    let DashboardView::Favorites { cards } = dashboard.view() else {
        panic!("expected favorites view");
    };
    assert_eq!(cards.len(), 2);
    assert!(cards.iter().all(|card| card.is_favorite));
    assert_eq!(cards[1].category_name, Some("PumpTracker Ops"));
    assert_eq!(dashboard.navigators().count(), 2);

    assert!(!dashboard.toggle_favorite("flow_rate"));
    assert_eq!(dashboard.favorite_items().len(), 1);
    assert!(dashboard.navigator("flow_rate").is_none());
    assert_eq!(
        dashboard.favorites().port().get(FAVORITES_KEY).unwrap().as_deref(),
        Some(r#"["revenue_trend"]"#)
    );

    assert!(!dashboard.toggle_favorite("revenue_trend"));
    assert_eq!(dashboard.view(), DashboardView::FavoritesEmpty);
}

#[test]
fn malformed_favorites_hydrate_empty() {
    let storage = MemoryStorage::with_entry(FAVORITES_KEY, "{not json");
    let favorites = FavoritesStore::load(storage);
    assert!(favorites.is_empty());
}

#[test]
fn selecting_a_category_resets_drilled_charts() {
    let mut dashboard = Dashboard::new(
        Catalog::builtin(5),
        FavoritesStore::load(MemoryStorage::new()),
        TransitionTiming::immediate(),
    );
    let node = dashboard.navigator("product_mix").unwrap().state().data()[0].clone();
    let effects = dashboard
        .dispatch("product_mix", NavEvent::Drill { node, color: None })
        .unwrap();
    for effect in effects {
        if let Effect::Schedule { event, .. } = effect {
            let follow_up = dashboard.dispatch("product_mix", event).unwrap();
            for effect in follow_up {
                if let Effect::Schedule { event, .. } = effect {
                    dashboard.dispatch("product_mix", event);
                }
            }
        }
    }
    assert_eq!(dashboard.navigator("product_mix").unwrap().state().depth(), 1);

    dashboard.select("sales");
    let navigator = dashboard.navigator("product_mix").unwrap();
    assert_eq!(navigator.state().depth(), 0);
    assert_eq!(navigator.state().kind(), ChartKind::Donut);
    assert!(dashboard.dispatch("no_such_metric", NavEvent::Back).is_none());
}

#[test]
fn file_backed_favorites_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");
    let config = TirithConfig::default();

    let mut dashboard = open_dashboard(&config, Some(&path)).unwrap();
    assert!(dashboard.favorites().is_empty());
    dashboard.toggle_favorite("stock_levels");
    dashboard.toggle_favorite("resource_map");
    drop(dashboard);

    let reopened = open_dashboard(&config, Some(&path)).unwrap();
    assert_eq!(
        reopened.favorites().list(),
        vec!["stock_levels".to_string(), "resource_map".to_string()]
    );
    let owners: Vec<_> = reopened
        .favorite_items()
        .iter()
        .map(|item| item.category_name)
        .collect();
    assert_eq!(owners, vec!["Production", "Inventory"]);
}
