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

use crate::dashboard::FAVORITES_ID;
use crate::error::{CatalogError, CatalogResult};
use crate::model::{ChartFocus, DataNode, Granularity, MetricMetadata, MetricType};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub metrics: Vec<MetricMetadata>,
    pub data: IndexMap<String, Vec<DataNode>>,
}

impl Category {
    pub fn metric(&self, id: &str) -> Option<&MetricMetadata> {
        self.metrics.iter().find(|metric| metric.id == id)
    }
    pub fn series(&self, metric_id: &str) -> &[DataNode] {
        self.data.get(metric_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
}

/// Read-only set of categories, validated once at load.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> CatalogResult<Self> {
        let catalog = Self { categories };
        catalog.validate()?;
        Ok(catalog)
    }
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|source| CatalogError::CatalogFileError {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }
    pub fn from_yaml_str(yaml_content: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml_content)?;
        Self::new(file.categories)
    }

    pub fn validate(&self) -> CatalogResult<()> {
        if self.categories.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let mut category_ids = std::collections::HashSet::new();
        let mut metric_owner: HashMap<&str, &str> = HashMap::new();
        for category in &self.categories {
            if category.id == FAVORITES_ID {
                return Err(CatalogError::ReservedCategoryId {
                    id: category.id.clone(),
                });
            }
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory {
                    id: category.id.clone(),
                });
            }
            for metric in &category.metrics {
                if let Some(first) = metric_owner.insert(&metric.id, &category.id) {
                    return Err(CatalogError::DuplicateMetric {
                        id: metric.id.clone(),
                        first: first.to_string(),
                        second: category.id.clone(),
                    });
                }
                if !category.data.contains_key(&metric.id) {
                    return Err(CatalogError::MissingSeries {
                        category: category.id.clone(),
                        metric: metric.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }
    pub fn first(&self) -> &Category {
        // validate() guarantees at least one category
        &self.categories[0]
    }
    pub fn find_metric(&self, metric_id: &str) -> Option<(&Category, &MetricMetadata)> {
        self.categories.iter().find_map(|category| {
            category
                .metric(metric_id)
                .map(|metric| (category, metric))
        })
    }

    /// The built-in mock catalog. Random series are drawn from `seed`.
    pub fn builtin(seed: u64) -> Self {
        let mut gen = MockGenerator::new(seed);
        Self {
            categories: vec![
                sales(&mut gen),
                production(&mut gen),
                inventory(&mut gen),
                pump_tracker(&mut gen),
            ],
        }
    }
}

struct MockGenerator {
    rng: StdRng,
}

impl MockGenerator {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
    fn around(&mut self, base: f64, variance: f64) -> f64 {
        (base + self.rng.gen::<f64>() * variance - variance / 2.0)
            .floor()
            .max(0.0)
    }
    fn up_to(&mut self, max: f64) -> f64 {
        (self.rng.gen::<f64>() * max).floor() + 10.0
    }
    fn time_series(&mut self, points: usize, base: f64, variance: f64) -> Vec<DataNode> {
        (1..=points)
            .map(|day| {
                let value = self.around(base, variance);
                let prev = self.around(base, variance);
                DataNode::leaf_with_prev(format!("Day {day}"), value, prev)
            })
            .collect()
    }
    fn children(&mut self, parent: &str, count: usize, max: f64) -> Vec<DataNode> {
        (1..=count)
            .map(|i| DataNode::leaf(format!("{parent}-{i}"), self.up_to(max)))
            .collect()
    }
    fn categorical(&mut self, names: &[&str], max: f64) -> Vec<DataNode> {
        names
            .iter()
            .map(|name| DataNode::leaf(*name, self.up_to(max)))
            .collect()
    }
}

fn leaves(points: &[(&str, f64)]) -> Vec<DataNode> {
    points
        .iter()
        .map(|(name, value)| DataNode::leaf(*name, *value))
        .collect()
}

fn sales(gen: &mut MockGenerator) -> Category {
    let metrics = vec![
        MetricMetadata::new(
            "revenue_trend",
            "Revenue Trend",
            MetricType::TimeSeries,
            ChartFocus::Trend,
        )
        .with_description("Daily revenue over the last 30 days")
        .with_granularity(Granularity::Daily)
        .with_unit("$"),
        MetricMetadata::new(
            "top_regions",
            "Regional Performance",
            MetricType::Hero,
            ChartFocus::Comparison,
        )
        .with_description("Sales breakdown by region (3D View)")
        .with_hierarchy(true)
        .with_unit("k"),
        MetricMetadata::new(
            "product_mix",
            "Product Mix",
            MetricType::Composition,
            ChartFocus::Distribution,
        )
        .with_description("Click slice to drill down (Donut -> Bar)")
        .with_granularity(Granularity::PerUnit)
        .with_hierarchy(true)
        .with_unit("%"),
    ];
    let mut data = IndexMap::new();
    data.insert("revenue_trend".to_string(), gen.time_series(30, 5000.0, 2000.0));
    data.insert(
        "top_regions".to_string(),
        leaves(&[("North", 85.0), ("South", 45.0), ("East", 65.0), ("West", 95.0)]),
    );
    let product_mix = vec![
        DataNode::branch("Electronics", 40.0, gen.children("Elec", 5, 20.0)),
        DataNode::branch("Clothing", 30.0, gen.children("Cloth", 4, 15.0)),
        DataNode::branch("Home", 20.0, gen.children("Home", 3, 10.0)),
        DataNode::branch("Other", 10.0, gen.children("Misc", 2, 5.0)),
    ];
    data.insert("product_mix".to_string(), product_mix);
    Category {
        id: "sales".to_string(),
        name: "Sales".to_string(),
        icon: "💰".to_string(),
        metrics,
        data,
    }
}

fn production(gen: &mut MockGenerator) -> Category {
    let metrics = vec![
        MetricMetadata::new(
            "daily_output",
            "Daily Output",
            MetricType::TimeSeries,
            ChartFocus::Comparison,
        )
        .with_description("Units produced per day vs Target")
        .with_granularity(Granularity::Daily)
        .with_unit("units"),
        MetricMetadata::new(
            "resource_map",
            "Factory Resource Map",
            MetricType::Categorical,
            ChartFocus::Structure,
        )
        .with_description("Space utilization (Treemap)")
        .with_hierarchy(true)
        .with_unit("sqft"),
        MetricMetadata::new(
            "efficiency_kpi",
            "Line Efficiency",
            MetricType::Hero,
            ChartFocus::Metric,
        )
        .with_description("Overall Equipment Effectiveness (OEE)")
        .with_unit("%"),
    ];
    let mut data = IndexMap::new();
    data.insert("daily_output".to_string(), gen.time_series(14, 1200.0, 300.0));
    data.insert(
        "resource_map".to_string(),
        vec![
            DataNode::branch(
                "Assembly",
                400.0,
                leaves(&[("Zone A", 150.0), ("Zone B", 120.0), ("Zone C", 130.0)]),
            ),
            DataNode::branch("Packaging", 300.0, leaves(&[("Box", 200.0), ("Label", 100.0)])),
            DataNode::branch("Storage", 300.0, leaves(&[("Cold", 100.0), ("Dry", 200.0)])),
            DataNode::branch("Office", 100.0, leaves(&[("HR", 50.0), ("Eng", 50.0)])),
        ],
    );
    data.insert(
        "efficiency_kpi".to_string(),
        leaves(&[("Line 1", 88.0), ("Line 2", 72.0), ("Line 3", 94.0)]),
    );
    Category {
        id: "production".to_string(),
        name: "Production".to_string(),
        icon: "🏭".to_string(),
        metrics,
        data,
    }
}

fn inventory(gen: &mut MockGenerator) -> Category {
    let metrics = vec![
        MetricMetadata::new(
            "stock_levels",
            "Stock Levels",
            MetricType::Hero,
            ChartFocus::Comparison,
        )
        .with_description("Current stock count by warehouse")
        .with_hierarchy(true)
        .with_unit("k"),
        MetricMetadata::new(
            "turnover_rate",
            "Turnover Rate",
            MetricType::TimeSeries,
            ChartFocus::Trend,
        )
        .with_description("Inventory turnover ratio over time")
        .with_granularity(Granularity::Monthly)
        .with_unit("x"),
        MetricMetadata::new(
            "category_split",
            "Stock Value Split",
            MetricType::Composition,
            ChartFocus::Distribution,
        )
        .with_description("Value distribution across categories")
        .with_granularity(Granularity::PerUnit)
        .with_unit("$"),
    ];
    let mut data = IndexMap::new();
    data.insert(
        "stock_levels".to_string(),
        leaves(&[("WH-Alpha", 120.0), ("WH-Beta", 80.0), ("WH-Gamma", 150.0)]),
    );
    data.insert("turnover_rate".to_string(), gen.time_series(12, 4.0, 2.0));
    data.insert(
        "category_split".to_string(),
        gen.categorical(&["Raw Mat", "WIP", "Finished", "Spare Parts"], 100.0),
    );
    Category {
        id: "inventory".to_string(),
        name: "Inventory".to_string(),
        icon: "📦".to_string(),
        metrics,
        data,
    }
}

fn pump_tracker(gen: &mut MockGenerator) -> Category {
    let metrics = vec![
        MetricMetadata::new("flow_rate", "Avg Flow Rate", MetricType::TimeSeries, ChartFocus::Trend)
            .with_description("Real-time pump flow rates")
            .with_granularity(Granularity::Daily)
            .with_unit("L/min"),
        MetricMetadata::new(
            "pressure_distribution",
            "Pressure Zones",
            MetricType::Composition,
            ChartFocus::Distribution,
        )
        .with_description("Pressure readings distribution")
        .with_unit("psi"),
        MetricMetadata::new(
            "active_pumps",
            "Active Pumps",
            MetricType::Hero,
            ChartFocus::Comparison,
        )
        .with_description("Currently active vs idle pumps")
        .with_hierarchy(true)
        .with_unit("#"),
    ];
    let mut data = IndexMap::new();
    data.insert("flow_rate".to_string(), gen.time_series(24, 450.0, 50.0));
    data.insert(
        "pressure_distribution".to_string(),
        leaves(&[("Low (<30)", 15.0), ("Optimal (30-50)", 60.0), ("High (>50)", 25.0)]),
    );
    data.insert(
        "active_pumps".to_string(),
        leaves(&[("Active", 42.0), ("Idle", 12.0), ("Maintenance", 4.0)]),
    );
    Category {
        id: "pump_tracker".to_string(),
        name: "PumpTracker Ops".to_string(),
        icon: "⛽".to_string(),
        metrics,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid_and_deterministic() {
        let catalog = Catalog::builtin(7);
        catalog.validate().unwrap();
        assert_eq!(catalog.categories().len(), 4);
        assert_eq!(catalog, Catalog::builtin(7));
        assert_ne!(
            catalog.get("sales").unwrap().series("revenue_trend"),
            Catalog::builtin(8).get("sales").unwrap().series("revenue_trend")
        );
    }

    #[test]
    fn test_builtin_mock_ranges() {
        let catalog = Catalog::builtin(42);
        let sales = catalog.get("sales").unwrap();
        let revenue = sales.series("revenue_trend");
        assert_eq!(revenue.len(), 30);
        assert!(revenue
            .iter()
            .all(|p| (4000.0..6000.0).contains(&p.value()) && p.prev_value().is_some()));
        let electronics = &sales.series("product_mix")[0];
        assert_eq!(electronics.children().len(), 5);
        assert_eq!(electronics.children()[0].name(), "Elec-1");
        assert!(electronics
            .children()
            .iter()
            .all(|c| (10.0..30.0).contains(&c.value())));
    }

    #[test]
    fn test_find_metric_reports_owner() {
        let catalog = Catalog::builtin(1);
        let (category, metric) = catalog.find_metric("flow_rate").unwrap();
        assert_eq!(category.name, "PumpTracker Ops");
        assert_eq!(metric.name, "Avg Flow Rate");
        assert!(catalog.find_metric("nope").is_none());
    }

    #[test]
    fn test_yaml_catalog_validation() {
        let yaml = r"
categories:
  - id: ops
    name: Ops
    metrics:
      - id: uptime
        name: Uptime
        description: Uptime per site
        classification: categorical
        granularity: global
        preferred_focus: comparison
    data:
      uptime:
        - { name: Site A, value: 99 }
        - { name: Site B, value: 97, children: [ { name: Rack 1, value: 98 } ] }
";
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        let ops = catalog.get("ops").unwrap();
        assert!(ops.series("uptime")[1].is_drillable());

        let missing = yaml.replace("      uptime:\n", "      other:\n");
        assert!(matches!(
            Catalog::from_yaml_str(&missing),
            Err(CatalogError::MissingSeries { .. })
        ));

        let reserved = yaml.replace("id: ops", "id: favorites");
        assert!(matches!(
            Catalog::from_yaml_str(&reserved),
            Err(CatalogError::ReservedCategoryId { .. })
        ));
    }

    #[test]
    fn test_duplicate_metric_rejected() {
        let mut categories = Catalog::builtin(1).categories().to_vec();
        let mut copy = categories[0].clone();
        copy.id = "sales_copy".to_string();
        categories.push(copy);
        assert!(matches!(
            Catalog::new(categories),
            Err(CatalogError::DuplicateMetric { .. })
        ));
    }
}
