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

//! Metric metadata, chart configuration and the hierarchical data nodes
//! that every chart renders.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    TimeSeries,
    Categorical,
    Composition,
    Hero,
    Hierarchical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Granularity {
    Daily,
    Monthly,
    PerUnit,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartFocus {
    Trend,
    Comparison,
    Distribution,
    Metric,
    Structure,
}

impl MetricType {
    pub const ALL: [MetricType; 5] = [
        MetricType::TimeSeries,
        MetricType::Categorical,
        MetricType::Composition,
        MetricType::Hero,
        MetricType::Hierarchical,
    ];
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Daily,
        Granularity::Monthly,
        Granularity::PerUnit,
        Granularity::Global,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Monthly => "monthly",
            Granularity::PerUnit => "perUnit",
            Granularity::Global => "global",
        }
    }
}

impl ChartFocus {
    pub const ALL: [ChartFocus; 5] = [
        ChartFocus::Trend,
        ChartFocus::Comparison,
        ChartFocus::Distribution,
        ChartFocus::Metric,
        ChartFocus::Structure,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartFocus::Trend => "trend",
            ChartFocus::Comparison => "comparison",
            ChartFocus::Distribution => "distribution",
            ChartFocus::Metric => "metric",
            ChartFocus::Structure => "structure",
        }
    }
}

/// Static description of one metric in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(alias = "dataType")]
    pub classification: MetricType,
    pub granularity: Granularity,
    #[serde(alias = "preferredFocus")]
    pub preferred_focus: ChartFocus,
    #[serde(default, alias = "hasHierarchy")]
    pub has_hierarchy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl MetricMetadata {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        classification: MetricType,
        preferred_focus: ChartFocus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            classification,
            granularity: Granularity::Global,
            preferred_focus,
            has_hierarchy: false,
            unit: None,
        }
    }
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }
    pub fn with_hierarchy(mut self, has_hierarchy: bool) -> Self {
        self.has_hierarchy = has_hierarchy;
        self
    }
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
    /// Hero metrics take a double-width card.
    pub fn is_wide(&self) -> bool {
        self.classification == MetricType::Hero
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "area")]
    Area,
    #[serde(rename = "donut")]
    Donut,
    #[serde(rename = "3d-bar")]
    Bar3d,
    #[serde(rename = "kpi")]
    Kpi,
    #[serde(rename = "treemap")]
    Treemap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Area,
        ChartKind::Donut,
        ChartKind::Bar3d,
        ChartKind::Kpi,
        ChartKind::Treemap,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Area => "area",
            ChartKind::Donut => "donut",
            ChartKind::Bar3d => "3d-bar",
            ChartKind::Kpi => "kpi",
            ChartKind::Treemap => "treemap",
        }
    }
    /// Kinds drawn on x/y axes, where hidden series are suppressed instead of removed.
    pub fn is_cartesian(&self) -> bool {
        matches!(self, ChartKind::Line | ChartKind::Bar | ChartKind::Area)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl ChartConfig {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            options: None,
        }
    }
}

impl From<ChartKind> for ChartConfig {
    fn from(kind: ChartKind) -> Self {
        Self::new(kind)
    }
}

/// One point of a chart. Branch nodes can be drilled into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPoint", into = "RawPoint")]
pub enum DataNode {
    Leaf {
        name: String,
        value: f64,
        prev_value: Option<f64>,
    },
    Branch {
        name: String,
        value: f64,
        children: Vec<DataNode>,
    },
}

impl DataNode {
    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        DataNode::Leaf {
            name: name.into(),
            value,
            prev_value: None,
        }
    }
    pub fn leaf_with_prev(name: impl Into<String>, value: f64, prev_value: f64) -> Self {
        DataNode::Leaf {
            name: name.into(),
            value,
            prev_value: Some(prev_value),
        }
    }
    pub fn branch(name: impl Into<String>, value: f64, children: Vec<DataNode>) -> Self {
        DataNode::Branch {
            name: name.into(),
            value,
            children,
        }
    }
    pub fn name(&self) -> &str {
        match self {
            DataNode::Leaf { name, .. } | DataNode::Branch { name, .. } => name,
        }
    }
    pub fn value(&self) -> f64 {
        match self {
            DataNode::Leaf { value, .. } | DataNode::Branch { value, .. } => *value,
        }
    }
    pub fn prev_value(&self) -> Option<f64> {
        match self {
            DataNode::Leaf { prev_value, .. } => *prev_value,
            DataNode::Branch { .. } => None,
        }
    }
    pub fn children(&self) -> &[DataNode] {
        match self {
            DataNode::Leaf { .. } => &[],
            DataNode::Branch { children, .. } => children,
        }
    }
    pub fn is_drillable(&self) -> bool {
        !self.children().is_empty()
    }
    pub fn into_children(self) -> Vec<DataNode> {
        match self {
            DataNode::Leaf { .. } => Vec::new(),
            DataNode::Branch { children, .. } => children,
        }
    }
}

/// Wire shape shared with catalogs and prompts: `{name, value, prevValue?, children?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawPoint {
    name: String,
    value: f64,
    #[serde(
        default,
        rename = "prevValue",
        alias = "prev_value",
        skip_serializing_if = "Option::is_none"
    )]
    prev_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<DataNode>>,
}

impl From<RawPoint> for DataNode {
    fn from(raw: RawPoint) -> Self {
        match raw.children {
            Some(children) => DataNode::Branch {
                name: raw.name,
                value: raw.value,
                children,
            },
            None => DataNode::Leaf {
                name: raw.name,
                value: raw.value,
                prev_value: raw.prev_value,
            },
        }
    }
}

impl From<DataNode> for RawPoint {
    fn from(node: DataNode) -> Self {
        match node {
            DataNode::Leaf {
                name,
                value,
                prev_value,
            } => RawPoint {
                name,
                value,
                prev_value,
                children: None,
            },
            DataNode::Branch {
                name,
                value,
                children,
            } => RawPoint {
                name,
                value,
                prev_value: None,
                children: Some(children),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_json_becomes_tagged_nodes() {
        let nodes: Vec<DataNode> = serde_json::from_value(json!([
            {"name": "Day 1", "value": 10.0, "prevValue": 8.0},
            {"name": "Assembly", "value": 400.0, "children": [
                {"name": "Zone A", "value": 150.0}
            ]},
            {"name": "Empty", "value": 1.0, "children": []}
        ]))
        .unwrap();

        assert_eq!(nodes[0], DataNode::leaf_with_prev("Day 1", 10.0, 8.0));
        assert!(nodes[1].is_drillable());
        assert_eq!(nodes[1].children()[0].name(), "Zone A");
        assert!(matches!(nodes[2], DataNode::Branch { .. }));
        assert!(!nodes[2].is_drillable());
    }

    #[test]
    fn test_serialises_in_flat_shape() {
        let node = DataNode::branch("Home", 20.0, vec![DataNode::leaf("Home-1", 4.0)]);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({"name": "Home", "value": 20.0, "children": [{"name": "Home-1", "value": 4.0}]})
        );
    }

    #[test]
    fn test_chart_config_wire_names() {
        let config: ChartConfig = serde_json::from_value(json!({"type": "3d-bar"})).unwrap();
        assert_eq!(config.kind, ChartKind::Bar3d);
        assert_eq!(
            serde_json::to_value(ChartConfig::new(ChartKind::Donut)).unwrap(),
            json!({"type": "donut"})
        );
    }

    #[test]
    fn test_metadata_accepts_camel_case_aliases() {
        let yaml = r"
id: product_mix
name: Product Mix
description: Click slice to drill down
dataType: composition
granularity: perUnit
preferredFocus: distribution
hasHierarchy: true
unit: '%'
";
        let metric: MetricMetadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(metric.classification, MetricType::Composition);
        assert_eq!(metric.granularity, Granularity::PerUnit);
        assert!(metric.has_hierarchy);
        assert_eq!(metric.unit.as_deref(), Some("%"));
    }
}
