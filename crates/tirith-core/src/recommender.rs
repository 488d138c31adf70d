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

use crate::model::{ChartConfig, ChartFocus, ChartKind, MetricMetadata, MetricType};

/// The rule that picked a chart. Rules are checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationRule {
    StructureFocus,
    HeroMetric,
    PartOfWhole,
    TimeSeriesComparison,
    TimeSeriesTrend,
    Categorical,
    Fallback,
}

impl RecommendationRule {
    pub fn chart_kind(&self) -> ChartKind {
        match self {
            RecommendationRule::StructureFocus => ChartKind::Treemap,
            RecommendationRule::HeroMetric => ChartKind::Bar3d,
            RecommendationRule::PartOfWhole => ChartKind::Donut,
            RecommendationRule::TimeSeriesComparison => ChartKind::Area,
            RecommendationRule::TimeSeriesTrend => ChartKind::Line,
            RecommendationRule::Categorical | RecommendationRule::Fallback => ChartKind::Bar,
        }
    }
    pub fn description(&self) -> &'static str {
        match self {
            RecommendationRule::StructureFocus => "structure focus shows nested areas",
            RecommendationRule::HeroMetric => "hero metric gets the 3D view",
            RecommendationRule::PartOfWhole => "composition or distribution shows parts of a whole",
            RecommendationRule::TimeSeriesComparison => "time series compared by volume",
            RecommendationRule::TimeSeriesTrend => "time series trend",
            RecommendationRule::Categorical => "categorical comparison",
            RecommendationRule::Fallback => "no specific rule matched",
        }
    }
}

pub fn explain(metric: &MetricMetadata) -> RecommendationRule {
    if metric.preferred_focus == ChartFocus::Structure {
        return RecommendationRule::StructureFocus;
    }
    if metric.classification == MetricType::Hero {
        return RecommendationRule::HeroMetric;
    }
    if metric.classification == MetricType::Composition
        || metric.preferred_focus == ChartFocus::Distribution
    {
        return RecommendationRule::PartOfWhole;
    }
    match metric.classification {
        MetricType::TimeSeries if metric.preferred_focus == ChartFocus::Comparison => {
            RecommendationRule::TimeSeriesComparison
        }
        MetricType::TimeSeries => RecommendationRule::TimeSeriesTrend,
        MetricType::Categorical => RecommendationRule::Categorical,
        _ => RecommendationRule::Fallback,
    }
}

pub fn recommend(metric: &MetricMetadata) -> ChartConfig {
    ChartConfig::new(explain(metric).chart_kind())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(classification: MetricType, focus: ChartFocus) -> MetricMetadata {
        MetricMetadata::new("m", "Metric", classification, focus)
    }

    #[test]
    fn test_rule_table() {
        let cases = [
            (MetricType::Categorical, ChartFocus::Structure, ChartKind::Treemap),
            (MetricType::Hero, ChartFocus::Comparison, ChartKind::Bar3d),
            (MetricType::Hero, ChartFocus::Distribution, ChartKind::Bar3d),
            (MetricType::Composition, ChartFocus::Trend, ChartKind::Donut),
            (MetricType::TimeSeries, ChartFocus::Distribution, ChartKind::Donut),
            (MetricType::TimeSeries, ChartFocus::Comparison, ChartKind::Area),
            (MetricType::TimeSeries, ChartFocus::Trend, ChartKind::Line),
            (MetricType::TimeSeries, ChartFocus::Metric, ChartKind::Line),
            (MetricType::Categorical, ChartFocus::Comparison, ChartKind::Bar),
            (MetricType::Hierarchical, ChartFocus::Trend, ChartKind::Bar),
        ];
        for (classification, focus, expected) in cases {
            assert_eq!(
                recommend(&metric(classification, focus)).kind,
                expected,
                "{classification:?}/{focus:?}"
            );
        }
    }

    #[test]
    fn test_explain_names_the_fallback() {
        let rule = explain(&metric(MetricType::Hierarchical, ChartFocus::Metric));
        assert_eq!(rule, RecommendationRule::Fallback);
        assert_eq!(rule.chart_kind(), ChartKind::Bar);
    }
}
