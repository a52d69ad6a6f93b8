//! Chart-mode decisions
//!
//! Each chart enum names the visualization to draw and carries only the data
//! that visualization needs.

use crate::ranking::{self, StatusCount};
use crate::sanitize::{clamp_pct, previous_period};
use crate::series::{NormalizedSeries, SeriesPoint};
use serde::Serialize;
use std::collections::HashSet;

/// Most categories a proportion (pie) chart shows
pub const PROPORTION_MAX_CATEGORIES: usize = 8;

/// Layout for a categorical breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryChartMode {
    /// Pie chart
    Proportion,
    /// Treemap
    Hierarchical,
}

/// Pick the layout for `distinct` categories
#[must_use]
pub fn category_chart_mode(distinct: usize) -> CategoryChartMode {
    if distinct <= PROPORTION_MAX_CATEGORIES {
        CategoryChartMode::Proportion
    } else {
        CategoryChartMode::Hierarchical
    }
}

/// Categorical breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryChart {
    /// Nothing to show
    NoData,
    /// Pie slices, largest first
    Proportion {
        /// Slices
        slices: Vec<SeriesPoint>,
    },
    /// Treemap tiles, in source order
    Hierarchical {
        /// Tiles
        tiles: Vec<SeriesPoint>,
    },
}

impl CategoryChart {
    /// Build from a category series
    #[must_use]
    pub fn from_series(series: &NormalizedSeries) -> Self {
        if series.is_empty() {
            return Self::NoData;
        }
        let distinct = series
            .points()
            .iter()
            .map(|p| p.label.as_str())
            .collect::<HashSet<_>>()
            .len();
        let points = series.points().to_vec();
        match category_chart_mode(distinct) {
            CategoryChartMode::Proportion => {
                let mut slices = points;
                slices.sort_by(|a, b| {
                    b.value
                        .partial_cmp(&a.value)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                Self::Proportion { slices }
            }
            CategoryChartMode::Hierarchical => Self::Hierarchical { tiles: points },
        }
    }

    /// Layout in use, `None` when empty
    #[must_use]
    pub fn mode(&self) -> Option<CategoryChartMode> {
        match self {
            Self::NoData => None,
            Self::Proportion { .. } => Some(CategoryChartMode::Proportion),
            Self::Hierarchical { .. } => Some(CategoryChartMode::Hierarchical),
        }
    }
}

/// Sales visualization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SalesChart {
    /// Monthly trend line
    Trend {
        /// Sales series
        series: NormalizedSeries,
    },
    /// Two bars: reconstructed previous period against the current one
    Comparison {
        /// Previous period
        previous: f64,
        /// Current period
        current: f64,
    },
}

impl SalesChart {
    /// Trend when the series suffices, otherwise a comparison
    #[must_use]
    pub fn choose(series: NormalizedSeries, current: f64, delta_pct: f64) -> Self {
        if series.is_trend_renderable() {
            Self::Trend { series }
        } else {
            Self::Comparison {
                previous: previous_period(current, delta_pct),
                current,
            }
        }
    }
}

/// Quality visualization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityChart {
    /// Monthly approval trend
    Trend {
        /// Approval series
        series: NormalizedSeries,
    },
    /// Single-value gauge
    Gauge {
        /// Approval rate in `[0, 100]`
        pct: f64,
    },
}

impl QualityChart {
    /// Trend when the series suffices, otherwise a gauge of `approved_pct`
    #[must_use]
    pub fn choose(series: NormalizedSeries, approved_pct: f64) -> Self {
        if series.is_trend_renderable() {
            Self::Trend { series }
        } else {
            Self::Gauge {
                pct: clamp_pct(approved_pct),
            }
        }
    }
}

/// Product panel, first non-empty source wins
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductPanel {
    /// Best-selling products
    TopProducts {
        /// Ranked products
        items: Vec<SeriesPoint>,
    },
    /// Invoice counts by status
    InvoicesByStatus {
        /// Counts, first-seen order
        counts: Vec<StatusCount>,
    },
    /// Categories with the most stock
    TopStockCategories {
        /// Ranked categories
        items: Vec<SeriesPoint>,
    },
    /// Nothing to show
    NoData,
}

impl ProductPanel {
    /// Walk the fallback chain: products, invoices, stock categories
    #[must_use]
    pub fn choose(
        products: Vec<SeriesPoint>,
        invoices: Vec<StatusCount>,
        stock: &NormalizedSeries,
    ) -> Self {
        if !products.is_empty() {
            return Self::TopProducts { items: products };
        }
        if !invoices.is_empty() {
            return Self::InvoicesByStatus { counts: invoices };
        }
        let items = ranking::top_n(
            stock
                .points()
                .iter()
                .filter(|p| p.value > 0.0)
                .cloned()
                .collect(),
        );
        if items.is_empty() {
            Self::NoData
        } else {
            Self::TopStockCategories { items }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(n: usize) -> NormalizedSeries {
        NormalizedSeries::magnitude((0..n).map(|i| SeriesPoint::new(format!("C{i}"), i as f64)))
    }

    #[test]
    fn eight_is_proportion_nine_is_hierarchical() {
        assert_eq!(category_chart_mode(8), CategoryChartMode::Proportion);
        assert_eq!(category_chart_mode(9), CategoryChartMode::Hierarchical);
        assert_eq!(
            CategoryChart::from_series(&categories(8)).mode(),
            Some(CategoryChartMode::Proportion)
        );
        assert_eq!(
            CategoryChart::from_series(&categories(9)).mode(),
            Some(CategoryChartMode::Hierarchical)
        );
        assert_eq!(CategoryChart::from_series(&categories(0)), CategoryChart::NoData);
    }

    #[test]
    fn proportion_slices_sorted_descending() {
        let CategoryChart::Proportion { slices } = CategoryChart::from_series(&categories(3)) else {
            panic!("expected proportion chart");
        };
        let labels: Vec<_> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["C2", "C1", "C0"]);
    }

    #[test]
    fn sales_falls_back_to_comparison() {
        let one = NormalizedSeries::magnitude([SeriesPoint::new("Ene.", 1000.0)]);
        assert_eq!(
            SalesChart::choose(one, 1000.0, 25.0),
            SalesChart::Comparison {
                previous: 800.0,
                current: 1000.0
            }
        );

        let two = categories(2);
        assert!(matches!(
            SalesChart::choose(two, 0.0, 0.0),
            SalesChart::Trend { .. }
        ));
    }

    #[test]
    fn quality_falls_back_to_gauge() {
        let chart = QualityChart::choose(NormalizedSeries::percentage(Vec::new()), 120.0);
        assert_eq!(chart, QualityChart::Gauge { pct: 100.0 });
    }

    #[test]
    fn product_panel_chain() {
        let stock = NormalizedSeries::magnitude([
            SeriesPoint::new("Oro", 50.0),
            SeriesPoint::new("Pergamino", 80.0),
            SeriesPoint::new("Vacío", 0.0),
        ]);
        let invoices = vec![StatusCount {
            status: "PAID".into(),
            count: 1,
        }];

        let panel = ProductPanel::choose(vec![SeriesPoint::new("A", 1.0)], invoices.clone(), &stock);
        assert!(matches!(panel, ProductPanel::TopProducts { .. }));

        let panel = ProductPanel::choose(Vec::new(), invoices, &stock);
        assert!(matches!(panel, ProductPanel::InvoicesByStatus { .. }));

        let panel = ProductPanel::choose(Vec::new(), Vec::new(), &stock);
        assert_eq!(
            panel,
            ProductPanel::TopStockCategories {
                items: vec![
                    SeriesPoint::new("Pergamino", 80.0),
                    SeriesPoint::new("Oro", 50.0)
                ]
            }
        );

        let empty = NormalizedSeries::magnitude(Vec::new());
        assert_eq!(
            ProductPanel::choose(Vec::new(), Vec::new(), &empty),
            ProductPanel::NoData
        );
    }
}
