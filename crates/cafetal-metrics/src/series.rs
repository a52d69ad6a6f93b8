//! Normalized chart series

use crate::format::{short_month_label, EMPTY};
use crate::keys::{self, FieldKey};
use crate::payload::OverviewPayload;
use crate::sanitize::{clamp_pct, to_non_negative_number};
use serde::Serialize;
use serde_json::Value;

/// Fewest points a trend chart can draw a line through
pub const MIN_TREND_POINTS: usize = 2;

/// What a series measures, which decides how values are sanitized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Non-negative magnitude (money, kg, units)
    Magnitude,
    /// Rate in `[0, 100]`
    Percentage,
}

/// Whether a series can be drawn as a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SeriesSufficiency {
    /// At least [`MIN_TREND_POINTS`] points
    Sufficient,
    /// Too few points; render an alternative visualization
    Insufficient {
        /// Points actually present
        points: usize,
    },
}

impl SeriesSufficiency {
    /// Classify a point count
    #[must_use]
    pub fn of(points: usize) -> Self {
        if points >= MIN_TREND_POINTS {
            Self::Sufficient
        } else {
            Self::Insufficient { points }
        }
    }
}

/// One labelled value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Display label
    pub label: String,
    /// Sanitized value
    pub value: f64,
}

impl SeriesPoint {
    /// Create a point
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A sanitized series with its sufficiency flag
///
/// Every value is finite; magnitudes are non-negative and percentages lie
/// in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    kind: SeriesKind,
    points: Vec<SeriesPoint>,
    sufficiency: SeriesSufficiency,
}

impl NormalizedSeries {
    /// Build a magnitude series, sanitizing each value
    pub fn magnitude(points: impl IntoIterator<Item = SeriesPoint>) -> Self {
        Self::build(SeriesKind::Magnitude, points)
    }

    /// Build a percentage series, clamping each value
    pub fn percentage(points: impl IntoIterator<Item = SeriesPoint>) -> Self {
        Self::build(SeriesKind::Percentage, points)
    }

    fn build(kind: SeriesKind, points: impl IntoIterator<Item = SeriesPoint>) -> Self {
        let points: Vec<SeriesPoint> = points
            .into_iter()
            .map(|mut p| {
                p.value = match kind {
                    SeriesKind::Magnitude => to_non_negative_number(p.value, 0.0),
                    SeriesKind::Percentage => clamp_pct(p.value),
                };
                p
            })
            .collect();
        let sufficiency = SeriesSufficiency::of(points.len());
        Self {
            kind,
            points,
            sufficiency,
        }
    }

    /// Kind of values held
    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    /// Points in source order
    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sufficiency flag
    #[must_use]
    pub fn sufficiency(&self) -> SeriesSufficiency {
        self.sufficiency
    }

    /// True when a trend chart can be drawn
    #[must_use]
    pub fn is_trend_renderable(&self) -> bool {
        self.sufficiency == SeriesSufficiency::Sufficient
    }

    /// Last point, the current period for monthly series
    #[must_use]
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Sum of all values
    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

fn month_label(record: &Value) -> String {
    keys::series::LABEL.text(record).unwrap_or_else(|| {
        short_month_label(&keys::series::MONTH.text(record).unwrap_or_default())
    })
}

fn points<'a>(
    list: &'a [Value],
    label: fn(&Value) -> String,
    value: &'a FieldKey,
) -> impl Iterator<Item = SeriesPoint> + 'a {
    list.iter()
        .filter(|r| r.is_object())
        .map(move |r| SeriesPoint::new(label(r), value.number(r).unwrap_or(0.0)))
}

/// Monthly sales totals
#[must_use]
pub fn sales_series(payload: &OverviewPayload) -> NormalizedSeries {
    let list = payload.series_list(&keys::series::SALES);
    NormalizedSeries::magnitude(points(list, month_label, &keys::series::SALES_VALUE))
}

/// Stock in kg per product category
#[must_use]
pub fn stock_by_category(payload: &OverviewPayload) -> NormalizedSeries {
    let list = payload.series_list(&keys::series::STOCK_BY_CATEGORY);
    let label = |r: &Value| {
        keys::series::CATEGORY
            .text(r)
            .unwrap_or_else(|| EMPTY.to_string())
    };
    NormalizedSeries::magnitude(points(list, label, &keys::series::STOCK_VALUE))
}

/// Monthly quality approval rate
#[must_use]
pub fn quality_series(payload: &OverviewPayload) -> NormalizedSeries {
    let list = payload.series_list(&keys::series::QUALITY);
    NormalizedSeries::percentage(points(list, month_label, &keys::series::QUALITY_VALUE))
}
