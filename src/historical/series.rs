//! Daily closing price history for an underlying.

use crate::error::OptionLabError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single dated close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price, strictly positive.
    pub close: f64,
}

impl PricePoint {
    /// Creates a new price point.
    #[must_use]
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Ordered price history with strictly increasing dates and positive closes.
///
/// Deserialization goes through the same validation as [`PriceSeries::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Creates a validated price series.
    ///
    /// # Errors
    /// [`OptionLabError::InvalidArgument`] when a close is not a positive finite
    /// number or dates are not strictly increasing.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, OptionLabError> {
        for (index, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(OptionLabError::invalid_argument(
                    "price_series",
                    format!(
                        "close at {} must be positive, got {}",
                        point.date, point.close
                    ),
                ));
            }
            if index > 0 && points[index - 1].date >= point.date {
                return Err(OptionLabError::invalid_argument(
                    "price_series",
                    format!(
                        "dates must be strictly increasing, {} follows {}",
                        point.date,
                        points[index - 1].date
                    ),
                ));
            }
        }

        Ok(Self { points })
    }

    /// Builds a series of consecutive calendar days starting at `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self, OptionLabError> {
        let points = closes
            .iter()
            .enumerate()
            .map(|(offset, &close)| PricePoint::new(start + Duration::days(offset as i64), close))
            .collect();
        Self::new(points)
    }

    /// Returns the underlying points.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent observation.
    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Closing prices in date order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }

    /// Log returns ln(P_t / P_{t-1}), dated at `t`. One shorter than the series.
    #[must_use]
    pub fn log_returns(&self) -> Vec<(NaiveDate, f64)> {
        self.points
            .windows(2)
            .map(|pair| (pair[1].date, (pair[1].close / pair[0].close).ln()))
            .collect()
    }

    /// Sub-series with dates in `[start, end]`.
    #[must_use]
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        let points = self
            .points
            .iter()
            .filter(|point| point.date >= start && point.date <= end)
            .copied()
            .collect();
        PriceSeries { points }
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = OptionLabError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}
