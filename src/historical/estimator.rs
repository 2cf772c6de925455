//! Rolling realized volatility.

use super::series::PriceSeries;
use crate::error::OptionLabError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Default rolling windows, in trading days.
pub const DEFAULT_WINDOWS: [usize; 5] = [20, 30, 60, 90, 120];

/// Default annualization basis.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Configuration for the realized volatility estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalVolConfig {
    /// Rolling window lengths in observations.
    pub windows: Vec<usize>,
    /// Trading days per year used to annualize daily dispersion.
    pub trading_days_per_year: f64,
}

impl Default for HistoricalVolConfig {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS.to_vec(),
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl HistoricalVolConfig {
    /// Creates a configuration with default windows and basis.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rolling windows.
    #[must_use]
    pub fn with_windows(mut self, windows: Vec<usize>) -> Self {
        self.windows = windows;
        self
    }

    /// Sets the annualization basis.
    #[must_use]
    pub fn with_trading_days_per_year(mut self, trading_days_per_year: f64) -> Self {
        self.trading_days_per_year = trading_days_per_year;
        self
    }

    /// Checks that every window has a defined sample deviation and the basis is positive.
    pub fn validate(&self) -> Result<(), OptionLabError> {
        if let Some(window) = self.windows.iter().find(|&&window| window < 2) {
            return Err(OptionLabError::invalid_argument(
                "windows",
                format!("rolling windows need at least 2 observations, got {window}"),
            ));
        }
        if !self.trading_days_per_year.is_finite() || self.trading_days_per_year <= 0.0 {
            return Err(OptionLabError::invalid_argument(
                "trading_days_per_year",
                format!(
                    "annualization basis must be positive, got {}",
                    self.trading_days_per_year
                ),
            ));
        }
        Ok(())
    }
}

/// Annualized volatility at a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPoint {
    /// Date of the last return in the window.
    pub date: NaiveDate,
    /// Annualized volatility (e.g. 0.25 = 25%).
    pub volatility: f64,
}

/// Realized volatility for one window length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSeries {
    /// Window length in observations.
    pub window: usize,
    /// Values aligned with every other window in the curve.
    pub points: Vec<VolatilityPoint>,
}

/// Realized volatility per window, truncated to the dates where every window is complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalVolatilityCurve {
    series: Vec<WindowSeries>,
}

impl HistoricalVolatilityCurve {
    /// Display label for a window, e.g. `HV_20d`.
    #[must_use]
    pub fn label(window: usize) -> String {
        format!("HV_{window}d")
    }

    /// Window lengths in request order.
    #[must_use]
    pub fn windows(&self) -> Vec<usize> {
        self.series.iter().map(|series| series.window).collect()
    }

    /// All window series.
    #[must_use]
    pub fn series(&self) -> &[WindowSeries] {
        &self.series
    }

    /// Points for one window.
    #[must_use]
    pub fn window(&self, window: usize) -> Option<&[VolatilityPoint]> {
        self.series
            .iter()
            .find(|series| series.window == window)
            .map(|series| series.points.as_slice())
    }

    /// Shared dates of the curve.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.series
            .first()
            .map(|series| series.points.iter().map(|point| point.date).collect())
            .unwrap_or_default()
    }

    /// Most recent value of each window.
    #[must_use]
    pub fn latest(&self) -> Vec<(usize, f64)> {
        self.series
            .iter()
            .filter_map(|series| series.points.last().map(|point| (series.window, point.volatility)))
            .collect()
    }

    /// Number of aligned rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, |series| series.points.len())
    }

    /// Returns true when no row has a complete value for every window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes realized volatility with the default 252-day basis.
#[must_use]
pub fn historical_volatility(series: &PriceSeries, windows: &[usize]) -> HistoricalVolatilityCurve {
    let config = HistoricalVolConfig::new().with_windows(windows.to_vec());
    historical_volatility_with(series, &config)
}

/// Computes annualized rolling sample standard deviation of log returns.
///
/// For a series of `N` closes the curve has `max(0, N - max(windows))` rows:
/// the first return needs two closes and each window needs `w` returns.
/// A window shorter than 2 has no defined sample deviation, which leaves no
/// complete row, so the curve is empty.
#[must_use]
pub fn historical_volatility_with(
    series: &PriceSeries,
    config: &HistoricalVolConfig,
) -> HistoricalVolatilityCurve {
    let mut windows: Vec<usize> = Vec::with_capacity(config.windows.len());
    for &window in &config.windows {
        if !windows.contains(&window) {
            windows.push(window);
        }
    }

    if windows.is_empty() {
        return HistoricalVolatilityCurve::default();
    }
    if let Err(error) = config.validate() {
        warn!("realized volatility undefined: {}", error);
        return HistoricalVolatilityCurve {
            series: windows
                .into_iter()
                .map(|window| WindowSeries {
                    window,
                    points: Vec::new(),
                })
                .collect(),
        };
    }

    let returns = series.log_returns();
    let longest = windows.iter().copied().max().unwrap_or(0);
    let annualization = config.trading_days_per_year.sqrt();

    // Row i uses returns[..=i]; the first complete row needs `longest` returns.
    let first_row = longest.saturating_sub(1);
    trace!(
        "realized volatility: {} returns, windows {:?}, first row {}",
        returns.len(),
        windows,
        first_row
    );

    let series = windows
        .iter()
        .map(|&window| {
            let points = (first_row..returns.len())
                .map(|end| {
                    let sample = returns[end + 1 - window..=end].iter().map(|(_, r)| *r);
                    VolatilityPoint {
                        date: returns[end].0,
                        volatility: sample_std_dev(sample, window) * annualization,
                    }
                })
                .collect();
            WindowSeries { window, points }
        })
        .collect();

    HistoricalVolatilityCurve { series }
}

/// Two-pass sample standard deviation (n - 1 denominator).
fn sample_std_dev<I>(values: I, count: usize) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let n = count as f64;
    let mean = values.clone().sum::<f64>() / n;
    let sum_sq = values.map(|value| (value - mean).powi(2)).sum::<f64>();
    (sum_sq / (n - 1.0)).sqrt()
}
