//! Per-request analysis pipeline.
//!
//! This module provides the `OptionAnalyzer`, which turns an
//! [`AnalysisRequest`] plus a price history into an [`AnalysisReport`].

use super::report::{AnalysisReport, IvHvComparison};
use super::request::AnalysisRequest;
use super::source::PriceHistorySource;
use crate::error::OptionLabError;
use crate::historical::{HistoricalVolConfig, historical_volatility_with};
use crate::pricing::{OptionContract, SolverConfig, solve_iv};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Configuration for [`OptionAnalyzer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Implied volatility solver settings.
    pub solver: SolverConfig,
    /// Realized volatility settings.
    pub historical: HistoricalVolConfig,
    /// Calendar days per year used to convert days to expiry into years.
    pub days_per_year: f64,
    /// Calendar days of history requested from the data source.
    pub history_days: i64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            historical: HistoricalVolConfig::default(),
            days_per_year: 365.0,
            history_days: 2 * 365,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the solver configuration.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the realized volatility configuration.
    #[must_use]
    pub fn with_historical(mut self, historical: HistoricalVolConfig) -> Self {
        self.historical = historical;
        self
    }

    /// Sets the calendar basis for time to expiry.
    #[must_use]
    pub fn with_days_per_year(mut self, days_per_year: f64) -> Self {
        self.days_per_year = days_per_year;
        self
    }

    /// Sets the history lookback in calendar days.
    #[must_use]
    pub fn with_history_days(mut self, history_days: i64) -> Self {
        self.history_days = history_days;
        self
    }

    /// Checks every nested setting.
    pub fn validate(&self) -> Result<(), OptionLabError> {
        self.historical.validate()?;
        if !self.days_per_year.is_finite() || self.days_per_year <= 0.0 {
            return Err(OptionLabError::invalid_argument(
                "days_per_year",
                format!("calendar basis must be positive, got {}", self.days_per_year),
            ));
        }
        if self.history_days <= 0 {
            return Err(OptionLabError::invalid_argument(
                "history_days",
                format!("history lookback must be positive, got {}", self.history_days),
            ));
        }
        Ok(())
    }
}

/// Runs the implied volatility, Greeks and realized volatility analysis.
///
/// The analyzer holds configuration only; concurrent calls share nothing.
#[derive(Debug, Clone, Default)]
pub struct OptionAnalyzer {
    config: AnalyzerConfig,
}

impl OptionAnalyzer {
    /// Creates an analyzer with the given configuration.
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes one request.
    ///
    /// Fetches the underlying history, takes the last close as spot, solves
    /// the implied volatility of the premium, evaluates Greeks at that
    /// volatility and computes the realized volatility curve.
    ///
    /// # Errors
    /// - [`OptionLabError::InvalidArgument`] for an invalid configuration
    /// - [`OptionLabError::MissingMarketData`] when the source has no history
    /// - [`OptionLabError::NoRootInBracket`] when the premium is incoherent
    pub fn analyze<S>(
        &self,
        request: &AnalysisRequest,
        source: &S,
    ) -> Result<AnalysisReport, OptionLabError>
    where
        S: PriceHistorySource + ?Sized,
    {
        self.config.validate()?;
        info!(
            "Analyzing {} {} {} (request {})",
            request.ticker(),
            request.side(),
            request.strike(),
            request.id()
        );

        let end = request.valuation_date();
        let start = Duration::try_days(self.config.history_days)
            .and_then(|lookback| end.checked_sub_signed(lookback))
            .ok_or_else(|| {
                OptionLabError::invalid_argument(
                    "history_days",
                    format!(
                        "lookback of {} days from {} is out of range",
                        self.config.history_days, end
                    ),
                )
            })?;
        let series = match source.fetch(request.ticker(), start, end) {
            Some(series) if !series.is_empty() => series,
            _ => {
                warn!("No price history for {}", request.ticker());
                return Err(OptionLabError::MissingMarketData {
                    ticker: request.ticker().to_string(),
                });
            }
        };

        let spot = series
            .last()
            .map(|point| point.close)
            .ok_or_else(|| OptionLabError::MissingMarketData {
                ticker: request.ticker().to_string(),
            })?;
        let time_to_expiry = request.time_to_expiry(self.config.days_per_year);
        debug!(
            "spot {:.4} from {} closes, time to expiry {:.6} years",
            spot,
            series.len(),
            time_to_expiry
        );

        let contract = OptionContract::new(
            spot,
            request.strike(),
            time_to_expiry,
            request.risk_free_rate(),
            request.side(),
        )?;

        let iv = solve_iv(&contract, request.premium(), &self.config.solver)?;
        let greeks = contract.greeks(iv.iv);
        let historical = historical_volatility_with(&series, &self.config.historical);
        let comparison = IvHvComparison::evaluate(iv.iv, &historical);

        if historical.is_empty() {
            warn!(
                "{} closes are not enough for windows {:?}",
                series.len(),
                self.config.historical.windows
            );
        }

        info!(
            "Request {} done: IV {:.2}%, delta {:.3}",
            request.id(),
            iv.iv_percent(),
            greeks.delta
        );

        Ok(AnalysisReport {
            request_id: request.id(),
            ticker: request.ticker().to_string(),
            side: request.side(),
            spot,
            strike: request.strike(),
            premium: request.premium(),
            time_to_expiry,
            risk_free_rate: request.risk_free_rate(),
            implied_volatility: iv.iv,
            greeks,
            historical,
            comparison,
        })
    }
}
