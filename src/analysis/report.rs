//! Analysis results handed to the presentation layer.

use crate::error::OptionLabError;
use crate::historical::{HistoricalVolatilityCurve, VolatilityPoint};
use crate::pricing::{GreeksResult, OptionSide};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;
use uuid::Uuid;

/// Where implied volatility sits against the latest realized volatilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IvPosition {
    /// IV above every window: the market prices more uncertainty than realized.
    AboveCone,
    /// IV between the lowest and highest window.
    WithinCone,
    /// IV below every window.
    BelowCone,
}

/// Implied volatility compared with the last value of each realized window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvHvComparison {
    /// Latest realized volatility per window.
    pub latest_by_window: Vec<(usize, f64)>,
    /// Lowest latest realized volatility.
    pub min_latest: f64,
    /// Highest latest realized volatility.
    pub max_latest: f64,
    /// Position of IV relative to `[min_latest, max_latest]`.
    pub position: IvPosition,
}

impl IvHvComparison {
    /// Compares `iv` with the curve; `None` when the curve has no rows.
    #[must_use]
    pub fn evaluate(iv: f64, curve: &HistoricalVolatilityCurve) -> Option<Self> {
        let latest_by_window = curve.latest();
        if latest_by_window.is_empty() {
            return None;
        }

        let min_latest = latest_by_window
            .iter()
            .map(|&(_, vol)| vol)
            .fold(f64::INFINITY, f64::min);
        let max_latest = latest_by_window
            .iter()
            .map(|&(_, vol)| vol)
            .fold(f64::NEG_INFINITY, f64::max);

        let position = if iv > max_latest {
            IvPosition::AboveCone
        } else if iv < min_latest {
            IvPosition::BelowCone
        } else {
            IvPosition::WithinCone
        };

        Some(Self {
            latest_by_window,
            min_latest,
            max_latest,
            position,
        })
    }

    /// IV minus the latest realized volatility of `window`.
    #[must_use]
    pub fn spread_to(&self, iv: f64, window: usize) -> Option<f64> {
        self.latest_by_window
            .iter()
            .find(|&&(w, _)| w == window)
            .map(|&(_, vol)| iv - vol)
    }
}

/// One labeled line of the volatility cone chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Legend label, e.g. `HV_20d`.
    pub label: String,
    /// Dated values.
    pub points: Vec<VolatilityPoint>,
}

/// Horizontal reference line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    /// Y value.
    pub value: f64,
    /// Annotation text.
    pub label: String,
}

/// Chart payload for the plotting collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityConeChart {
    /// Chart title.
    pub title: String,
    /// X axis title.
    pub x_axis_title: String,
    /// Y axis title.
    pub y_axis_title: String,
    /// Legend title.
    pub legend_title: String,
    /// One series per realized window.
    pub series: Vec<ChartSeries>,
    /// Implied volatility line.
    pub reference_line: ReferenceLine,
}

/// Complete result of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Identifier of the originating request.
    pub request_id: Uuid,
    /// Underlying ticker.
    pub ticker: String,
    /// Call or put.
    pub side: OptionSide,
    /// Last close of the underlying.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Observed premium.
    pub premium: f64,
    /// Time to expiry in years.
    pub time_to_expiry: f64,
    /// Risk-free rate.
    pub risk_free_rate: f64,
    /// Solved implied volatility.
    pub implied_volatility: f64,
    /// Greeks at the implied volatility.
    pub greeks: GreeksResult,
    /// Realized volatility curve of the underlying.
    pub historical: HistoricalVolatilityCurve,
    /// IV against the latest realized values; `None` when history is too short.
    pub comparison: Option<IvHvComparison>,
}

impl AnalysisReport {
    /// Builds the volatility cone chart: one line per window and the IV as a reference line.
    #[must_use]
    pub fn volatility_cone(&self) -> VolatilityConeChart {
        let series = self
            .historical
            .series()
            .iter()
            .map(|window| ChartSeries {
                label: HistoricalVolatilityCurve::label(window.window),
                points: window.points.clone(),
            })
            .collect();

        VolatilityConeChart {
            title: format!("Volatility cone for {}", self.ticker),
            x_axis_title: "Date".to_string(),
            y_axis_title: "Annualized volatility".to_string(),
            legend_title: "HV windows".to_string(),
            series,
            reference_line: ReferenceLine {
                value: self.implied_volatility,
                label: format!("IV: {:.2}%", self.implied_volatility * 100.0),
            },
        }
    }

    /// Human-readable interpretation of the headline numbers.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "{} {} {:.2} | spot {:.2} | IV {:.2}%",
                self.ticker,
                self.side,
                self.strike,
                self.spot,
                self.implied_volatility * 100.0
            ),
            format!(
                "Delta {:.3}: for each 1.00 rise in the underlying the option moves by about {:.3}.",
                self.greeks.delta, self.greeks.delta
            ),
            format!(
                "Theta {:.4}: the option loses about {:.4} of value per day to time decay.",
                self.greeks.theta_per_day, -self.greeks.theta_per_day
            ),
            format!(
                "Vega {:.4}: value change per one point of volatility. Gamma {:.5}.",
                self.greeks.vega, self.greeks.gamma
            ),
        ];

        match &self.comparison {
            Some(comparison) => {
                let reading = match comparison.position {
                    IvPosition::AboveCone => {
                        "above every realized window: the market prices more uncertainty than \
                         has materialized, the premium looks rich"
                    }
                    IvPosition::WithinCone => "within the range of realized windows",
                    IvPosition::BelowCone => {
                        "below every realized window: the premium looks cheap against realized moves"
                    }
                };
                lines.push(format!(
                    "IV is {reading} (realized {:.2}%-{:.2}%).",
                    comparison.min_latest * 100.0,
                    comparison.max_latest * 100.0
                ));
            }
            None => lines.push("Not enough history for a realized volatility comparison.".to_string()),
        }

        lines
    }
}

/// Format version used for checksum-enabled report packages.
pub const ANALYSIS_REPORT_FORMAT_VERSION: u32 = 1;

/// Wrapper that provides checksum validation for [`AnalysisReport`] instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReportPackage {
    /// Version of the report schema for forward compatibility.
    pub version: u32,
    /// Report payload.
    pub report: AnalysisReport,
    /// Hex-encoded SHA-256 of the serialized report.
    pub checksum: String,
}

impl AnalysisReportPackage {
    /// Creates a new package computing the checksum of the report contents.
    pub fn new(report: AnalysisReport) -> Result<Self, OptionLabError> {
        let checksum = Self::compute_checksum(&report)?;
        trace!("packaged report {} with checksum {}", report.request_id, checksum);

        Ok(Self {
            version: ANALYSIS_REPORT_FORMAT_VERSION,
            report,
            checksum,
        })
    }

    /// Serializes the package to JSON.
    pub fn to_json(&self) -> Result<String, OptionLabError> {
        serde_json::to_string(self).map_err(|error| OptionLabError::SerializationError {
            message: error.to_string(),
        })
    }

    /// Deserializes the package from JSON.
    pub fn from_json(data: &str) -> Result<Self, OptionLabError> {
        serde_json::from_str(data).map_err(|error| OptionLabError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Validates the checksum and version.
    pub fn validate(&self) -> Result<(), OptionLabError> {
        if self.version != ANALYSIS_REPORT_FORMAT_VERSION {
            return Err(OptionLabError::UnsupportedVersion {
                found: self.version,
                expected: ANALYSIS_REPORT_FORMAT_VERSION,
            });
        }

        let computed = Self::compute_checksum(&self.report)?;
        if computed != self.checksum {
            return Err(OptionLabError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: computed,
            });
        }

        Ok(())
    }

    /// Consumes the package and returns the validated report.
    pub fn into_report(self) -> Result<AnalysisReport, OptionLabError> {
        self.validate()?;
        Ok(self.report)
    }

    fn compute_checksum(report: &AnalysisReport) -> Result<String, OptionLabError> {
        let payload =
            serde_json::to_vec(report).map_err(|error| OptionLabError::SerializationError {
                message: error.to_string(),
            })?;

        let mut hasher = Sha256::new();
        hasher.update(payload);

        let checksum_bytes = hasher.finalize();
        Ok(format!("{:x}", checksum_bytes))
    }
}
