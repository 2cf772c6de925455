//! Immutable analysis request.

use crate::error::OptionLabError;
use crate::pricing::OptionSide;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user analysis request, built once and passed by reference through the pipeline.
///
/// Deserialization runs the same checks as [`AnalysisRequest::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RequestFields", into = "RequestFields")]
pub struct AnalysisRequest {
    id: Uuid,
    ticker: String,
    side: OptionSide,
    strike: f64,
    premium: f64,
    expiration: NaiveDate,
    valuation_date: NaiveDate,
    risk_free_rate: f64,
}

/// Wire form of [`AnalysisRequest`], unchecked.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RequestFields {
    id: Uuid,
    ticker: String,
    side: OptionSide,
    strike: f64,
    premium: f64,
    expiration: NaiveDate,
    valuation_date: NaiveDate,
    risk_free_rate: f64,
}

impl TryFrom<RequestFields> for AnalysisRequest {
    type Error = OptionLabError;

    fn try_from(fields: RequestFields) -> Result<Self, Self::Error> {
        Self::validated(fields)
    }
}

impl From<AnalysisRequest> for RequestFields {
    fn from(request: AnalysisRequest) -> Self {
        Self {
            id: request.id,
            ticker: request.ticker,
            side: request.side,
            strike: request.strike,
            premium: request.premium,
            expiration: request.expiration,
            valuation_date: request.valuation_date,
            risk_free_rate: request.risk_free_rate,
        }
    }
}

impl AnalysisRequest {
    /// Creates a request from user-entered fields.
    ///
    /// # Errors
    /// [`OptionLabError::InvalidArgument`] naming the first missing or malformed field.
    pub fn new(
        ticker: &str,
        side: &str,
        strike: f64,
        premium: f64,
        expiration: NaiveDate,
        valuation_date: NaiveDate,
        risk_free_rate: f64,
    ) -> Result<Self, OptionLabError> {
        if ticker.trim().is_empty() {
            return Err(OptionLabError::invalid_argument("ticker", "ticker is required"));
        }
        let side = side.parse::<OptionSide>()?;

        Self::validated(RequestFields {
            id: Uuid::new_v4(),
            ticker: ticker.to_string(),
            side,
            strike,
            premium,
            expiration,
            valuation_date,
            risk_free_rate,
        })
    }

    fn validated(fields: RequestFields) -> Result<Self, OptionLabError> {
        let RequestFields {
            id,
            ticker,
            side,
            strike,
            premium,
            expiration,
            valuation_date,
            risk_free_rate,
        } = fields;

        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(OptionLabError::invalid_argument("ticker", "ticker is required"));
        }
        if !strike.is_finite() || strike <= 0.0 {
            return Err(OptionLabError::invalid_argument(
                "strike",
                format!("strike price must be positive, got {strike}"),
            ));
        }
        if !premium.is_finite() || premium <= 0.0 {
            return Err(OptionLabError::invalid_argument(
                "premium",
                format!("premium must be positive, got {premium}"),
            ));
        }
        if expiration < valuation_date {
            return Err(OptionLabError::invalid_argument(
                "expiration",
                format!("expiration {expiration} is before valuation date {valuation_date}"),
            ));
        }
        if !risk_free_rate.is_finite() {
            return Err(OptionLabError::invalid_argument(
                "risk_free_rate",
                format!("risk-free rate must be finite, got {risk_free_rate}"),
            ));
        }

        Ok(Self {
            id,
            ticker: ticker.to_string(),
            side,
            strike,
            premium,
            expiration,
            valuation_date,
            risk_free_rate,
        })
    }

    /// Unique identifier, used to correlate log lines and reports.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Underlying ticker symbol.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Call or put.
    #[must_use]
    pub fn side(&self) -> OptionSide {
        self.side
    }

    /// Strike price.
    #[must_use]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Observed option premium.
    #[must_use]
    pub fn premium(&self) -> f64 {
        self.premium
    }

    /// Expiration date.
    #[must_use]
    pub fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Date the analysis is run as of.
    #[must_use]
    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date
    }

    /// Continuously compounded risk-free rate.
    #[must_use]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Calendar days to expiry over `days_per_year`.
    #[must_use]
    pub fn time_to_expiry(&self, days_per_year: f64) -> f64 {
        let days = (self.expiration - self.valuation_date).num_days();
        (days as f64 / days_per_year).max(0.0)
    }
}
