//! Contract and result types for option pricing.

use crate::error::OptionLabError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    /// Call option (right to buy the underlying at strike price).
    Call,
    /// Put option (right to sell the underlying at strike price).
    Put,
}

impl FromStr for OptionSide {
    type Err = OptionLabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionSide::Call),
            "put" => Ok(OptionSide::Put),
            other => Err(OptionLabError::invalid_argument(
                "side",
                format!("expected `call` or `put`, got `{other}`"),
            )),
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Call => write!(f, "call"),
            OptionSide::Put => write!(f, "put"),
        }
    }
}

/// Relationship between spot and strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Moneyness {
    /// Positive intrinsic value.
    InTheMoney,
    /// Spot within 0.1% of strike.
    AtTheMoney,
    /// No intrinsic value and not at the money.
    OutOfTheMoney,
}

/// A single European option under constant rate and volatility.
///
/// Construct through [`OptionContract::new`], which rejects non-positive
/// spot or strike, negative time to expiry and non-finite inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying spot price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to expiration in years. Zero means at expiry.
    pub time_to_expiry: f64,
    /// Continuously compounded risk-free rate (annualized, e.g. 0.05 for 5%).
    pub risk_free_rate: f64,
    /// Call or put.
    pub side: OptionSide,
}

impl OptionContract {
    /// Creates a validated contract.
    ///
    /// # Errors
    /// Returns [`OptionLabError::InvalidArgument`] naming the first bad field.
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        side: OptionSide,
    ) -> Result<Self, OptionLabError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(OptionLabError::invalid_argument(
                "spot",
                format!("spot price must be positive, got {spot}"),
            ));
        }
        if !strike.is_finite() || strike <= 0.0 {
            return Err(OptionLabError::invalid_argument(
                "strike",
                format!("strike price must be positive, got {strike}"),
            ));
        }
        if !time_to_expiry.is_finite() || time_to_expiry < 0.0 {
            return Err(OptionLabError::invalid_argument(
                "time_to_expiry",
                format!("time to expiry must be non-negative, got {time_to_expiry}"),
            ));
        }
        if !risk_free_rate.is_finite() {
            return Err(OptionLabError::invalid_argument(
                "risk_free_rate",
                format!("risk-free rate must be finite, got {risk_free_rate}"),
            ));
        }

        Ok(Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            side,
        })
    }

    /// Creates a validated call contract.
    pub fn call(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
    ) -> Result<Self, OptionLabError> {
        Self::new(spot, strike, time_to_expiry, risk_free_rate, OptionSide::Call)
    }

    /// Creates a validated put contract.
    pub fn put(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
    ) -> Result<Self, OptionLabError> {
        Self::new(spot, strike, time_to_expiry, risk_free_rate, OptionSide::Put)
    }

    /// Discount factor e^(-rT).
    #[must_use]
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_expiry.max(0.0)).exp()
    }

    /// Immediate exercise value.
    ///
    /// For calls: max(0, spot - strike)
    /// For puts: max(0, strike - spot)
    #[must_use]
    pub fn intrinsic_value(&self) -> f64 {
        match self.side {
            OptionSide::Call => (self.spot - self.strike).max(0.0),
            OptionSide::Put => (self.strike - self.spot).max(0.0),
        }
    }

    /// Intrinsic value against the discounted strike; the zero-volatility price.
    #[must_use]
    pub fn discounted_intrinsic_value(&self) -> f64 {
        let discounted_strike = self.strike * self.discount_factor();
        match self.side {
            OptionSide::Call => (self.spot - discounted_strike).max(0.0),
            OptionSide::Put => (discounted_strike - self.spot).max(0.0),
        }
    }

    /// Model-free premium bounds `(lower, upper)`.
    ///
    /// Calls trade in `[max(0, S - K·e^(-rT)), S]`, puts in
    /// `[max(0, K·e^(-rT) - S), K·e^(-rT)]`.
    #[must_use]
    pub fn no_arbitrage_bounds(&self) -> (f64, f64) {
        let upper = match self.side {
            OptionSide::Call => self.spot,
            OptionSide::Put => self.strike * self.discount_factor(),
        };
        (self.discounted_intrinsic_value(), upper)
    }

    /// Classifies the contract by moneyness.
    #[must_use]
    pub fn moneyness(&self) -> Moneyness {
        if (self.spot - self.strike).abs() / self.strike < 0.001 {
            Moneyness::AtTheMoney
        } else if self.intrinsic_value() > 0.0 {
            Moneyness::InTheMoney
        } else {
            Moneyness::OutOfTheMoney
        }
    }
}

/// First-order sensitivities plus gamma.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreeksResult {
    /// ∂price/∂S.
    pub delta: f64,
    /// ∂²price/∂S².
    pub gamma: f64,
    /// Price change per one percentage point of volatility.
    pub vega: f64,
    /// Price change per calendar day.
    pub theta_per_day: f64,
}

impl GreeksResult {
    /// Theta per year (calendar basis of 365 days).
    #[must_use]
    pub fn theta_annual(&self) -> f64 {
        self.theta_per_day * 365.0
    }
}
