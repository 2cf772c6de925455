//! Black-Scholes-Merton pricing model and Greeks calculation.
//!
//! Price and sensitivities share one stability-guarded core: the inputs are
//! first classified into a [`PricingRegime`], and only the `Standard` regime
//! evaluates the closed-form expressions. Expired contracts and vanishing
//! volatility collapse to intrinsic values instead of dividing by ~0.

use super::types::{GreeksResult, OptionContract, OptionSide};
use statrs::function::erf::erfc;
use std::f64::consts::{PI, SQRT_2};
use tracing::trace;

/// Volatility at or below which the diffusion term is ignored.
pub const MIN_VOLATILITY: f64 = 1e-6;

/// Floor on σ√T below which d1/d2 are ill-conditioned.
pub const MIN_DENOMINATOR: f64 = 1e-8;

/// Time to expiry (years) substituted when Greeks are requested at expiry.
pub const GREEKS_EXPIRY_EPSILON: f64 = 1e-4;

/// Numerical regime of a parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricingRegime {
    /// Time to expiry is zero or negative: the option is worth its immediate intrinsic value.
    Expired,
    /// Volatility (or σ√T) is too small to matter: the option is worth its discounted intrinsic value.
    Deterministic {
        /// e^(-rT).
        discount: f64,
    },
    /// Closed-form evaluation is well conditioned.
    Standard {
        /// d1 = [ln(S/K) + (r + σ²/2)T] / (σ√T)
        d1: f64,
        /// d2 = d1 - σ√T
        d2: f64,
        /// √T.
        sqrt_time: f64,
        /// e^(-rT).
        discount: f64,
    },
}

/// Black-Scholes-Merton pricing model implementation.
///
/// Provides methods for calculating option prices and Greeks
/// using the Black-Scholes-Merton formula.
pub struct BlackScholes;

impl BlackScholes {
    /// Standard normal cumulative distribution function (CDF).
    ///
    /// Calculates P(Z ≤ x) where Z is a standard normal random variable.
    /// Evaluated through the complementary error function, which keeps
    /// relative precision in the lower tail. Absolute error is below 1e-10.
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * erfc(-x / SQRT_2)
    }

    /// Standard normal probability density function (PDF).
    #[must_use]
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    /// Calculates the d1 parameter of the Black-Scholes formula.
    ///
    /// d1 = [ln(S/K) + (r + σ²/2)T] / (σ√T)
    ///
    /// Unguarded: callers go through [`BlackScholes::regime`] unless they
    /// know σ√T is well away from zero.
    #[must_use]
    pub fn d1(spot: f64, strike: f64, rate: f64, time: f64, vol: f64) -> f64 {
        ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
    }

    /// Calculates the d2 parameter of the Black-Scholes formula.
    ///
    /// d2 = d1 - σ√T
    #[must_use]
    pub fn d2(d1: f64, vol: f64, time: f64) -> f64 {
        d1 - vol * time.sqrt()
    }

    /// Classifies a contract and volatility into a numerical regime.
    ///
    /// Checks run in priority order: expiry, vanishing volatility, then the
    /// σ√T denominator floor.
    #[must_use]
    pub fn regime(contract: &OptionContract, vol: f64) -> PricingRegime {
        Self::regime_at(contract, contract.time_to_expiry, vol)
    }

    fn regime_at(contract: &OptionContract, time: f64, vol: f64) -> PricingRegime {
        if time <= 0.0 {
            return PricingRegime::Expired;
        }

        let discount = (-contract.risk_free_rate * time).exp();
        if vol <= MIN_VOLATILITY {
            return PricingRegime::Deterministic { discount };
        }

        let sqrt_time = time.sqrt();
        let denominator = vol * sqrt_time;
        if denominator < MIN_DENOMINATOR {
            return PricingRegime::Deterministic { discount };
        }

        let d1 = ((contract.spot / contract.strike).ln()
            + (contract.risk_free_rate + 0.5 * vol * vol) * time)
            / denominator;
        let d2 = d1 - denominator;

        PricingRegime::Standard {
            d1,
            d2,
            sqrt_time,
            discount,
        }
    }

    /// Calculates the theoretical option price.
    ///
    /// For calls: C = S·N(d1) - K·e^(-rT)·N(d2)
    /// For puts:  P = K·e^(-rT)·N(-d2) - S·N(-d1)
    ///
    /// Expired contracts return max(0, S-K) / max(0, K-S); degenerate
    /// volatility returns the discounted intrinsic value. The result is
    /// never negative.
    #[must_use]
    pub fn price(contract: &OptionContract, vol: f64) -> f64 {
        let regime = Self::regime(contract, vol);
        trace!("price regime: {:?}", regime);

        match regime {
            PricingRegime::Expired => contract.intrinsic_value(),
            PricingRegime::Deterministic { discount } => {
                Self::discounted_intrinsic(contract, discount)
            }
            PricingRegime::Standard { d1, d2, discount, .. } => {
                let spot = contract.spot;
                let pv_strike = contract.strike * discount;
                let value = match contract.side {
                    OptionSide::Call => spot * Self::norm_cdf(d1) - pv_strike * Self::norm_cdf(d2),
                    OptionSide::Put => pv_strike * Self::norm_cdf(-d2) - spot * Self::norm_cdf(-d1),
                };
                value.max(0.0)
            }
        }
    }

    /// Calculates delta, gamma, vega (per vol point) and daily theta.
    ///
    /// At expiry the time to expiry is replaced by [`GREEKS_EXPIRY_EPSILON`],
    /// so values there are smoothed approximations rather than intrinsic
    /// derivatives. When volatility is degenerate the analytical σ→0 limits
    /// are returned: delta is the in-the-money indicator against the
    /// discounted strike, gamma and vega vanish, and theta is the carry on
    /// the discounted strike.
    ///
    /// Spot must be positive; this is not checked here.
    #[must_use]
    pub fn greeks(contract: &OptionContract, vol: f64) -> GreeksResult {
        let time = if contract.time_to_expiry <= 0.0 {
            GREEKS_EXPIRY_EPSILON
        } else {
            contract.time_to_expiry
        };

        let regime = Self::regime_at(contract, time, vol);
        trace!("greeks regime: {:?} (time {})", regime, time);

        match regime {
            // Unreachable after the epsilon substitution; treated like the deterministic case.
            PricingRegime::Expired => Self::deterministic_greeks(contract, 1.0),
            PricingRegime::Deterministic { discount } => {
                Self::deterministic_greeks(contract, discount)
            }
            PricingRegime::Standard {
                d1,
                d2,
                sqrt_time,
                discount,
            } => {
                let spot = contract.spot;
                let rate = contract.risk_free_rate;
                let pdf_d1 = Self::norm_pdf(d1);

                let delta = match contract.side {
                    OptionSide::Call => Self::norm_cdf(d1),
                    OptionSide::Put => -Self::norm_cdf(-d1),
                };
                let gamma = pdf_d1 / (spot * vol * sqrt_time);
                let vega = 0.01 * spot * pdf_d1 * sqrt_time;

                let term1 = -(spot * pdf_d1 * vol) / (2.0 * sqrt_time);
                let carry = rate * contract.strike * discount;
                let theta_annual = match contract.side {
                    OptionSide::Call => term1 - carry * Self::norm_cdf(d2),
                    OptionSide::Put => term1 + carry * Self::norm_cdf(-d2),
                };

                GreeksResult {
                    delta,
                    gamma,
                    vega,
                    theta_per_day: theta_annual / 365.0,
                }
            }
        }
    }

    fn discounted_intrinsic(contract: &OptionContract, discount: f64) -> f64 {
        let pv_strike = contract.strike * discount;
        match contract.side {
            OptionSide::Call => (contract.spot - pv_strike).max(0.0),
            OptionSide::Put => (pv_strike - contract.spot).max(0.0),
        }
    }

    fn deterministic_greeks(contract: &OptionContract, discount: f64) -> GreeksResult {
        let pv_strike = contract.strike * discount;
        let carry = contract.risk_free_rate * pv_strike;

        let (delta, theta_annual) = match contract.side {
            OptionSide::Call if contract.spot > pv_strike => (1.0, -carry),
            OptionSide::Put if contract.spot < pv_strike => (-1.0, carry),
            _ => (0.0, 0.0),
        };

        GreeksResult {
            delta,
            gamma: 0.0,
            vega: 0.0,
            theta_per_day: theta_annual / 365.0,
        }
    }
}

/// Prices a European option from raw parameters.
///
/// See [`BlackScholes::price`] for the degeneracy handling.
#[must_use]
pub fn price(
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    vol: f64,
    side: OptionSide,
) -> f64 {
    let contract = OptionContract {
        spot,
        strike,
        time_to_expiry,
        risk_free_rate,
        side,
    };
    BlackScholes::price(&contract, vol)
}

/// Computes Greeks from raw parameters.
///
/// See [`BlackScholes::greeks`] for the behavior at expiry and at zero volatility.
#[must_use]
pub fn greeks(
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    vol: f64,
    side: OptionSide,
) -> GreeksResult {
    let contract = OptionContract {
        spot,
        strike,
        time_to_expiry,
        risk_free_rate,
        side,
    };
    BlackScholes::greeks(&contract, vol)
}

impl OptionContract {
    /// Model price of this contract at the given volatility.
    #[must_use]
    pub fn price(&self, vol: f64) -> f64 {
        BlackScholes::price(self, vol)
    }

    /// Greeks of this contract at the given volatility.
    #[must_use]
    pub fn greeks(&self, vol: f64) -> GreeksResult {
        BlackScholes::greeks(self, vol)
    }
}
