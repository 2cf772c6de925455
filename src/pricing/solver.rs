//! Bracketing solvers for implied volatility calculation.
//!
//! The objective is f(σ) = price(σ) - market_price over a fixed volatility
//! interval. A root exists only when f changes sign across the interval;
//! otherwise the quote is incoherent and the solve reports
//! [`OptionLabError::NoRootInBracket`] instead of extrapolating.

use super::black_scholes::BlackScholes;
use super::types::{OptionContract, OptionSide};
use crate::error::OptionLabError;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Root-finding method used by [`solve_iv`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootFinder {
    /// Brent's method: inverse quadratic interpolation and secant steps,
    /// falling back to bisection whenever a step would leave the bracket.
    #[default]
    Brent,
    /// Plain bisection. Slower, same bracket contract.
    Bisection,
}

/// Configuration for the implied volatility solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Lower volatility bound (default: 1e-6 = 0.0001%).
    pub min_vol: f64,
    /// Upper volatility bound (default: 5.0 = 500%).
    pub max_vol: f64,
    /// Absolute tolerance on volatility.
    pub tolerance: f64,
    /// Maximum iterations before giving up.
    pub max_iterations: u32,
    /// Root-finding method.
    pub method: RootFinder,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_vol: 1e-6,
            max_vol: 5.0,
            tolerance: 1e-12,
            max_iterations: 100,
            method: RootFinder::Brent,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the volatility search interval.
    #[must_use]
    pub fn with_bounds(mut self, min_vol: f64, max_vol: f64) -> Self {
        self.min_vol = min_vol;
        self.max_vol = max_vol;
        self
    }

    /// Sets the root-finding method.
    #[must_use]
    pub fn with_method(mut self, method: RootFinder) -> Self {
        self.method = method;
        self
    }
}

/// Result of an implied volatility solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IVResult {
    /// Implied volatility (e.g. 0.25 = 25%).
    pub iv: f64,
    /// Market price that was inverted.
    pub price_used: f64,
    /// Objective evaluations after the two bracket endpoints.
    pub iterations: u32,
    /// Method that produced the root.
    pub method: RootFinder,
}

impl IVResult {
    /// Returns the IV as a percentage (e.g., 25.0 for 25%).
    #[must_use]
    pub fn iv_percent(&self) -> f64 {
        self.iv * 100.0
    }
}

/// Outcome of a bracketing solve on a generic objective.
enum RootSearch {
    Converged { root: f64, iterations: u32 },
    NotBracketed { f_low: f64, f_high: f64 },
    Exhausted { last: f64 },
}

/// Solves for implied volatility with the configured bracketing method.
///
/// # Errors
/// - [`OptionLabError::InvalidArgument`] for a negative or non-finite market price
///   or an invalid search interval.
/// - [`OptionLabError::NoRootInBracket`] when the market price is not attainable
///   for any volatility in the interval.
/// - [`OptionLabError::ConvergenceFailure`] when the iteration budget runs out.
pub fn solve_iv(
    contract: &OptionContract,
    market_price: f64,
    config: &SolverConfig,
) -> Result<IVResult, OptionLabError> {
    if !market_price.is_finite() || market_price < 0.0 {
        return Err(OptionLabError::invalid_argument(
            "premium",
            format!("market price must be non-negative, got {market_price}"),
        ));
    }
    if !(config.min_vol >= 0.0 && config.max_vol > config.min_vol) {
        return Err(OptionLabError::invalid_argument(
            "solver bounds",
            format!(
                "expected 0 <= min_vol < max_vol, got [{}, {}]",
                config.min_vol, config.max_vol
            ),
        ));
    }

    let objective = |vol: f64| BlackScholes::price(contract, vol) - market_price;

    let search = match config.method {
        RootFinder::Brent => brent(
            objective,
            config.min_vol,
            config.max_vol,
            config.tolerance,
            config.max_iterations,
        ),
        RootFinder::Bisection => bisection(
            objective,
            config.min_vol,
            config.max_vol,
            config.tolerance,
            config.max_iterations,
        ),
    };

    match search {
        RootSearch::Converged { root, iterations } => {
            debug!(
                "implied volatility {:.6} for price {:.4} ({:?}, {} iterations)",
                root, market_price, config.method, iterations
            );
            Ok(IVResult {
                iv: root,
                price_used: market_price,
                iterations,
                method: config.method,
            })
        }
        RootSearch::NotBracketed { f_low, f_high } => {
            warn!(
                "no implied volatility root in [{}, {}] for price {:.4}",
                config.min_vol, config.max_vol, market_price
            );
            Err(OptionLabError::NoRootInBracket {
                target_price: market_price,
                low_price: f_low + market_price,
                high_price: f_high + market_price,
                min_vol: config.min_vol,
                max_vol: config.max_vol,
            })
        }
        RootSearch::Exhausted { last } => Err(OptionLabError::ConvergenceFailure {
            iterations: config.max_iterations,
            last_iv: last,
        }),
    }
}

/// Recovers the volatility that reproduces `target_price` with default solver settings.
///
/// # Errors
/// [`OptionLabError::InvalidArgument`] for malformed contract inputs or price,
/// [`OptionLabError::NoRootInBracket`] when the volatility is undefined.
pub fn implied_volatility(
    target_price: f64,
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    side: OptionSide,
) -> Result<f64, OptionLabError> {
    let contract = OptionContract::new(spot, strike, time_to_expiry, risk_free_rate, side)?;
    solve_iv(&contract, target_price, &SolverConfig::default()).map(|result| result.iv)
}

/// Brent's method on `[low, high]`.
///
/// Keeps a bracketing point `block` with f(block) of opposite sign to the
/// current estimate, so every accepted step stays inside the bracket.
fn brent<F>(f: F, low: f64, high: f64, xtol: f64, max_iterations: u32) -> RootSearch
where
    F: Fn(f64) -> f64,
{
    let rtol = 4.0 * f64::EPSILON;

    let mut x_prev = low;
    let mut x_cur = high;
    let mut f_prev = f(x_prev);
    let mut f_cur = f(x_cur);

    if f_prev == 0.0 {
        return RootSearch::Converged {
            root: x_prev,
            iterations: 0,
        };
    }
    if f_cur == 0.0 {
        return RootSearch::Converged {
            root: x_cur,
            iterations: 0,
        };
    }
    if !(f_prev.is_finite() && f_cur.is_finite()) || f_prev.signum() == f_cur.signum() {
        return RootSearch::NotBracketed {
            f_low: f_prev,
            f_high: f_cur,
        };
    }

    let mut x_block = x_prev;
    let mut f_block = f_prev;
    let mut step_prev = 0.0_f64;
    let mut step_cur = 0.0_f64;
    let mut evaluations = 0u32;

    for _ in 0..max_iterations {
        if f_prev != 0.0 && f_cur != 0.0 && f_prev.signum() != f_cur.signum() {
            x_block = x_prev;
            f_block = f_prev;
            step_prev = x_cur - x_prev;
            step_cur = step_prev;
        }
        if f_block.abs() < f_cur.abs() {
            x_prev = x_cur;
            x_cur = x_block;
            x_block = x_prev;

            f_prev = f_cur;
            f_cur = f_block;
            f_block = f_prev;
        }

        let delta = (xtol + rtol * x_cur.abs()) / 2.0;
        let bisect = (x_block - x_cur) / 2.0;
        if f_cur == 0.0 || bisect.abs() < delta {
            return RootSearch::Converged {
                root: x_cur,
                iterations: evaluations,
            };
        }

        if step_prev.abs() > delta && f_cur.abs() < f_prev.abs() {
            let trial = if x_prev == x_block {
                // secant
                -f_cur * (x_cur - x_prev) / (f_cur - f_prev)
            } else {
                // inverse quadratic
                let d_prev = (f_prev - f_cur) / (x_prev - x_cur);
                let d_block = (f_block - f_cur) / (x_block - x_cur);
                -f_cur * (f_block * d_block - f_prev * d_prev)
                    / (d_block * d_prev * (f_block - f_prev))
            };

            if 2.0 * trial.abs() < step_prev.abs().min(3.0 * bisect.abs() - delta) {
                step_prev = step_cur;
                step_cur = trial;
            } else {
                step_prev = bisect;
                step_cur = bisect;
            }
        } else {
            step_prev = bisect;
            step_cur = bisect;
        }

        x_prev = x_cur;
        f_prev = f_cur;
        if step_cur.abs() > delta {
            x_cur += step_cur;
        } else {
            x_cur += if bisect > 0.0 { delta } else { -delta };
        }
        f_cur = f(x_cur);
        evaluations += 1;
        trace!("brent evaluation {}: x = {}, f = {}", evaluations, x_cur, f_cur);
    }

    RootSearch::Exhausted { last: x_cur }
}

/// Bisection on `[low, high]`.
fn bisection<F>(f: F, mut low: f64, mut high: f64, xtol: f64, max_iterations: u32) -> RootSearch
where
    F: Fn(f64) -> f64,
{
    let mut f_low = f(low);
    let f_high = f(high);

    if f_low == 0.0 {
        return RootSearch::Converged {
            root: low,
            iterations: 0,
        };
    }
    if f_high == 0.0 {
        return RootSearch::Converged {
            root: high,
            iterations: 0,
        };
    }
    if !(f_low.is_finite() && f_high.is_finite()) || f_low.signum() == f_high.signum() {
        return RootSearch::NotBracketed { f_low, f_high };
    }

    let mut evaluations = 0u32;

    for _ in 0..max_iterations {
        let mid = (low + high) / 2.0;
        let f_mid = f(mid);
        evaluations += 1;

        if f_mid == 0.0 || (high - low) / 2.0 < xtol {
            return RootSearch::Converged {
                root: mid,
                iterations: evaluations,
            };
        }

        if f_mid.signum() == f_low.signum() {
            low = mid;
            f_low = f_mid;
        } else {
            high = mid;
        }
    }

    RootSearch::Exhausted {
        last: (low + high) / 2.0,
    }
}
