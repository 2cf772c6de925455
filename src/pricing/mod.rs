//! European option pricing, Greeks and implied volatility.
//!
//! # Overview
//!
//! Implied Volatility (IV) is the option's price translated into different units:
//! the volatility σ that makes the Black-Scholes-Merton price equal the observed
//! premium. There is no closed-form inverse, so the price is inverted with a
//! bracketing root-finder over σ ∈ [1e-6, 5.0].
//!
//! # Numerical guards
//!
//! Pricing and Greeks share one regime classification:
//! - `T ≤ 0`: immediate intrinsic value, max(0, S-K) or max(0, K-S)
//! - `σ ≤ 1e-6` or `σ√T < 1e-8`: discounted intrinsic value
//! - otherwise the closed form
//!
//! # Example
//!
//! ```
//! use optionlab::pricing::{BlackScholes, OptionContract, SolverConfig, solve_iv};
//!
//! let contract = OptionContract::call(100.0, 100.0, 1.0, 0.05).unwrap();
//! let premium = BlackScholes::price(&contract, 0.2);
//! let result = solve_iv(&contract, premium, &SolverConfig::default()).unwrap();
//! assert!((result.iv - 0.2).abs() < 1e-6);
//! ```

mod black_scholes;
mod solver;
mod types;

pub use black_scholes::{
    BlackScholes, GREEKS_EXPIRY_EPSILON, MIN_DENOMINATOR, MIN_VOLATILITY, PricingRegime, greeks,
    price,
};
pub use solver::{IVResult, RootFinder, SolverConfig, implied_volatility, solve_iv};
pub use types::{GreeksResult, Moneyness, OptionContract, OptionSide};
