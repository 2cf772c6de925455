//! # optionlab
//!
//! Implied volatility and Greeks of a single European option, set against the
//! realized volatility of its underlying.
//!
//! ## Components
//!
//! - [`pricing`]: Black-Scholes-Merton price and Greeks behind one
//!   stability-guarded core, and a bracketing implied volatility solver.
//! - [`historical`]: annualized rolling standard deviation of log returns.
//! - [`analysis`]: the per-request pipeline, from user inputs and a price
//!   history collaborator to a report and a volatility cone chart payload.
//!
//! ## Example
//!
//! ```
//! use optionlab::prelude::*;
//!
//! let side: OptionSide = "call".parse().unwrap();
//! let premium = price(100.0, 100.0, 1.0, 0.05, 0.2, side);
//! let iv = implied_volatility(premium, 100.0, 100.0, 1.0, 0.05, side).unwrap();
//! let greeks = greeks(100.0, 100.0, 1.0, 0.05, iv, side);
//! assert!((iv - 0.2).abs() < 1e-6);
//! assert!((greeks.delta - 0.6368).abs() < 1e-4);
//! ```
//!
//! ## Assumptions
//!
//! Constant rate and volatility, no dividends, European exercise only.

pub mod analysis;
pub mod error;
pub mod historical;
pub mod pricing;

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::analysis::{
        AnalysisReport, AnalysisReportPackage, AnalysisRequest, AnalyzerConfig,
        InMemoryPriceSource, IvHvComparison, IvPosition, OptionAnalyzer, PriceHistorySource,
        VolatilityConeChart,
    };
    pub use crate::error::OptionLabError;
    pub use crate::historical::{
        HistoricalVolConfig, HistoricalVolatilityCurve, PricePoint, PriceSeries,
        historical_volatility, historical_volatility_with,
    };
    pub use crate::pricing::{
        BlackScholes, GreeksResult, IVResult, Moneyness, OptionContract, OptionSide, RootFinder,
        SolverConfig, greeks, implied_volatility, price, solve_iv,
    };
}

pub use error::OptionLabError;
