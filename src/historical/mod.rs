//! Realized (historical) volatility of the underlying.
//!
//! Realized volatility is the annualized sample standard deviation of daily
//! log returns over a trailing window. It is an empirical baseline, shown side
//! by side with implied volatility; it never feeds back into pricing.

mod estimator;
mod series;

pub use estimator::{
    DEFAULT_WINDOWS, HistoricalVolConfig, HistoricalVolatilityCurve, TRADING_DAYS_PER_YEAR,
    VolatilityPoint, WindowSeries, historical_volatility, historical_volatility_with,
};
pub use series::{PricePoint, PriceSeries};
