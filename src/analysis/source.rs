//! Price history collaborator.

use crate::historical::PriceSeries;
use chrono::NaiveDate;
use dashmap::DashMap;
use tracing::trace;

/// Supplies daily closes for a ticker.
///
/// Implementations return `None` when the ticker is unknown or no data exists
/// in the range; an absent series is never treated as zero volatility.
pub trait PriceHistorySource {
    /// Fetches closes with dates in `[start, end]`.
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Option<PriceSeries>;
}

impl<T: PriceHistorySource + ?Sized> PriceHistorySource for &T {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Option<PriceSeries> {
        (**self).fetch(ticker, start, end)
    }
}

/// Concurrent in-memory store of price histories keyed by ticker.
///
/// Tickers are matched case-insensitively.
#[derive(Debug, Default)]
pub struct InMemoryPriceSource {
    series: DashMap<String, PriceSeries>,
}

impl InMemoryPriceSource {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the history for a ticker.
    pub fn insert(&self, ticker: &str, series: PriceSeries) {
        trace!("storing {} closes for {}", series.len(), ticker);
        self.series.insert(Self::key(ticker), series);
    }

    /// Removes the history for a ticker.
    pub fn remove(&self, ticker: &str) -> Option<PriceSeries> {
        self.series.remove(&Self::key(ticker)).map(|(_, series)| series)
    }

    /// Returns true if a history is stored for the ticker.
    #[must_use]
    pub fn contains(&self, ticker: &str) -> bool {
        self.series.contains_key(&Self::key(ticker))
    }

    /// Number of stored tickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn key(ticker: &str) -> String {
        ticker.trim().to_ascii_uppercase()
    }
}

impl PriceHistorySource for InMemoryPriceSource {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Option<PriceSeries> {
        let entry = self.series.get(&Self::key(ticker))?;
        let window = entry.between(start, end);
        if window.is_empty() { None } else { Some(window) }
    }
}
