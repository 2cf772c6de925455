//! Single-contract option analysis.
//!
//! A caller builds an [`AnalysisRequest`] from user-entered fields, supplies a
//! [`PriceHistorySource`], and receives an [`AnalysisReport`] with the implied
//! volatility, Greeks at that volatility, and the realized volatility curve of
//! the underlying for side-by-side comparison.

mod analyzer;
mod report;
mod request;
mod source;

pub use analyzer::{AnalyzerConfig, OptionAnalyzer};
pub use report::{
    ANALYSIS_REPORT_FORMAT_VERSION, AnalysisReport, AnalysisReportPackage, ChartSeries,
    IvHvComparison, IvPosition, ReferenceLine, VolatilityConeChart,
};
pub use request::AnalysisRequest;
pub use source::{InMemoryPriceSource, PriceHistorySource};
