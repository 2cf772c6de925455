//! Error types for option analysis.

use std::fmt;

/// Errors raised by pricing, calibration and the analysis pipeline.
///
/// Numeric degeneracies (zero time to expiry, vanishing volatility) are never
/// reported here; the pricing core resolves them to intrinsic values.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionLabError {
    /// An input field is malformed or outside its domain.
    InvalidArgument {
        /// Name of the offending field.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// The implied volatility solver could not bracket a root.
    NoRootInBracket {
        /// Observed market price that was inverted.
        target_price: f64,
        /// Model price at the lower volatility bound.
        low_price: f64,
        /// Model price at the upper volatility bound.
        high_price: f64,
        /// Lower volatility bound.
        min_vol: f64,
        /// Upper volatility bound.
        max_vol: f64,
    },

    /// The bracketing solver exhausted its iteration budget.
    ConvergenceFailure {
        /// Number of iterations attempted.
        iterations: u32,
        /// Last volatility estimate before giving up.
        last_iv: f64,
    },

    /// The market-data collaborator returned no price history.
    MissingMarketData {
        /// Ticker that was requested.
        ticker: String,
    },

    /// A report could not be serialized.
    SerializationError {
        /// Underlying serializer message.
        message: String,
    },

    /// A report package could not be deserialized.
    DeserializationError {
        /// Underlying deserializer message.
        message: String,
    },

    /// A report package failed checksum validation.
    ChecksumMismatch {
        /// Checksum stored in the package.
        expected: String,
        /// Checksum recomputed from the payload.
        actual: String,
    },

    /// A report package carries an unknown format version.
    UnsupportedVersion {
        /// Version found in the package.
        found: u32,
        /// Version supported by this build.
        expected: u32,
    },
}

impl OptionLabError {
    /// Shorthand for an [`OptionLabError::InvalidArgument`].
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for outcomes caused by incoherent user input rather than internal faults.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoRootInBracket { .. } | Self::MissingMarketData { .. }
        )
    }
}

impl fmt::Display for OptionLabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionLabError::InvalidArgument { field, message } => {
                write!(f, "invalid argument `{field}`: {message}")
            }
            OptionLabError::NoRootInBracket {
                target_price,
                low_price,
                high_price,
                min_vol,
                max_vol,
            } => {
                write!(
                    f,
                    "implied volatility undefined: price {target_price:.4} is outside the \
                     achievable range [{low_price:.4}, {high_price:.4}] for volatility in \
                     [{min_vol}, {max_vol}]; check that the premium is coherent with moneyness"
                )
            }
            OptionLabError::ConvergenceFailure {
                iterations,
                last_iv,
            } => {
                write!(
                    f,
                    "solver did not converge after {iterations} iterations, last IV: {last_iv:.6}"
                )
            }
            OptionLabError::MissingMarketData { ticker } => {
                write!(f, "cannot analyze ticker {ticker}: no market data available")
            }
            OptionLabError::SerializationError { message } => {
                write!(f, "serialization error: {message}")
            }
            OptionLabError::DeserializationError { message } => {
                write!(f, "deserialization error: {message}")
            }
            OptionLabError::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: expected {expected}, got {actual}")
            }
            OptionLabError::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported report version: {found} (expected {expected})"
                )
            }
        }
    }
}

impl std::error::Error for OptionLabError {}
