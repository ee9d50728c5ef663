use thiserror::Error;

/// Result type for the classification engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures raised by the deadline and classification engine.
///
/// The engine never substitutes defaults: a bad policy, a bad date or an
/// out-of-range progress value is reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Deadline policy is incomplete or inconsistent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Missing or unparseable instant
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Caller-supplied value that cannot be interpreted
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Numeric input outside its allowed values
    #[error("{field} out of range: {value} (expected {expected})")]
    Range {
        field: &'static str,
        value: i64,
        expected: &'static str,
    },
}
