/// Errors that abort a whole analysis.
///
/// Every variant describes malformed input. Insufficient data for a single
/// sub-analysis is never an error: that sub-analysis is simply omitted.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("malformed input: table has no columns")]
    NoColumns,
    #[display("malformed input: table has no rows")]
    NoRows,
    #[display("malformed input: row {row} has {found} cells but the header has {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("malformed input: column '{column}' has no values")]
    EmptyColumn { column: String },
    #[display("malformed input: statistics of column '{column}' exceed the floating-point range")]
    OutOfRange { column: String },
    #[display("invalid analysis option: {reason}")]
    InvalidOption { reason: String },
}
