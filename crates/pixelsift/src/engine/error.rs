use thiserror::Error;

/// Failure taxonomy for the comparison pipeline.
///
/// Validation failures surface before any pixel work. Failures the
/// pipeline cannot type precisely are wrapped once, at the facade
/// boundary, as `Comparison` with the original cause attached. All
/// failures here are deterministic for identical inputs, so nothing is
/// ever retried.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Missing or malformed required input, rejected before processing.
    #[error("invalid input: {0}")]
    Validation(String),

    /// An input's shape could not be normalized to a pixel buffer.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Zero-area image after decode or resize.
    #[error("empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Any other failure during canonicalize -> diff -> cluster -> evaluate.
    #[error("comparison failed: {source}")]
    Comparison {
        #[source]
        source: anyhow::Error,
    },
}
