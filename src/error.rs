use thiserror::Error;

/// Rejection of an indicator configuration.
///
/// Returned by the fallible constructors (`try_build`, `try_new`). The
/// infallible counterparts panic with the same message.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// EMA smoothing must be finite and positive.
    #[error("ema smoothing must be finite and positive, got {0}")]
    InvalidSmoothing(f64),

    /// Scale factor must be finite.
    #[error("scale factor must be finite, got {0}")]
    InvalidScaleFactor(f64),
}
