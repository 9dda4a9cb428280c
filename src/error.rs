//! Errors reported at the API boundary.
//!
//! Only plan construction, the workspace and the slice entry points validate their
//! arguments; the kernels underneath assume valid input.

use thiserror::Error;

/// Precondition violated by a transform request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FftError {
    /// Transform lengths must be a non-zero power of two.
    #[error("transform length {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// The requested length does not fit the workspace regions.
    #[error("transform length {n} exceeds the workspace capacity of {capacity}")]
    ExceedsCapacity { n: usize, capacity: usize },

    /// A transform was requested before any twiddles were computed.
    #[error("twiddles have not been precomputed")]
    NotPrecomputed,

    /// The cached twiddles belong to a different length.
    #[error("twiddles were precomputed for length {planned}, but length {requested} was requested")]
    StaleTwiddles { planned: usize, requested: usize },

    /// The real-input transforms need at least two samples.
    #[error("real transforms need at least 2 samples, got {0}")]
    RealTooShort(usize),

    /// A caller-provided buffer has the wrong length.
    #[error("buffer must hold {expected} values, but it holds {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Codelet sizes are powers of two between 2 and 64.
    #[error("codelet size {0} is not a power of two in 2..=64")]
    InvalidCodeletSize(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_lengths() {
        let err = FftError::StaleTwiddles {
            planned: 64,
            requested: 128,
        };
        assert_eq!(
            err.to_string(),
            "twiddles were precomputed for length 64, but length 128 was requested"
        );
        assert_eq!(
            FftError::NotPowerOfTwo(12).to_string(),
            "transform length 12 is not a power of two"
        );
    }
}
