use crate::error::FftError;
pub use crate::kernels::codelets::MAX_CODELET_SIZE;

/// Options to tune to improve performance depending on the hardware and input size.
///
/// Calling FFT routines without specifying options will automatically select reasonable defaults
/// depending on the input size.
///
/// You only need to tune these options if you are trying to squeeze maximum performance
/// out of a known hardware platform that you can benchmark at varying input sizes.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Block size at which the generic Stockham stages hand over to a fused codelet.
    ///
    /// Any power of two in `2..=64` produces the same output; larger codelets trade
    /// twiddle loads for instruction footprint.
    pub codelet_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { codelet_size: 16 }
    }
}

impl Options {
    /// Options with a specific codelet threshold.
    pub fn with_codelet_size(codelet_size: usize) -> Result<Self, FftError> {
        let options = Self { codelet_size };
        options.validate()?;
        Ok(options)
    }

    /// Pick options for a transform of `input_size` points.
    pub fn guess_options(input_size: usize) -> Options {
        let mut options = Options::default();
        if input_size <= MAX_CODELET_SIZE {
            options.codelet_size = MAX_CODELET_SIZE;
        }
        options
    }

    pub(crate) fn validate(&self) -> Result<(), FftError> {
        if self.codelet_size.is_power_of_two()
            && (2..=MAX_CODELET_SIZE).contains(&self.codelet_size)
        {
            Ok(())
        } else {
            Err(FftError::InvalidCodeletSize(self.codelet_size))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_inputs_run_as_a_single_codelet() {
        assert_eq!(Options::guess_options(32).codelet_size, 64);
        assert_eq!(Options::guess_options(4096).codelet_size, 16);
    }

    #[test]
    fn codelet_size_is_validated() {
        assert!(Options::with_codelet_size(8).is_ok());
        assert_eq!(
            Options::with_codelet_size(12),
            Err(FftError::InvalidCodeletSize(12))
        );
        assert_eq!(
            Options::with_codelet_size(1),
            Err(FftError::InvalidCodeletSize(1))
        );
        assert_eq!(
            Options::with_codelet_size(128),
            Err(FftError::InvalidCodeletSize(128))
        );
    }
}
