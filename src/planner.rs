//! The planner module provides a convenient interface for planning and executing
//! a Fast Fourier Transform (FFT). A [`Plan`] owns every rotation table a transform of
//! one length needs, laid out for one buffer [`Layout`], and the [`Path`] the engine
//! will take.
use std::fmt;
use std::marker::PhantomData;

use crate::error::FftError;
use crate::float::FftFloat;
use crate::layout::{Interleaved, Layout};
use crate::options::Options;
use crate::twiddles::{fill_roots, fill_unpack};

/// Reverse is for running the Inverse Fast Fourier Transform (IFFT)
/// Forward is for running the regular FFT
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// Leave the exponent term in the twiddle factor alone
    Forward = 1,
    /// Multiply the exponent term in the twiddle factor by -1
    Reverse = -1,
}

/// How a transform of a given length executes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Path {
    /// The whole transform is one fused codelet.
    Codelet { size: usize },
    /// Generic ping-pong stages, then codelets over the residual blocks.
    Stockham { stages: usize, codelet: usize },
}

impl Path {
    pub(crate) fn for_length(n: usize, codelet_size: usize) -> Self {
        if n <= codelet_size {
            Path::Codelet { size: n }
        } else {
            Path::Stockham {
                stages: (n / codelet_size).ilog2() as usize,
                codelet: codelet_size,
            }
        }
    }
}

/// Borrowed rotation tables for a transform of length `n`.
#[derive(Clone, Copy)]
pub struct TwiddleView<'a, T> {
    /// Length the tables were computed for.
    pub n: usize,
    /// `W_n^k`, interleaved.
    pub roots: &'a [T],
    /// Per-stage rotations, in the layout's packing.
    pub stages: &'a [T],
    /// Real-adapter rotations `-i * W_n^k` for `k in [0, n/2]`, interleaved.
    pub unpack: &'a [T],
}

/// Number of floats each table occupies for a transform of length `n`.
pub(crate) const fn table_lengths(n: usize) -> (usize, usize, usize) {
    (2 * n, 4 * n, 2 * (n / 2 + 1))
}

/// Compute every table for length `n` into caller-provided storage.
pub(crate) fn fill_tables<T: FftFloat, L: Layout>(
    n: usize,
    roots: &mut [T],
    stages: &mut [T],
    unpack: &mut [T],
) {
    fill_roots(n, roots);
    L::fill_stage_twiddles(n, roots, stages);
    fill_unpack(n, roots, unpack);
}

/// Check a transform length and the options it runs with.
pub(crate) fn validate_length(n: usize) -> Result<(), FftError> {
    if n.is_power_of_two() {
        Ok(())
    } else {
        Err(FftError::NotPowerOfTwo(n))
    }
}

/// Pre-computed rotation tables for every stage of an FFT of one length.
///
/// A plan serves both the complex transform of length `n` and the real-input
/// transform of `n` samples, in both directions.
pub struct Plan<T: FftFloat, L: Layout = Interleaved> {
    n: usize,
    options: Options,
    roots: Vec<T>,
    stages: Vec<T>,
    unpack: Vec<T>,
    layout: PhantomData<L>,
}

impl<T: FftFloat, L: Layout> Plan<T, L> {
    /// Create a `Plan` for an FFT of size `num_points` with options picked for that size.
    pub fn new(num_points: usize) -> Result<Self, FftError> {
        Self::with_options(num_points, Options::guess_options(num_points))
    }

    /// Create a `Plan` for an FFT of size `num_points`.
    pub fn with_options(num_points: usize, options: Options) -> Result<Self, FftError> {
        validate_length(num_points)?;
        options.validate()?;

        let (roots_len, stages_len, unpack_len) = table_lengths(num_points);
        let mut roots = vec![T::zero(); roots_len];
        let mut stages = vec![T::zero(); stages_len];
        let mut unpack = vec![T::zero(); unpack_len];
        fill_tables::<T, L>(num_points, &mut roots, &mut stages, &mut unpack);

        Ok(Self {
            n: num_points,
            options,
            roots,
            stages,
            unpack,
            layout: PhantomData,
        })
    }

    /// Length this plan was computed for.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Path the complex transform of this length takes.
    pub fn path(&self) -> Path {
        Path::for_length(self.n, self.options.codelet_size)
    }

    pub fn view(&self) -> TwiddleView<'_, T> {
        TwiddleView {
            n: self.n,
            roots: &self.roots,
            stages: &self.stages,
            unpack: &self.unpack,
        }
    }
}

impl<T: FftFloat, L: Layout> fmt::Debug for Plan<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("n", &self.n)
            .field("layout", &L::NAME)
            .field("options", &self.options)
            .field("path", &self.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use utilities::assert_float_closeness;

    use super::*;
    use crate::layout::Split;

    #[test]
    fn rejects_non_power_of_two() {
        assert_eq!(
            Plan::<f64>::new(12).unwrap_err(),
            FftError::NotPowerOfTwo(12)
        );
        assert_eq!(Plan::<f32, Split>::new(0).unwrap_err(), FftError::NotPowerOfTwo(0));
    }

    #[test]
    fn path_follows_codelet_threshold() {
        let options = Options::with_codelet_size(16).unwrap();
        let plan = Plan::<f64>::with_options(16, options).unwrap();
        assert_eq!(plan.path(), Path::Codelet { size: 16 });

        let plan = Plan::<f64>::with_options(1024, options).unwrap();
        assert_eq!(
            plan.path(),
            Path::Stockham {
                stages: 6,
                codelet: 16
            }
        );
    }

    macro_rules! test_tables {
        ($test_name:ident, $precision:ty, $layout:ty) => {
            #[test]
            fn $test_name() {
                let plan = Plan::<$precision, $layout>::new(8).unwrap();
                let view = plan.view();
                assert_eq!(view.n, 8);
                assert_eq!(view.roots.len(), 16);
                assert_eq!(view.unpack.len(), 10);

                // W_8^2 = -i
                assert_float_closeness(view.roots[4], 0.0, 1e-6);
                assert_float_closeness(view.roots[5], -1.0, 1e-6);
            }
        };
    }

    test_tables!(tables_64, f64, Interleaved);
    test_tables!(tables_32, f32, Interleaved);
    test_tables!(tables_split_64, f64, Split);
}
