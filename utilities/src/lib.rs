pub extern crate rustfft;

use rand::{distributions::Uniform, prelude::*};
use rustfft::num_complex::Complex;
use rustfft::num_traits::Float;
use rustfft::{FftNum, FftPlanner};

/// Asserts that two fp numbers are approximately equal.
///
/// # Panics
///
/// Panics if `actual` and `expected` are too far from each other
#[allow(dead_code)]
#[track_caller]
pub fn assert_float_closeness<T: Float + std::fmt::Display>(actual: T, expected: T, epsilon: T) {
    if (actual - expected).abs() >= epsilon {
        panic!(
            "Assertion failed: {actual} too far from expected value {expected} (with epsilon {epsilon})",
        );
    }
}

/// Tolerance for comparing transforms of length `n` whose inputs are bounded by 1.
///
/// Rounding error of a radix-2 FFT grows with `log2(n)` per element, and the
/// magnitude of a bin grows with `n`, so the bound scales with both.
pub fn size_scaled_epsilon<T: Float>(n: usize, unit: T) -> T {
    let n_f = T::from(n.max(2)).unwrap();
    unit * n_f * n_f.log2()
}

/// Generate a random, complex, signal in the provided buffers
///
/// # Panics
///
/// Panics if `reals.len() != imags.len()`
pub fn gen_random_signal<T>(reals: &mut [T], imags: &mut [T])
where
    T: Float + rand::distributions::uniform::SampleUniform,
{
    assert_eq!(
        reals.len(),
        imags.len(),
        "Real and imaginary slices must be of equal length"
    );

    let mut rng = thread_rng();

    let uniform_dist = Uniform::new(T::from(-1.0).unwrap(), T::from(1.0).unwrap());
    for (real, imag) in reals.iter_mut().zip(imags.iter_mut()) {
        *real = uniform_dist.sample(&mut rng);
        *imag = uniform_dist.sample(&mut rng);
    }
}

/// Generate a random interleaved complex signal (`re, im, re, im, ...`) of `n` points
pub fn gen_random_interleaved<T>(n: usize) -> Vec<T>
where
    T: Float + rand::distributions::uniform::SampleUniform,
{
    let mut rng = thread_rng();
    let uniform_dist = Uniform::new(T::from(-1.0).unwrap(), T::from(1.0).unwrap());
    (0..2 * n).map(|_| uniform_dist.sample(&mut rng)).collect()
}

/// Generate a random real signal of `n` samples
pub fn gen_random_real<T>(n: usize) -> Vec<T>
where
    T: Float + rand::distributions::uniform::SampleUniform,
{
    let mut rng = thread_rng();
    let uniform_dist = Uniform::new(T::from(-1.0).unwrap(), T::from(1.0).unwrap());
    (0..n).map(|_| uniform_dist.sample(&mut rng)).collect()
}

/// Forward FFT of an interleaved signal computed by RustFFT, returned interleaved
pub fn reference_fft<T: FftNum + Float>(interleaved: &[T]) -> Vec<T> {
    let mut buffer: Vec<Complex<T>> = interleaved
        .chunks_exact(2)
        .map(|c| Complex::new(c[0], c[1]))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);

    buffer.iter().flat_map(|z| [z.re, z.im]).collect()
}
