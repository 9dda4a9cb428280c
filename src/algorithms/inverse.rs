//! Inverse transforms
//!
//! `IFFT(x) = conj(FFT(conj(x))) / N`: the forward engine and its tables are reused
//! unchanged, only the imaginary parts are negated on the way in and out.
use crate::algorithms::stockham::{fft_interleaved, fft_split};
use crate::float::FftFloat;
use crate::planner::{Direction, TwiddleView};

/// Negate every imaginary part of `n` interleaved values.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
pub fn conjugate<T: FftFloat>(signal: &mut [T]) {
    for z in signal.chunks_exact_mut(2) {
        z[1] = -z[1];
    }
}

/// Multiply by `factor` and conjugate, in one pass over interleaved values.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
pub fn scale_conjugate<T: FftFloat>(signal: &mut [T], factor: T) {
    for z in signal.chunks_exact_mut(2) {
        z[0] = z[0] * factor;
        z[1] = z[1] * -factor;
    }
}

/// Inverse FFT of `n` interleaved values in `data[..2n]`; the result stays in `data`.
pub fn ifft_interleaved<T: FftFloat>(
    data: &mut [T],
    scratch: &mut [T],
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) {
    conjugate(&mut data[..2 * n]);
    fft_interleaved(data, scratch, n, view, codelet_size);
    scale_conjugate(&mut data[..2 * n], T::from_f64(1.0 / n as f64));
}

/// Inverse FFT of `n` split values; the result stays in `data`.
pub fn ifft_split<T: FftFloat>(
    data: (&mut [T], &mut [T]),
    scratch: (&mut [T], &mut [T]),
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) {
    let (reals, imags) = data;
    for z_im in imags[..n].iter_mut() {
        *z_im = -*z_im;
    }

    fft_split((&mut *reals, &mut *imags), scratch, n, view, codelet_size);

    let scaling_factor = T::from_f64(1.0 / n as f64);
    for (z_re, z_im) in reals[..n].iter_mut().zip(imags[..n].iter_mut()) {
        *z_re = *z_re * scaling_factor;
        *z_im = *z_im * -scaling_factor;
    }
}

/// Interleaved complex FFT in either direction.
pub fn transform_interleaved<T: FftFloat>(
    data: &mut [T],
    scratch: &mut [T],
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
    direction: Direction,
) {
    match direction {
        Direction::Forward => fft_interleaved(data, scratch, n, view, codelet_size),
        Direction::Reverse => ifft_interleaved(data, scratch, n, view, codelet_size),
    }
}

/// Split complex FFT in either direction.
pub fn transform_split<T: FftFloat>(
    data: (&mut [T], &mut [T]),
    scratch: (&mut [T], &mut [T]),
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
    direction: Direction,
) {
    match direction {
        Direction::Forward => fft_split(data, scratch, n, view, codelet_size),
        Direction::Reverse => ifft_split(data, scratch, n, view, codelet_size),
    }
}

#[cfg(test)]
mod tests {
    use utilities::{assert_float_closeness, gen_random_interleaved, gen_random_signal};

    use super::*;
    use crate::layout::{Interleaved, Split};
    use crate::options::Options;
    use crate::planner::Plan;

    macro_rules! test_round_trip {
        ($test_name:ident, $precision:ty, $epsilon:literal) => {
            #[test]
            fn $test_name() {
                for log_n in 0..=11 {
                    let n = 1 << log_n;
                    let plan = Plan::<$precision, Interleaved>::new(n).unwrap();
                    let codelet_size = plan.options().codelet_size;
                    let signal = gen_random_interleaved::<$precision>(n);

                    let mut data = signal.clone();
                    let mut scratch = vec![0.0; 2 * n];
                    let view = plan.view();
                    for direction in [Direction::Forward, Direction::Reverse] {
                        transform_interleaved(
                            &mut data,
                            &mut scratch,
                            n,
                            &view,
                            codelet_size,
                            direction,
                        );
                    }

                    data.iter()
                        .zip(signal.iter())
                        .for_each(|(a, e)| assert_float_closeness(*a, *e, $epsilon));
                }
            }
        };
    }

    test_round_trip!(round_trip_f64, f64, 1e-9);
    test_round_trip!(round_trip_f32, f32, 1e-4);

    #[test]
    fn split_round_trip() {
        for log_n in 0..=11 {
            let n = 1 << log_n;
            let options = Options::with_codelet_size(32).unwrap();
            let plan = Plan::<f64, Split>::with_options(n, options).unwrap();
            let (mut reals, mut imags) = (vec![0.0; n], vec![0.0; n]);
            gen_random_signal(&mut reals, &mut imags);
            let (original_re, original_im) = (reals.clone(), imags.clone());

            let (mut scratch_re, mut scratch_im) = (vec![0.0; n], vec![0.0; n]);
            for direction in [Direction::Forward, Direction::Reverse] {
                transform_split(
                    (&mut reals, &mut imags),
                    (&mut scratch_re, &mut scratch_im),
                    n,
                    &plan.view(),
                    32,
                    direction,
                );
            }

            for k in 0..n {
                assert_float_closeness(reals[k], original_re[k], 1e-9);
                assert_float_closeness(imags[k], original_im[k], 1e-9);
            }
        }
    }

    #[test]
    fn inverse_of_flat_spectrum_is_impulse() {
        let n = 8;
        let plan = Plan::<f64>::new(n).unwrap();
        let mut data: Vec<f64> = (0..n).flat_map(|_| [1.0, 0.0]).collect();
        let mut scratch = vec![0.0; 2 * n];
        ifft_interleaved(&mut data, &mut scratch, n, &plan.view(), plan.options().codelet_size);

        assert_float_closeness(data[0], 1.0, 1e-12);
        data[1..]
            .iter()
            .for_each(|v| assert_float_closeness(*v, 0.0, 1e-12));
    }
}
