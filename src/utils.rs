//! Utility functions such as interleave/deinterleave

#[cfg(feature = "complex-nums")]
use num_complex::Complex;

#[cfg(feature = "complex-nums")]
use num_traits::Float;

const CHUNK_SIZE: usize = 4;
const DOUBLE_CHUNK: usize = CHUNK_SIZE * 2;

#[multiversion::multiversion(
    targets(
    "x86_64+avx2+fma", // x86_64-v3
    "x86_64+sse4.2", // x86_64-v2
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
    ))]
/// Separates data like `[1, 2, 3, 4]` into `([1, 3], [2, 4])`, writing into the
/// provided buffers
///
/// # Panics
///
/// Panics if either output holds fewer than `input.len() / 2` values
pub fn deinterleave_into<T: Copy>(input: &[T], evens: &mut [T], odds: &mut [T]) {
    let out_len = input.len() / 2;
    let (evens, odds) = (&mut evens[..out_len], &mut odds[..out_len]);

    input
        .chunks_exact(DOUBLE_CHUNK)
        .zip(evens.chunks_exact_mut(CHUNK_SIZE))
        .zip(odds.chunks_exact_mut(CHUNK_SIZE))
        .for_each(|((in_chunk, even), odd)| {
            for i in 0..CHUNK_SIZE {
                even[i] = in_chunk[2 * i];
                odd[i] = in_chunk[2 * i + 1];
            }
        });

    // Process the remainder, too small for the unrolled loop
    let input_rem = input.chunks_exact(DOUBLE_CHUNK).remainder();
    let evens_rem = evens.chunks_exact_mut(CHUNK_SIZE).into_remainder();
    let odds_rem = odds.chunks_exact_mut(CHUNK_SIZE).into_remainder();
    input_rem
        .chunks_exact(2)
        .zip(evens_rem.iter_mut())
        .zip(odds_rem.iter_mut())
        .for_each(|((inp, even), odd)| {
            *even = inp[0];
            *odd = inp[1];
        });
}

#[multiversion::multiversion(
    targets(
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
    ))]
/// Merges `([1, 3], [2, 4])` into `[1, 2, 3, 4]`
///
/// # Panics
///
/// Panics if `evens.len() != odds.len()` or `output` holds fewer than twice as many values
pub fn interleave_into<T: Copy>(evens: &[T], odds: &[T], output: &mut [T]) {
    assert_eq!(evens.len(), odds.len());
    let output = &mut output[..2 * evens.len()];

    output
        .chunks_exact_mut(DOUBLE_CHUNK)
        .zip(evens.chunks_exact(CHUNK_SIZE))
        .zip(odds.chunks_exact(CHUNK_SIZE))
        .for_each(|((out_chunk, even), odd)| {
            for i in 0..CHUNK_SIZE {
                out_chunk[2 * i] = even[i];
                out_chunk[2 * i + 1] = odd[i];
            }
        });

    let evens_rem = evens.chunks_exact(CHUNK_SIZE).remainder();
    let odds_rem = odds.chunks_exact(CHUNK_SIZE).remainder();
    output
        .chunks_exact_mut(DOUBLE_CHUNK)
        .into_remainder()
        .chunks_exact_mut(2)
        .zip(evens_rem.iter().zip(odds_rem.iter()))
        .for_each(|(out, (even, odd))| {
            out[0] = *even;
            out[1] = *odd;
        });
}

/// Separates an interleaved signal into `(reals, imags)`
pub fn deinterleave<T: Copy + Default>(input: &[T]) -> (Vec<T>, Vec<T>) {
    let out_len = input.len() / 2;
    let mut reals = vec![T::default(); out_len];
    let mut imags = vec![T::default(); out_len];
    deinterleave_into(input, &mut reals, &mut imags);
    (reals, imags)
}

/// Merges separate real and imaginary components into one interleaved signal
///
/// # Panics
///
/// Panics if `reals.len() != imags.len()`
pub fn interleave<T: Copy + Default>(reals: &[T], imags: &[T]) -> Vec<T> {
    let mut output = vec![T::default(); 2 * reals.len()];
    interleave_into(reals, imags, &mut output);
    output
}

/// Utility function to combine separate vectors of real and imaginary components
/// into a single vector of Complex Number Structs.
///
/// # Panics
///
/// Panics if `reals.len() != imags.len()`.
#[cfg(feature = "complex-nums")]
pub fn combine_re_im<T: Float>(reals: &[T], imags: &[T]) -> Vec<Complex<T>> {
    assert_eq!(reals.len(), imags.len());

    reals
        .iter()
        .zip(imags.iter())
        .map(|(z_re, z_im)| Complex::new(*z_re, *z_im))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_test_vec(len: usize) -> Vec<usize> {
        (0..len).collect()
    }

    /// Slow but obviously correct implementation of deinterleaving,
    /// to be used in tests
    fn deinterleave_naive<T: Copy>(input: &[T]) -> (Vec<T>, Vec<T>) {
        input.chunks_exact(2).map(|c| (c[0], c[1])).unzip()
    }

    #[test]
    fn deinterleaving_correctness() {
        for len in [0, 1, 2, 3, 15, 16, 17, 127, 128, 129, 130, 135, 100500] {
            let input = gen_test_vec(len);
            let (naive_a, naive_b) = deinterleave_naive(&input);
            let (opt_a, opt_b) = deinterleave(&input);
            assert_eq!(naive_a, opt_a);
            assert_eq!(naive_b, opt_b);
        }
    }

    #[test]
    fn interleaving_inverts_deinterleaving() {
        for len in [0, 2, 14, 16, 18, 130, 1000] {
            let input = gen_test_vec(len);
            let (evens, odds) = deinterleave(&input);
            assert_eq!(interleave(&evens, &odds), input);
        }
    }

    #[cfg(feature = "complex-nums")]
    #[test]
    fn test_separate_and_combine_re_im() {
        let complex_vec: Vec<_> = vec![
            Complex::new(1.0, 2.0),
            Complex::new(3.0, 4.0),
            Complex::new(5.0, 6.0),
            Complex::new(7.0, 8.0),
        ];

        let interleaved: &[f64] = bytemuck::cast_slice(&complex_vec);
        let (reals, imags) = deinterleave(interleaved);

        let recombined_vec = combine_re_im(&reals, &imags);

        assert_eq!(complex_vec, recombined_vec);
    }
}
