//! Butterfly arithmetic over vector registers
//!
//! A register holds `WIDTH` complex values. The interleaved layout uses
//!
//! - [`Complex<T>`]: scalar fallback, one value
//! - `f64x2`: one `f64` value, `[re, im]`
//! - `f32x4`: two `f32` values, `[re0, im0, re1, im1]` (dual-complex)
//!
//! and the split layout uses [`SplitLanes`] over a [`LaneVector`].
//!
//! Rotations are kept *pre-replicated*: a twiddle `w = wr + i*wi` is stored as
//! `re = [wr, wr, ...]` and `im = [-wi, wi, ...]`, so that
//! `t * w = t * re + swap(t) * im`, where `swap` exchanges the two lanes of every
//! complex value. The only shuffle on the hot path is that fixed `swap` of the data.
use num_complex::Complex;
use num_traits::Float;
use wide::{f32x4, f32x8, f64x2, f64x4};

/// Arithmetic on a register of `WIDTH` complex values.
pub trait ComplexArith<T: Float>: Copy {
    /// Complex values held by one register.
    const WIDTH: usize;

    /// A twiddle factor replicated across the register.
    type Rotation: Copy;

    /// Replicate `w_re + i * w_im` across every lane pair.
    fn rotation(w_re: T, w_im: T) -> Self::Rotation;

    fn add(self, other: Self) -> Self;

    fn sub(self, other: Self) -> Self;

    /// Multiply every lane by a real factor.
    fn scale(self, factor: T) -> Self;

    /// Multiply by `-i`: `(re, im) -> (im, -re)`.
    fn mul_neg_i(self) -> Self;

    /// Complex multiply by a pre-replicated twiddle.
    fn rotate(self, w: &Self::Rotation) -> Self;
}

/// A register that can be moved to and from interleaved (`re, im, re, im, ...`) memory.
pub trait ComplexVector<T: Float>: ComplexArith<T> {
    /// Load `WIDTH` consecutive complex values (`2 * WIDTH` floats).
    fn load(src: &[T]) -> Self;

    /// Store `WIDTH` consecutive complex values.
    fn store(self, dst: &mut [T]);

    /// Load `WIDTH` complex values at complex indices `offset + w * stride`.
    fn gather(src: &[T], offset: usize, stride: usize) -> Self;

    /// Load a rotation from a packed stage table (`4 * WIDTH` floats).
    fn load_rotation(src: &[T]) -> Self::Rotation;
}

/// One component (real or imaginary part) of `WIDTH` complex values.
pub trait LaneVector<T: Float>: Copy {
    const WIDTH: usize;

    fn splat(value: T) -> Self;

    fn load(src: &[T]) -> Self;

    fn store(self, dst: &mut [T]);

    /// Load `WIDTH` values at `offset + w * stride`.
    fn gather(src: &[T], offset: usize, stride: usize) -> Self;

    fn add(self, other: Self) -> Self;

    fn sub(self, other: Self) -> Self;

    fn mul(self, other: Self) -> Self;

    fn neg(self) -> Self;
}

/// Radix-2 butterfly: `(a + b, (a - b) * w)`.
#[inline(always)]
pub fn butterfly<T: Float, V: ComplexArith<T>>(a: V, b: V, w: &V::Rotation) -> (V, V) {
    (a.add(b), a.sub(b).rotate(w))
}

/// Write the pre-replicated form of `roots` (`(re, im)` pairs, at most `width` of
/// them) into one packed group of `4 * width` floats.
///
/// Missing trailing roots leave their slots untouched.
pub fn pack_rotations<T: Float>(width: usize, roots: &[(T, T)], out: &mut [T]) {
    debug_assert!(roots.len() <= width);
    let (re_half, im_half) = out.split_at_mut(2 * width);
    for (i, &(w_re, w_im)) in roots.iter().enumerate() {
        re_half[2 * i] = w_re;
        re_half[2 * i + 1] = w_re;
        im_half[2 * i] = -w_im;
        im_half[2 * i + 1] = w_im;
    }
}

impl<T: Float> ComplexArith<T> for Complex<T> {
    const WIDTH: usize = 1;
    type Rotation = Complex<T>;

    #[inline(always)]
    fn rotation(w_re: T, w_im: T) -> Self::Rotation {
        Complex::new(w_re, w_im)
    }

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Complex::new(self.re + other.re, self.im + other.im)
    }

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Complex::new(self.re - other.re, self.im - other.im)
    }

    #[inline(always)]
    fn scale(self, factor: T) -> Self {
        Complex::new(self.re * factor, self.im * factor)
    }

    #[inline(always)]
    fn mul_neg_i(self) -> Self {
        Complex::new(self.im, -self.re)
    }

    #[inline(always)]
    fn rotate(self, w: &Self::Rotation) -> Self {
        // same operation order as the vector paths: t * re + swap(t) * im
        Complex::new(
            self.re * w.re + self.im * -w.im,
            self.im * w.re + self.re * w.im,
        )
    }
}

impl<T: Float> ComplexVector<T> for Complex<T> {
    #[inline(always)]
    fn load(src: &[T]) -> Self {
        Complex::new(src[0], src[1])
    }

    #[inline(always)]
    fn store(self, dst: &mut [T]) {
        dst[0] = self.re;
        dst[1] = self.im;
    }

    #[inline(always)]
    fn gather(src: &[T], offset: usize, _stride: usize) -> Self {
        Complex::new(src[2 * offset], src[2 * offset + 1])
    }

    #[inline(always)]
    fn load_rotation(src: &[T]) -> Self::Rotation {
        // packed as [wr, wr, -wi, wi]
        Complex::new(src[0], src[3])
    }
}

impl ComplexArith<f64> for f64x2 {
    const WIDTH: usize = 1;
    type Rotation = (f64x2, f64x2);

    #[inline(always)]
    fn rotation(w_re: f64, w_im: f64) -> Self::Rotation {
        (f64x2::splat(w_re), f64x2::new([-w_im, w_im]))
    }

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        self - other
    }

    #[inline(always)]
    fn scale(self, factor: f64) -> Self {
        self * f64x2::splat(factor)
    }

    #[inline(always)]
    fn mul_neg_i(self) -> Self {
        let [re, im] = self.to_array();
        f64x2::new([im, -re])
    }

    #[inline(always)]
    fn rotate(self, w: &Self::Rotation) -> Self {
        let [re, im] = self.to_array();
        let swapped = f64x2::new([im, re]);
        self * w.0 + swapped * w.1
    }
}

impl ComplexVector<f64> for f64x2 {
    #[inline(always)]
    fn load(src: &[f64]) -> Self {
        f64x2::new([src[0], src[1]])
    }

    #[inline(always)]
    fn store(self, dst: &mut [f64]) {
        dst[..2].copy_from_slice(&self.to_array());
    }

    #[inline(always)]
    fn gather(src: &[f64], offset: usize, _stride: usize) -> Self {
        f64x2::new([src[2 * offset], src[2 * offset + 1]])
    }

    #[inline(always)]
    fn load_rotation(src: &[f64]) -> Self::Rotation {
        (
            f64x2::new([src[0], src[1]]),
            f64x2::new([src[2], src[3]]),
        )
    }
}

impl ComplexArith<f32> for f32x4 {
    const WIDTH: usize = 2;
    type Rotation = (f32x4, f32x4);

    #[inline(always)]
    fn rotation(w_re: f32, w_im: f32) -> Self::Rotation {
        (
            f32x4::splat(w_re),
            f32x4::new([-w_im, w_im, -w_im, w_im]),
        )
    }

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        self - other
    }

    #[inline(always)]
    fn scale(self, factor: f32) -> Self {
        self * f32x4::splat(factor)
    }

    #[inline(always)]
    fn mul_neg_i(self) -> Self {
        let [re0, im0, re1, im1] = self.to_array();
        f32x4::new([im0, -re0, im1, -re1])
    }

    #[inline(always)]
    fn rotate(self, w: &Self::Rotation) -> Self {
        let [re0, im0, re1, im1] = self.to_array();
        let swapped = f32x4::new([im0, re0, im1, re1]);
        self * w.0 + swapped * w.1
    }
}

impl ComplexVector<f32> for f32x4 {
    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        f32x4::new([src[0], src[1], src[2], src[3]])
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        dst[..4].copy_from_slice(&self.to_array());
    }

    #[inline(always)]
    fn gather(src: &[f32], offset: usize, stride: usize) -> Self {
        let lo = 2 * offset;
        let hi = 2 * (offset + stride);
        f32x4::new([src[lo], src[lo + 1], src[hi], src[hi + 1]])
    }

    #[inline(always)]
    fn load_rotation(src: &[f32]) -> Self::Rotation {
        (
            f32x4::new([src[0], src[1], src[2], src[3]]),
            f32x4::new([src[4], src[5], src[6], src[7]]),
        )
    }
}

/// Scalar stand-in for a lane vector, used when a run is shorter than the register.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar<T>(pub T);

impl<T: Float> LaneVector<T> for Scalar<T> {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn splat(value: T) -> Self {
        Scalar(value)
    }

    #[inline(always)]
    fn load(src: &[T]) -> Self {
        Scalar(src[0])
    }

    #[inline(always)]
    fn store(self, dst: &mut [T]) {
        dst[0] = self.0;
    }

    #[inline(always)]
    fn gather(src: &[T], offset: usize, _stride: usize) -> Self {
        Scalar(src[offset])
    }

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Scalar(self.0 + other.0)
    }

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Scalar(self.0 - other.0)
    }

    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Scalar(self.0 * other.0)
    }

    #[inline(always)]
    fn neg(self) -> Self {
        Scalar(-self.0)
    }
}

macro_rules! impl_lane_vector {
    ($vector:ty, $precision:ty, $lanes:literal) => {
        impl LaneVector<$precision> for $vector {
            const WIDTH: usize = $lanes;

            #[inline(always)]
            fn splat(value: $precision) -> Self {
                <$vector>::splat(value)
            }

            #[inline(always)]
            fn load(src: &[$precision]) -> Self {
                let mut lanes = [0.0; $lanes];
                lanes.copy_from_slice(&src[..$lanes]);
                <$vector>::new(lanes)
            }

            #[inline(always)]
            fn store(self, dst: &mut [$precision]) {
                dst[..$lanes].copy_from_slice(&self.to_array());
            }

            #[inline(always)]
            fn gather(src: &[$precision], offset: usize, stride: usize) -> Self {
                <$vector>::new(core::array::from_fn(|w| src[offset + w * stride]))
            }

            #[inline(always)]
            fn add(self, other: Self) -> Self {
                self + other
            }

            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                self - other
            }

            #[inline(always)]
            fn mul(self, other: Self) -> Self {
                self * other
            }

            #[inline(always)]
            fn neg(self) -> Self {
                -self
            }
        }
    };
}

impl_lane_vector!(f64x4, f64, 4);
impl_lane_vector!(f32x8, f32, 8);

/// Split-layout register: the real and imaginary parts of `L::WIDTH` complex values.
#[derive(Debug, Clone, Copy)]
pub struct SplitLanes<L> {
    pub re: L,
    pub im: L,
}

impl<L> SplitLanes<L> {
    #[inline(always)]
    pub fn gather<T: Float>(reals: &[T], imags: &[T], offset: usize, stride: usize) -> Self
    where
        L: LaneVector<T>,
    {
        SplitLanes {
            re: L::gather(reals, offset, stride),
            im: L::gather(imags, offset, stride),
        }
    }

    #[inline(always)]
    pub fn store<T: Float>(self, reals: &mut [T], imags: &mut [T])
    where
        L: LaneVector<T>,
    {
        self.re.store(reals);
        self.im.store(imags);
    }
}

impl<T: Float, L: LaneVector<T>> ComplexArith<T> for SplitLanes<L> {
    const WIDTH: usize = L::WIDTH;
    type Rotation = (L, L);

    #[inline(always)]
    fn rotation(w_re: T, w_im: T) -> Self::Rotation {
        (L::splat(w_re), L::splat(w_im))
    }

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        SplitLanes {
            re: self.re.add(other.re),
            im: self.im.add(other.im),
        }
    }

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        SplitLanes {
            re: self.re.sub(other.re),
            im: self.im.sub(other.im),
        }
    }

    #[inline(always)]
    fn scale(self, factor: T) -> Self {
        let factor = L::splat(factor);
        SplitLanes {
            re: self.re.mul(factor),
            im: self.im.mul(factor),
        }
    }

    #[inline(always)]
    fn mul_neg_i(self) -> Self {
        SplitLanes {
            re: self.im,
            im: self.re.neg(),
        }
    }

    #[inline(always)]
    fn rotate(self, w: &Self::Rotation) -> Self {
        let (w_re, w_im) = *w;
        SplitLanes {
            re: self.re.mul(w_re).sub(self.im.mul(w_im)),
            im: self.im.mul(w_re).add(self.re.mul(w_im)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_1_SQRT_2;

    use utilities::assert_float_closeness;

    use super::*;

    fn reference_rotate(t: (f64, f64), w: (f64, f64)) -> (f64, f64) {
        (t.0 * w.0 - t.1 * w.1, t.0 * w.1 + t.1 * w.0)
    }

    #[test]
    fn packed_f64_matches_scalar() {
        let t = (0.25, -1.5);
        let w = (FRAC_1_SQRT_2, -FRAC_1_SQRT_2);
        let expected = reference_rotate(t, w);

        let mut packed = [0.0; 4];
        pack_rotations(1, &[w], &mut packed);
        let rotated = f64x2::new([t.0, t.1]).rotate(&f64x2::load_rotation(&packed));
        let [re, im] = rotated.to_array();
        assert_float_closeness(re, expected.0, 1e-15);
        assert_float_closeness(im, expected.1, 1e-15);

        let scalar = Complex::new(t.0, t.1).rotate(&Complex::<f64>::load_rotation(&packed));
        assert_eq!(scalar.re, re);
        assert_eq!(scalar.im, im);
    }

    #[test]
    fn dual_complex_rotates_each_half_independently() {
        let w0 = (0.6_f32, -0.8_f32);
        let w1 = (-0.28_f32, 0.96_f32);
        let mut packed = [0.0_f32; 8];
        pack_rotations(2, &[w0, w1], &mut packed);

        let t = f32x4::new([1.0, 2.0, -3.0, 0.5]);
        let [re0, im0, re1, im1] = t.rotate(&f32x4::load_rotation(&packed)).to_array();

        let e0 = reference_rotate((1.0, 2.0), (w0.0 as f64, w0.1 as f64));
        let e1 = reference_rotate((-3.0, 0.5), (w1.0 as f64, w1.1 as f64));
        assert_float_closeness(re0 as f64, e0.0, 1e-6);
        assert_float_closeness(im0 as f64, e0.1, 1e-6);
        assert_float_closeness(re1 as f64, e1.0, 1e-6);
        assert_float_closeness(im1 as f64, e1.1, 1e-6);
    }

    #[test]
    fn replicated_rotation_matches_packed() {
        let (re, im) = f32x4::rotation(0.6, -0.8);
        let mut packed = [0.0_f32; 8];
        pack_rotations(2, &[(0.6, -0.8), (0.6, -0.8)], &mut packed);
        let (p_re, p_im) = f32x4::load_rotation(&packed);
        assert_eq!(re.to_array(), p_re.to_array());
        assert_eq!(im.to_array(), p_im.to_array());
    }

    #[test]
    fn mul_neg_i_swaps_and_negates() {
        let z = f64x2::new([3.0, 4.0]).mul_neg_i();
        assert_eq!(z.to_array(), [4.0, -3.0]);

        let dual = f32x4::new([1.0, 2.0, 3.0, 4.0]).mul_neg_i();
        assert_eq!(dual.to_array(), [2.0, -1.0, 4.0, -3.0]);

        let split = SplitLanes {
            re: f64x4::new([1.0, 2.0, 3.0, 4.0]),
            im: f64x4::new([5.0, 6.0, 7.0, 8.0]),
        }
        .mul_neg_i();
        assert_eq!(split.re.to_array(), [5.0, 6.0, 7.0, 8.0]);
        assert_eq!(split.im.to_array(), [-1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn butterfly_sum_and_rotated_difference() {
        let a = Complex::new(1.0_f64, 2.0);
        let b = Complex::new(0.5_f64, -1.0);
        let w = <Complex<f64> as ComplexArith<f64>>::rotation(0.0, -1.0);
        let (sum, diff) = butterfly(a, b, &w);
        assert_eq!(sum, Complex::new(1.5, 1.0));
        // (0.5 + 3i) * (-i) = 3 - 0.5i
        assert_float_closeness(diff.re, 3.0, 1e-15);
        assert_float_closeness(diff.im, -0.5, 1e-15);
    }

    #[test]
    fn split_lanes_gather_with_stride() {
        let reals: Vec<f32> = (0..32).map(|i| i as f32).collect();
        let imags: Vec<f32> = (0..32).map(|i| -(i as f32)).collect();
        let lanes = SplitLanes::<f32x8>::gather(&reals, &imags, 1, 4);
        assert_eq!(
            lanes.re.to_array(),
            [1.0, 5.0, 9.0, 13.0, 17.0, 21.0, 25.0, 29.0]
        );
        assert_eq!(lanes.im.to_array()[7], -29.0);
    }
}
