//! Precision variants
//!
//! The `f32` and `f64` paths run the same algorithm. What differs is how values are
//! packed into vector registers:
//!
//! - `f64` packs one complex value per register (`f64x2 = [re, im]`).
//! - `f32` packs two independent complex values per register
//!   (`f32x4 = [re0, im0, re1, im1]`), the *dual-complex* layout. Stage twiddle
//!   tables for this variant are replicated to match, see [`crate::kernels::butterfly`].
//!
//! Split buffers use plain lane vectors over one component (`f64x4`, `f32x8`).
use std::fmt::{Debug, Display};

use num_traits::{Float, FloatConst};
use wide::{f32x4, f32x8, f64x2, f64x4};

use crate::kernels::butterfly::{ComplexVector, LaneVector};

/// Floating point type the transforms are instantiated for.
pub trait FftFloat:
    Float + FloatConst + Default + Debug + Display + Send + Sync + 'static
{
    /// Register type holding interleaved complex values for this precision.
    type Packed: ComplexVector<Self>;
    /// Register type holding one component of several complex values (split layout).
    type Lanes: LaneVector<Self>;

    /// Narrow (or pass through) an `f64` constant.
    fn from_f64(value: f64) -> Self;
}

impl FftFloat for f64 {
    type Packed = f64x2;
    type Lanes = f64x4;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }
}

impl FftFloat for f32 {
    type Packed = f32x4;
    type Lanes = f32x8;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}
