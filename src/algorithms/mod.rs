//! FFT Algorithm Implementations
//!
//! This module contains the transforms assembled from the kernels.
//!
//! ## Available Algorithms
//!
//! - **Stockham**: the complex forward transform. Decimation in frequency between two
//!   ping-pong buffers; input and output are both in natural order.
//!
//! - **Inverse**: the complex inverse, reusing the forward transform through
//!   conjugation.
//!
//! - **Real**: real-input transforms of `n` samples through a complex transform of
//!   `n/2` points.

pub mod inverse;
pub mod real;
pub mod stockham;
