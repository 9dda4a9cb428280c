//! FFT Butterfly Kernels
//!
//! This module contains the arithmetic the transforms are built from, generic over the
//! precision (`f32`/`f64`) and over the register type that carries the data.
//!
//! ## Organization
//!
//! - `butterfly`: complex arithmetic over vector registers and the radix-2 butterfly
//! - `codelets`: fully unrolled small-size DFT networks used as the engine's base case

pub mod butterfly;
pub mod codelets;
