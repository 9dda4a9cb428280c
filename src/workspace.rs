//! Fixed-region workspace
//!
//! A [`Workspace`] owns a single arena sized for its capacity once, at construction,
//! and carves it into regions at fixed offsets ([`RegionMap`]):
//!
//! | region    | floats          | contents                                   |
//! |-----------|-----------------|--------------------------------------------|
//! | `data`    | `2 * cap`       | input and output                           |
//! | `scratch` | `2 * cap`       | second ping-pong buffer                    |
//! | `roots`   | `2 * cap`       | `W_n^k`, interleaved                       |
//! | `stages`  | `4 * cap`       | per-stage rotations                        |
//! | `unpack`  | `2 * (cap/2+1)` | real-adapter rotations                     |
//!
//! With the [`Split`] layout, `data` is `re-A | im-A` and `scratch` is `re-B | im-B`,
//! each half `cap` floats long.
//!
//! Transforms take only the length and work in place on `data`. Twiddles must be
//! precomputed for exactly that length first; a new length overwrites them.
use std::fmt;
use std::marker::PhantomData;

use crate::error::FftError;
use crate::float::FftFloat;
use crate::layout::{Interleaved, Layout, Split};
use crate::options::Options;
use crate::planner::{fill_tables, table_lengths, validate_length, Direction, TwiddleView};

/// Element offsets of every workspace region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionMap {
    pub capacity: usize,
    pub data: usize,
    pub scratch: usize,
    pub roots: usize,
    pub stages: usize,
    pub unpack: usize,
    /// Total arena length.
    pub len: usize,
}

impl RegionMap {
    pub const fn new(capacity: usize) -> Self {
        let (roots_len, stages_len, unpack_len) = table_lengths(capacity);
        let data = 0;
        let scratch = data + 2 * capacity;
        let roots = scratch + 2 * capacity;
        let stages = roots + roots_len;
        let unpack = stages + stages_len;
        Self {
            capacity,
            data,
            scratch,
            roots,
            stages,
            unpack,
            len: unpack + unpack_len,
        }
    }

    /// Offsets of `re-A`, `im-A`, `re-B`, `im-B` in the split layout.
    pub const fn split_offsets(&self) -> [usize; 4] {
        [
            self.data,
            self.data + self.capacity,
            self.scratch,
            self.scratch + self.capacity,
        ]
    }
}

struct Regions<'a, T> {
    data: &'a mut [T],
    scratch: &'a mut [T],
    roots: &'a mut [T],
    stages: &'a mut [T],
    unpack: &'a mut [T],
}

/// Transform state over fixed memory regions.
pub struct Workspace<T: FftFloat, L: Layout = Interleaved> {
    arena: Vec<T>,
    map: RegionMap,
    options: Options,
    planned: Option<usize>,
    layout: PhantomData<L>,
}

impl<T: FftFloat, L: Layout> Workspace<T, L> {
    /// Workspace for transforms of up to `capacity` points.
    pub fn new(capacity: usize) -> Self {
        let map = RegionMap::new(capacity);
        Self {
            arena: vec![T::zero(); map.len],
            map,
            options: Options::guess_options(capacity),
            planned: None,
            layout: PhantomData,
        }
    }

    pub fn with_options(capacity: usize, options: Options) -> Result<Self, FftError> {
        options.validate()?;
        let mut workspace = Self::new(capacity);
        workspace.options = options;
        Ok(workspace)
    }

    pub fn capacity(&self) -> usize {
        self.map.capacity
    }

    pub fn region_map(&self) -> &RegionMap {
        &self.map
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Length the cached twiddles belong to, if any.
    pub fn planned(&self) -> Option<usize> {
        self.planned
    }

    /// The primary data region.
    pub fn data(&self) -> &[T] {
        &self.arena[self.map.data..self.map.scratch]
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.arena[self.map.data..self.map.scratch]
    }

    /// The whole arena, addressed by [`RegionMap`] offsets.
    pub fn memory(&self) -> &[T] {
        &self.arena
    }

    fn regions(&mut self) -> Regions<'_, T> {
        let map = self.map;
        let (data, rest) = self.arena.split_at_mut(map.scratch);
        let (scratch, rest) = rest.split_at_mut(map.roots - map.scratch);
        let (roots, rest) = rest.split_at_mut(map.stages - map.roots);
        let (stages, unpack) = rest.split_at_mut(map.unpack - map.stages);
        Regions {
            data,
            scratch,
            roots,
            stages,
            unpack,
        }
    }

    fn check_length(&self, n: usize) -> Result<(), FftError> {
        validate_length(n)?;
        if n > self.map.capacity {
            return Err(FftError::ExceedsCapacity {
                n,
                capacity: self.map.capacity,
            });
        }
        Ok(())
    }

    fn check_planned(&self, n: usize) -> Result<(), FftError> {
        self.check_length(n)?;
        match self.planned {
            None => Err(FftError::NotPrecomputed),
            Some(planned) if planned != n => Err(FftError::StaleTwiddles {
                planned,
                requested: n,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Compute every rotation table for length `n`, replacing the previous ones.
    pub fn precompute_twiddles(&mut self, n: usize) -> Result<(), FftError> {
        self.check_length(n)?;

        let (roots_len, stages_len, unpack_len) = table_lengths(n);
        let Regions {
            roots,
            stages,
            unpack,
            ..
        } = self.regions();
        fill_tables::<T, L>(
            n,
            &mut roots[..roots_len],
            &mut stages[..stages_len],
            &mut unpack[..unpack_len],
        );

        self.planned = Some(n);
        Ok(())
    }

    fn transform(&mut self, n: usize, direction: Direction) -> Result<(), FftError> {
        self.check_planned(n)?;

        let codelet_size = self.options.codelet_size;
        let Regions {
            data,
            scratch,
            roots,
            stages,
            unpack,
        } = self.regions();
        let view = TwiddleView {
            n,
            roots,
            stages,
            unpack,
        };
        L::fft(data, scratch, n, &view, codelet_size, direction);
        Ok(())
    }

    /// Forward complex FFT of the first `n` values of the data region.
    pub fn fft(&mut self, n: usize) -> Result<(), FftError> {
        self.transform(n, Direction::Forward)
    }

    /// Inverse complex FFT of the first `n` values of the data region, scaled by `1/n`.
    pub fn ifft(&mut self, n: usize) -> Result<(), FftError> {
        self.transform(n, Direction::Reverse)
    }

    fn check_real(&self, n: usize) -> Result<(), FftError> {
        if n < 2 {
            return Err(FftError::RealTooShort(n));
        }
        self.check_planned(n)
    }

    /// Forward FFT of `n` real samples at the start of the data region.
    ///
    /// The `n/2 + 1` bins replace them: interleaved as `re, im` pairs, split as
    /// `re-A[0..=n/2]`, `im-A[0..=n/2]`.
    pub fn rfft(&mut self, n: usize) -> Result<(), FftError> {
        self.check_real(n)?;

        let codelet_size = self.options.codelet_size;
        let Regions {
            data,
            scratch,
            roots,
            stages,
            unpack,
        } = self.regions();
        let view = TwiddleView {
            n,
            roots,
            stages,
            unpack,
        };
        L::rfft(data, scratch, n, &view, codelet_size);
        Ok(())
    }

    /// Inverse of [`Workspace::rfft`]: `n/2 + 1` bins back to `n` real samples.
    pub fn irfft(&mut self, n: usize) -> Result<(), FftError> {
        self.check_real(n)?;

        let codelet_size = self.options.codelet_size;
        let Regions {
            data,
            scratch,
            roots,
            stages,
            unpack,
        } = self.regions();
        let view = TwiddleView {
            n,
            roots,
            stages,
            unpack,
        };
        L::irfft(data, scratch, n, &view, codelet_size);
        Ok(())
    }
}

impl<T: FftFloat> Workspace<T, Split> {
    /// `re-A`
    pub fn reals(&self) -> &[T] {
        &self.data()[..self.map.capacity]
    }

    /// `im-A`
    pub fn imags(&self) -> &[T] {
        &self.data()[self.map.capacity..]
    }

    pub fn reals_mut(&mut self) -> &mut [T] {
        self.split_data_mut().0
    }

    pub fn imags_mut(&mut self) -> &mut [T] {
        self.split_data_mut().1
    }

    /// `(re-A, im-A)`
    pub fn split_data_mut(&mut self) -> (&mut [T], &mut [T]) {
        let capacity = self.map.capacity;
        self.data_mut().split_at_mut(capacity)
    }
}

impl<T: FftFloat, L: Layout> fmt::Debug for Workspace<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("layout", &L::NAME)
            .field("map", &self.map)
            .field("options", &self.options)
            .field("planned", &self.planned)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use utilities::{assert_float_closeness, gen_random_interleaved, gen_random_real, reference_fft};

    use super::*;

    #[test]
    fn regions_are_contiguous() {
        let map = RegionMap::new(1024);
        assert_eq!(map.data, 0);
        assert_eq!(map.scratch, 2048);
        assert_eq!(map.roots, 4096);
        assert_eq!(map.stages, 6144);
        assert_eq!(map.unpack, 10240);
        assert_eq!(map.len, 10240 + 1026);
        assert_eq!(map.split_offsets(), [0, 1024, 2048, 3072]);
    }

    #[test]
    fn transforms_require_matching_twiddles() {
        let mut workspace = Workspace::<f64>::new(64);
        assert_eq!(workspace.fft(16), Err(FftError::NotPrecomputed));

        workspace.precompute_twiddles(32).unwrap();
        assert_eq!(
            workspace.fft(16),
            Err(FftError::StaleTwiddles {
                planned: 32,
                requested: 16
            })
        );
        assert_eq!(workspace.fft(32), Ok(()));
    }

    #[test]
    fn lengths_are_checked() {
        let mut workspace = Workspace::<f32, Split>::new(64);
        assert_eq!(
            workspace.precompute_twiddles(128),
            Err(FftError::ExceedsCapacity {
                n: 128,
                capacity: 64
            })
        );
        assert_eq!(
            workspace.precompute_twiddles(48),
            Err(FftError::NotPowerOfTwo(48))
        );

        workspace.precompute_twiddles(1).unwrap();
        assert_eq!(workspace.rfft(1), Err(FftError::RealTooShort(1)));
        assert_eq!(workspace.fft(1), Ok(()));
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = Options { codelet_size: 3 };
        assert_eq!(
            Workspace::<f64>::with_options(64, options).unwrap_err(),
            FftError::InvalidCodeletSize(3)
        );
    }

    #[test]
    fn interleaved_fft_in_place() {
        let n = 256;
        let mut workspace = Workspace::<f64>::new(1024);
        let signal = gen_random_interleaved::<f64>(n);
        let expected = reference_fft(&signal);

        workspace.precompute_twiddles(n).unwrap();
        workspace.data_mut()[..2 * n].copy_from_slice(&signal);
        workspace.fft(n).unwrap();

        workspace.data()[..2 * n]
            .iter()
            .zip(expected.iter())
            .for_each(|(a, e)| assert_float_closeness(*a, *e, 1e-9));

        workspace.ifft(n).unwrap();
        workspace.data()[..2 * n]
            .iter()
            .zip(signal.iter())
            .for_each(|(a, e)| assert_float_closeness(*a, *e, 1e-9));
    }

    #[test]
    fn split_regions_hold_components() {
        let n = 64;
        let mut workspace = Workspace::<f64, Split>::new(128);
        let signal = gen_random_interleaved::<f64>(n);
        let expected = reference_fft(&signal);

        workspace.precompute_twiddles(n).unwrap();
        {
            let (reals, imags) = workspace.split_data_mut();
            for k in 0..n {
                reals[k] = signal[2 * k];
                imags[k] = signal[2 * k + 1];
            }
        }
        workspace.fft(n).unwrap();

        for k in 0..n {
            assert_float_closeness(workspace.reals()[k], expected[2 * k], 1e-9);
            assert_float_closeness(workspace.imags()[k], expected[2 * k + 1], 1e-9);
        }
    }

    #[test]
    fn real_round_trip_both_layouts() {
        let n = 512;
        let samples = gen_random_real::<f64>(n);

        let mut interleaved = Workspace::<f64>::new(n);
        interleaved.precompute_twiddles(n).unwrap();
        interleaved.data_mut()[..n].copy_from_slice(&samples);
        interleaved.rfft(n).unwrap();
        interleaved.irfft(n).unwrap();

        let mut split = Workspace::<f64, Split>::new(n);
        split.precompute_twiddles(n).unwrap();
        split.reals_mut()[..n].copy_from_slice(&samples);
        split.rfft(n).unwrap();
        split.irfft(n).unwrap();

        for i in 0..n {
            assert_float_closeness(interleaved.data()[i], samples[i], 1e-9);
            assert_float_closeness(split.reals()[i], samples[i], 1e-9);
        }
    }

    #[test]
    fn precompute_overwrites_previous_length() {
        let mut workspace = Workspace::<f32>::new(64);
        workspace.precompute_twiddles(64).unwrap();
        workspace.precompute_twiddles(8).unwrap();
        assert_eq!(workspace.planned(), Some(8));

        workspace.data_mut()[..16].copy_from_slice(&[
            1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0,
        ]);
        workspace.fft(8).unwrap();
        assert_float_closeness(workspace.data()[0], 8.0, 1e-5);
        workspace.data()[1..16]
            .iter()
            .for_each(|v| assert_float_closeness(*v, 0.0, 1e-5));
    }
}
