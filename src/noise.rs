//! Deterministic value noise keyed by `(x, y, seed)`.
//!
//! Two octaves of hashed lattice values, smoothly interpolated. Same inputs always give the same
//! output in `[0, 1]`, there is no state besides the seed.

use crate::GridOffset;

/// Lattice spacing of the coarse octave, in cells.
const COARSE_PERIOD: GridOffset = 8;

/// Lattice spacing of the fine octave, in cells.
const FINE_PERIOD: GridOffset = 3;

const COARSE_WEIGHT: f32 = 0.65;
const FINE_WEIGHT: f32 = 1.0 - COARSE_WEIGHT;

/// Mixed into the seed of the fine octave so both octaves use unrelated lattices.
const FINE_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseField {
    seed: u64,
}

impl NoiseField {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample the field at `(x, y)`. The result is in `[0, 1]`.
    pub fn sample(&self, x: GridOffset, y: GridOffset) -> f32 {
        noise(x, y, self.seed)
    }
}

/// Sample the noise field for `seed` at `(x, y)`. The result is in `[0, 1]`.
pub fn noise(x: GridOffset, y: GridOffset, seed: u64) -> f32 {
    let coarse = value_noise(x, y, COARSE_PERIOD, seed);
    let fine = value_noise(x, y, FINE_PERIOD, seed ^ FINE_SALT);

    (COARSE_WEIGHT * coarse + FINE_WEIGHT * fine).clamp(0.0, 1.0)
}

/// Bilinear interpolation of the lattice values around `(x, y)`, with lattice points every
/// `period` cells.
fn value_noise(x: GridOffset, y: GridOffset, period: GridOffset, seed: u64) -> f32 {
    let (ix, iy) = (x.div_euclid(period), y.div_euclid(period));
    let tx = smoothstep(x.rem_euclid(period) as f32 / period as f32);
    let ty = smoothstep(y.rem_euclid(period) as f32 / period as f32);

    let v00 = lattice(ix, iy, seed);
    let v10 = lattice(ix + 1, iy, seed);
    let v01 = lattice(ix, iy + 1, seed);
    let v11 = lattice(ix + 1, iy + 1, seed);

    let top = lerp(v00, v10, tx);
    let bottom = lerp(v01, v11, tx);

    lerp(top, bottom, ty)
}

/// Value of the lattice point `(ix, iy)`, in `[0, 1]`.
fn lattice(ix: GridOffset, iy: GridOffset, seed: u64) -> f32 {
    let h = hash(ix, iy, seed);

    (h & 0x00FF_FFFF) as f32 / 0x00FF_FFFF as f32
}

/// Splitmix64-style finalizer over the seed and both coordinates.
#[inline]
fn hash(x: GridOffset, y: GridOffset, seed: u64) -> u64 {
    let mut h = seed;
    h = h.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(x as u64);
    h = h.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(y as u64);
    h ^= h >> 30;
    h = h.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94d0_49bb_1331_11eb);
    h ^= h >> 31;
    h
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
