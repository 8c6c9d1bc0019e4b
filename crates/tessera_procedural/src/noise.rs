//! # Layered Noise Synthesis
//!
//! Deterministic scalar fields built by stacking coherent noise waves.
//!
//! ## Determinism Guarantee
//!
//! Given the same waves, scale and offset, [`NoiseGenerator::generate`]
//! produces **exactly** the same field on any platform, any time. The
//! underlying gradient noise uses a fixed permutation table; per-wave
//! variation comes from the wave seed shifting the sample coordinate.

use serde::{Deserialize, Serialize};

/// Deterministic 32-bit seeded PRNG (mulberry32).
///
/// Produces a sequence of `f64` values in `[0, 1)`. Same seed, same
/// sequence. State advances on every draw; callers that need independent
/// streams must construct independent instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    /// Internal 32-bit state, mutated on every draw.
    state: u32,
}

impl Mulberry32 {
    /// Creates a new generator from a 32-bit seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advances the state and returns the next value in `[0, 1)`.
    #[inline]
    pub fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }
}

/// One layer of a multi-layer noise field.
///
/// The seed shifts the sample coordinate so that waves with different
/// seeds decorrelate; frequency stretches the field; amplitude is the
/// layer's weight in the stacked sum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// Coordinate shift applied before sampling.
    pub seed: f64,
    /// Sample coordinate multiplier.
    pub frequency: f64,
    /// Weight of this layer in the amplitude-normalized sum.
    pub amplitude: f64,
}

impl Wave {
    /// Creates a new wave layer.
    #[inline]
    #[must_use]
    pub const fn new(seed: f64, frequency: f64, amplitude: f64) -> Self {
        Self {
            seed,
            frequency,
            amplitude,
        }
    }
}

/// A width x height grid of normalized scalars in `[0, 1]`.
///
/// Produced fresh per generation call; never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    /// Field width in cells.
    width: u32,
    /// Field height in cells.
    height: u32,
    /// Row-major values, `height` rows of `width` cells.
    values: Vec<f64>,
}

impl NoiseField {
    /// Returns the field width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the field height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the value at cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the field.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        assert!(x < self.width && y < self.height, "cell out of field bounds");
        self.values[(y * self.width + x) as usize]
    }
}

/// Stateless layered-noise field synthesizer.
pub struct NoiseGenerator;

impl NoiseGenerator {
    /// Synthesizes a normalized `width` x `height` field.
    ///
    /// Each cell samples every wave at a frequency- and scale-adjusted
    /// coordinate derived from the cell position and `offset`, sums the
    /// amplitude-weighted samples and divides by the amplitude sum, so
    /// the result stays in `[0, 1]` by construction. The offset is in
    /// cell units and is applied *before* scaling, which keeps adjacent
    /// regions seam-free for any scale.
    ///
    /// An empty wave list (or a zero amplitude sum) yields an all-zero
    /// field.
    #[must_use]
    pub fn generate(
        width: u32,
        height: u32,
        scale: f64,
        waves: &[Wave],
        offset: (f64, f64),
    ) -> NoiseField {
        let mut values = Vec::with_capacity((width * height) as usize);

        for y in 0..height {
            for x in 0..width {
                let sample_x = (f64::from(x) + offset.0) * scale;
                let sample_y = (f64::from(y) + offset.1) * scale;

                let mut total = 0.0;
                let mut normalization = 0.0;
                for wave in waves {
                    total += wave.amplitude
                        * perlin(
                            sample_x * wave.frequency + wave.seed,
                            sample_y * wave.frequency + wave.seed,
                        );
                    normalization += wave.amplitude;
                }

                let value = if normalization > 0.0 {
                    total / normalization
                } else {
                    0.0
                };
                values.push(value);
            }
        }

        NoiseField {
            width,
            height,
            values,
        }
    }
}

/// Ken Perlin's reference permutation, fixed for all samplers.
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209,
    76, 132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198,
    173, 186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44,
    154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79,
    113, 224, 232, 178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12,
    191, 179, 162, 241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29,
    24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

/// Looks up the permutation table with automatic wrapping.
#[inline]
fn perm(index: i64) -> usize {
    PERMUTATION[(index & 255) as usize] as usize
}

/// Quintic fade curve, `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation between `a` and `b`.
#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of a hashed gradient direction with `(x, y)`.
#[inline]
fn grad(hash: usize, x: f64, y: f64) -> f64 {
    // 8 gradient directions: axis-aligned and diagonal.
    match hash & 7 {
        0 => x + y,
        1 => x - y,
        2 => -x + y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

/// Samples 2D gradient noise at `(x, y)`, normalized to `[0, 1]`.
#[must_use]
fn perlin(x: f64, y: f64) -> f64 {
    let xi = x.floor() as i64;
    let yi = y.floor() as i64;
    let xf = x - x.floor();
    let yf = y - y.floor();

    let u = fade(xf);
    let v = fade(yf);

    let aa = perm(xi + perm(yi) as i64);
    let ab = perm(xi + perm(yi + 1) as i64);
    let ba = perm(xi + 1 + perm(yi) as i64);
    let bb = perm(xi + 1 + perm(yi + 1) as i64);

    let n = lerp(
        v,
        lerp(u, grad(aa, xf, yf), grad(ba, xf - 1.0, yf)),
        lerp(u, grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0)),
    );

    // Raw gradient noise sits in roughly [-1, 1]; remap and clamp so a
    // single wave already satisfies the [0, 1] field contract.
    ((n + 1.0) * 0.5).clamp(0.0, 1.0)
}
