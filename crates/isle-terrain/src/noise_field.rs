//! Multi-octave Perlin height field with per-octave random offsets.
//!
//! Each octave samples the same Perlin lattice at a different random offset,
//! frequency, and amplitude. The sum is normalized to `[0, 1]` over the whole
//! field, so the output always spans the full range unless it is flat.

use isle_config::TerrainConfig;
use isle_field::HeightField;
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Octave offsets are drawn uniformly from `-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE`.
pub const OCTAVE_OFFSET_RANGE: i32 = 100_000;

/// Replacement for non-positive scales.
const MIN_SCALE: f64 = 1e-4;

/// Value given to every cell of a flat (degenerate) field.
const DEGENERATE_VALUE: f32 = 0.5;

/// Parameters for [`generate_noise_map`].
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// Field width in cells.
    pub width: u32,
    /// Field height in cells.
    pub height: u32,
    /// Feature size in cells. Values `<= 0` are clamped to a small epsilon.
    pub scale: f32,
    /// Number of octaves to accumulate.
    pub octaves: u32,
    /// Amplitude multiplier applied after each octave.
    pub persistence: f32,
    /// Frequency multiplier applied after each octave.
    pub lacunarity: f32,
    /// Added to every octave's random offset.
    pub offset: (f32, f32),
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            scale: 15.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: (0.0, 0.0),
        }
    }
}

impl From<&TerrainConfig> for NoiseParams {
    fn from(config: &TerrainConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            scale: config.noise.scale,
            octaves: config.noise.octaves,
            persistence: config.noise.persistence,
            lacunarity: config.noise.lacunarity,
            offset: config.noise.offset,
        }
    }
}

/// Convenience wrapper that owns the RNG seeding.
pub struct NoiseField;

impl NoiseField {
    /// Generate a normalized noise field from a seed.
    ///
    /// Same seed and parameters always give a bit-identical field.
    pub fn generate(params: &NoiseParams, seed: u64) -> HeightField {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_noise_map(params, &mut rng)
    }
}

/// Generate a normalized noise field, drawing two offsets per octave from `rng`.
///
/// For cell `(x, y)` and octave `o`:
///
/// ```text
/// sample_x = (x - w/2) / scale * freq + offset_x[o] * freq
/// sample_y = (y - h/2) / scale * freq - offset_y[o] * freq
/// ```
///
/// accumulating `amp * perlin(sample_x, sample_y)` with `amp *= persistence`
/// and `freq *= lacunarity` after each octave. The result is remapped from
/// its `[min, max]` to `[0, 1]`; a flat result becomes a constant `0.5`.
pub fn generate_noise_map<R: Rng + ?Sized>(params: &NoiseParams, rng: &mut R) -> HeightField {
    let octave_offsets: Vec<(f64, f64)> = (0..params.octaves)
        .map(|_| {
            let ox = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
            let oy = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
            (
                f64::from(ox) + f64::from(params.offset.0),
                f64::from(oy) + f64::from(params.offset.1),
            )
        })
        .collect();

    let scale = f64::from(params.scale);
    let scale = if scale > 0.0 && scale.is_finite() {
        scale
    } else {
        MIN_SCALE
    };
    let persistence = finite_or(params.persistence, 0.5);
    let lacunarity = finite_or(params.lacunarity, 1.0);

    let perlin = Perlin::new(Perlin::DEFAULT_SEED);
    let half_width = f64::from(params.width) / 2.0;
    let half_height = f64::from(params.height) / 2.0;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut raw = Vec::with_capacity(params.width as usize * params.height as usize);

    for y in 0..params.height {
        for x in 0..params.width {
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut total = 0.0;

            for &(off_x, off_y) in &octave_offsets {
                let sample_x = (f64::from(x) - half_width) / scale * frequency + off_x * frequency;
                let sample_y = (f64::from(y) - half_height) / scale * frequency - off_y * frequency;
                total += perlin.get([sample_x, sample_y]) * amplitude;

                amplitude *= persistence;
                frequency *= lacunarity;
            }

            if total.is_finite() {
                min = min.min(total);
                max = max.max(total);
            }
            raw.push(total);
        }
    }

    let range = max - min;
    let cells: Vec<f32> = if range > 0.0 && range.is_finite() {
        raw.iter()
            .map(|&v| {
                if v.is_finite() {
                    ((v - min) / range).clamp(0.0, 1.0) as f32
                } else {
                    0.0
                }
            })
            .collect()
    } else {
        if !raw.is_empty() {
            debug!(
                width = params.width,
                height = params.height,
                "noise field is flat, using constant {DEGENERATE_VALUE}"
            );
        }
        vec![DEGENERATE_VALUE; raw.len()]
    };

    HeightField::from_fn(params.width, params.height, |x, y| {
        cells[y as usize * params.width as usize + x as usize]
    })
}

fn finite_or(value: f32, fallback: f64) -> f64 {
    if value.is_finite() {
        f64::from(value)
    } else {
        fallback
    }
}
