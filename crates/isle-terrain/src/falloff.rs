//! Radial island mask.
//!
//! The mask is 1 in the middle of the field and eases to 0 towards the
//! border, measured in Chebyshev distance so the island fills a square.

use isle_field::HeightField;
use tracing::debug;

/// Falloff value for a normalized distance `t` in `[0, 1]`.
///
/// Returns 1 below `start`, 0 above `end`, and an inverted smoothstep in
/// between. `start` and `end` must already be sanitized (`start <= end`).
pub fn falloff_value(t: f32, start: f32, end: f32) -> f32 {
    if t < start {
        return 1.0;
    }
    if t > end {
        return 0.0;
    }
    let span = end - start;
    if span <= 0.0 {
        return 1.0;
    }
    let s = ((t - start) / span).clamp(0.0, 1.0);
    1.0 - s * s * (3.0 - 2.0 * s)
}

/// Generate a `width x height` falloff mask.
///
/// Cell `(x, y)` maps to `(x / w * 2 - 1, y / h * 2 - 1)` and its distance is
/// the larger absolute coordinate. Bounds outside `[0, 1]` are clamped; an
/// inverted band is collapsed onto `end`.
pub fn generate_falloff_map(width: u32, height: u32, start: f32, end: f32) -> HeightField {
    let (start, end) = sanitize_band(start, end);

    HeightField::from_fn(width, height, |x, y| {
        let x_pos = x as f32 / width as f32 * 2.0 - 1.0;
        let y_pos = y as f32 / height as f32 * 2.0 - 1.0;
        let t = x_pos.abs().max(y_pos.abs());
        falloff_value(t, start, end)
    })
}

fn sanitize_band(start: f32, end: f32) -> (f32, f32) {
    let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 };
    let (s, e) = (clamp(start), clamp(end));
    if (s, e) != (start, end) || s > e {
        debug!(start, end, "falloff band adjusted to [{}, {}]", s.min(e), e);
    }
    (s.min(e), e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_one_and_corner_is_zero() {
        let field = generate_falloff_map(20, 20, 0.5, 0.95);
        assert_eq!(*field.get(10, 10).unwrap(), 1.0);
        assert_eq!(*field.get(0, 0).unwrap(), 0.0);
        assert!(field.is_normalized());
    }

    #[test]
    fn test_monotonic_in_chebyshev_distance() {
        let (start, end) = (0.2, 0.9);
        let mut prev = f32::INFINITY;
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let v = falloff_value(t, start, end);
            assert!(v <= prev, "falloff rose at t={t}: {v} > {prev}");
            prev = v;
        }
    }

    #[test]
    fn test_symmetric_square_contours() {
        let field = generate_falloff_map(16, 16, 0.3, 0.8);
        // (2, 8) and (8, 2) sit at the same Chebyshev distance.
        assert_eq!(field.get(2, 8), field.get(8, 2));
        // Moving along a square ring keeps the value.
        assert_eq!(field.get(2, 2), field.get(2, 12));
    }

    #[test]
    fn test_band_midpoint_is_half() {
        let v = falloff_value(0.5, 0.25, 0.75);
        assert!((v - 0.5).abs() < 1e-6, "expected 0.5, got {v}");
    }

    #[test]
    fn test_inverted_band_collapses_to_end() {
        let field = generate_falloff_map(10, 10, 0.9, 0.4);
        for &v in field.cells() {
            assert!(v == 0.0 || v == 1.0, "degenerate band should be a step, got {v}");
        }
        // t = 0.4 exactly sits on the zero-width band.
        assert_eq!(falloff_value(0.4, 0.4, 0.4), 1.0);
        assert_eq!(falloff_value(0.41, 0.4, 0.4), 0.0);
    }

    #[test]
    fn test_out_of_range_bounds_are_clamped() {
        let field = generate_falloff_map(8, 8, -1.0, 3.0);
        assert!(field.is_normalized());
        let nan = generate_falloff_map(8, 8, f32::NAN, f32::NAN);
        assert!(nan.cells().iter().all(|&v| v == 1.0));
    }
}
