//! Height remapping curves applied to normalized field values before vertical scaling.

/// A remapping of normalized height `[0, 1]` to a vertical factor.
///
/// Implemented for plain closures so callers can pass any function, and for
/// [`KeyframeCurve`] for data-driven curves loaded from configuration.
pub trait HeightCurve {
    /// Evaluate the curve at `t`.
    fn evaluate(&self, t: f32) -> f32;
}

impl<F> HeightCurve for F
where
    F: Fn(f32) -> f32,
{
    fn evaluate(&self, t: f32) -> f32 {
        self(t)
    }
}

/// Piecewise-linear curve through `(time, value)` keys.
///
/// Keys are kept sorted by time. Inputs before the first key or after the
/// last key evaluate to that key's value. An empty curve is the identity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeCurve {
    keys: Vec<(f32, f32)>,
}

impl KeyframeCurve {
    /// Build a curve from unordered keys. Keys with a non-finite component are dropped.
    pub fn new(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let mut keys: Vec<(f32, f32)> = keys
            .into_iter()
            .filter(|(t, v)| t.is_finite() && v.is_finite())
            .collect();
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    /// Straight line from `(0, 0)` to `(1, 1)`.
    pub fn linear() -> Self {
        Self::new([(0.0, 0.0), (1.0, 1.0)])
    }

    /// The sorted keys.
    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }
}

impl HeightCurve for KeyframeCurve {
    fn evaluate(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return t;
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        for pair in self.keys.windows(2) {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return v1;
                }
                return v0 + (v1 - v0) * ((t - t0) / span);
            }
        }
        last.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_curve() {
        let square = |t: f32| t * t;
        assert_eq!(square.evaluate(0.5), 0.25);
    }

    #[test]
    fn test_empty_curve_is_identity() {
        let curve = KeyframeCurve::default();
        assert_eq!(curve.evaluate(0.37), 0.37);
    }

    #[test]
    fn test_keys_are_sorted_and_interpolated() {
        let curve = KeyframeCurve::new([(1.0, 1.0), (0.0, 0.0), (0.3, 0.0)]);
        assert_eq!(curve.keys()[1], (0.3, 0.0));
        assert_eq!(curve.evaluate(0.1), 0.0);
        let mid = curve.evaluate(0.65);
        assert!((mid - 0.5).abs() < 1e-6, "expected 0.5, got {mid}");
    }

    #[test]
    fn test_curve_clamps_outside_key_range() {
        let curve = KeyframeCurve::new([(0.2, 0.1), (0.8, 0.9)]);
        assert_eq!(curve.evaluate(-1.0), 0.1);
        assert_eq!(curve.evaluate(2.0), 0.9);
    }
}
