//! Elementwise field arithmetic.

use isle_field::{FieldError, HeightField};

/// Multiply two fields cell by cell.
///
/// Both fields must have the same dimensions.
pub fn multiply(a: &HeightField, b: &HeightField) -> Result<HeightField, FieldError> {
    a.ensure_same_shape(b)?;
    let cells = a
        .cells()
        .iter()
        .zip(b.cells())
        .map(|(x, y)| x * y)
        .collect();
    HeightField::from_vec(a.width(), a.height(), cells)
}

/// Remap every cell from `[0, 1]` to `[min, max]`.
pub fn scale(field: &HeightField, min: f32, max: f32) -> HeightField {
    field.map(|&v| min + (max - min) * v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply() {
        let a = HeightField::from_vec(2, 2, vec![1.0, 0.5, 0.25, 0.0]).unwrap();
        let b = HeightField::from_vec(2, 2, vec![0.5, 0.5, 1.0, 1.0]).unwrap();
        let product = multiply(&a, &b).unwrap();
        assert_eq!(product.cells(), &[0.5, 0.25, 0.25, 0.0]);
    }

    #[test]
    fn test_multiply_rejects_mismatched_shapes() {
        let a = HeightField::filled(3, 2, 1.0);
        let b = HeightField::filled(2, 3, 1.0);
        let err = multiply(&a, &b).unwrap_err();
        assert_eq!(
            err,
            FieldError::DimensionMismatch {
                expected: (3, 2),
                found: (2, 3),
            }
        );
    }

    #[test]
    fn test_scale() {
        let field = HeightField::from_vec(3, 1, vec![0.0, 0.5, 1.0]).unwrap();
        assert_eq!(scale(&field, -2.0, 2.0).cells(), &[-2.0, 0.0, 2.0]);
    }
}
