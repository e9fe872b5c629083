//! Field error types.

/// Errors raised when fields are combined or constructed with inconsistent shapes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Two fields that must share dimensions do not.
    #[error("field dimensions differ: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        /// `(width, height)` of the left-hand field.
        expected: (u32, u32),
        /// `(width, height)` of the offending field.
        found: (u32, u32),
    },

    /// A raw cell buffer does not hold `width * height` values.
    #[error("cell buffer holds {len} values, expected one per cell of a {width}x{height} field")]
    BufferLength {
        /// Field width.
        width: u32,
        /// Field height.
        height: u32,
        /// Actual buffer length.
        len: usize,
    },
}
