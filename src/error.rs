// Copyright (c) 2024 Mike Tsao

//! Errors produced while configuring the crate's devices.

use thiserror::Error as ThisError;

/// Something about a device's configuration can't work. Audio processing
/// itself never fails; these come from builders and from loading settings.
#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    /// The noise table is indexed with a bitmask, so its size must be a power
    /// of two.
    #[error("noise table size {0} is not a power of two")]
    TableSizeNotPowerOfTwo(usize),

    /// The cursor would never jump.
    #[error("flip length must be at least one sample")]
    ZeroFlipLength,

    /// A table smaller than the flip length would wrap before the cursor jumps.
    #[error("noise table size {table_size} is smaller than flip length {flip_length}")]
    TableSmallerThanFlipLength {
        #[allow(missing_docs)]
        table_size: usize,
        #[allow(missing_docs)]
        flip_length: usize,
    },

    /// Headroom must be finite and no louder than full scale.
    #[error("headroom {0} dB is out of range (must be finite and <= 0)")]
    InvalidHeadroom(f64),

    /// A transposer parameter is outside its allowed range.
    #[error("{name} value {value} is out of range {min}..={max}")]
    OutOfRange {
        #[allow(missing_docs)]
        name: &'static str,
        #[allow(missing_docs)]
        value: f64,
        #[allow(missing_docs)]
        min: f64,
        #[allow(missing_docs)]
        max: f64,
    },

    /// A builder was asked to build without a required field.
    #[error("{0}")]
    UninitializedField(String),
}
impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(value: derive_builder::UninitializedFieldError) -> Self {
        Self::UninitializedField(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            Error::TableSizeNotPowerOfTwo(1000).to_string(),
            "noise table size 1000 is not a power of two"
        );
        assert_eq!(
            Error::TableSmallerThanFlipLength {
                table_size: 4,
                flip_length: 8
            }
            .to_string(),
            "noise table size 4 is smaller than flip length 8"
        );
    }
}
