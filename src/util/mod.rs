// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::rng::{RandomSource, Rng};
}

pub use rng::{RandomSource, Rng, ScriptedRandom};

mod rng;

#[cfg(all(feature = "std", feature = "hound"))]
pub use export::{export_to_wav, sample_to_i16};
#[cfg(all(feature = "std", feature = "hound"))]
mod export;

#[cfg(feature = "std")]
pub mod settings;
