// Copyright (c) 2024 Mike Tsao

//! Effects transform audio through the
//! [TransformsAudio](crate::traits::TransformsAudio) trait.

pub use noise_blend::{NoiseBlendCore, NoiseBlendCoreBuilder};

mod noise_blend;
