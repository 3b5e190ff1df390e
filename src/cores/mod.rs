// Copyright (c) 2024 Mike Tsao

//! The devices themselves, without any host glue. A plugin wraps a core,
//! forwards its parameters to the core's setters, and calls the core from its
//! audio or MIDI callback.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        NoiseBlendCore, NoiseBlendCoreBuilder, OutOfRangePolicy, TransposerCore,
        TransposerCoreBuilder,
    };
}

pub use controllers::*;
pub use effects::*;

mod controllers;
mod effects;
