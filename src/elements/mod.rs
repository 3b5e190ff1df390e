// Copyright (c) 2024 Mike Tsao

//! Building blocks that aren't devices on their own, such as models that a UI
//! draws.

/// The most commonly used imports.
pub mod prelude {
    pub use super::VoiceActivityGrid;
}

pub use voice_grid::VoiceActivityGrid;

mod voice_grid;
