// Copyright (c) 2024 Mike Tsao

//! Widgets that work with the [egui](https://www.egui.rs/) GUI library.

/// A collection of imports that are useful for users of this crate who are also using egui.
pub mod prelude {
    pub use super::VoiceGridWidget;
}

pub use voice_grid::{key_label, VoiceGridWidget};

mod voice_grid;
