// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Hissmix is a handful of small building blocks for audio plugins.
//!
//! * [NoiseBlendCore](cores::NoiseBlendCore) mixes a dry signal toward
//! attenuated noise read from a precomputed table whose read position jumps
//! somewhere random every few samples.
//! * [TransposerCore](cores::TransposerCore) shifts incoming MIDI notes by
//! semitones and retunes them by cents through pitch bend.
//! * [VoiceActivityGrid](elements::VoiceActivityGrid) remembers which voices
//! are sounding so that a UI can draw them. With the `egui` feature, the
//! [egui] module provides a widget for it.
//!
//! Each of these is independent of the others. The [util::settings] module
//! persists the configurable ones as JSON.

/// A collection of imports that are useful to users of this crate. `use
/// hissmix::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        cores::prelude::*, elements::prelude::*, error::Error, traits::prelude::*,
        types::prelude::*, util::prelude::*,
    };
}

#[cfg(feature = "std")]
pub use version::app_version;

pub mod cores;
#[cfg(feature = "egui")]
pub mod egui;
pub mod elements;
pub mod error;
pub mod traits;
pub mod types;
pub mod util;

#[cfg(feature = "std")]
mod version;
