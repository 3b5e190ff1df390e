// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the crate.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        MidiChannel, MidiMessage, Normal, Sample, SampleRate, SampleType, StereoSample,
    };
}

pub use {
    midi::{u4, u7, MidiChannel, MidiMessage, PitchBend},
    numbers::{Sample, SampleType, StereoSample},
    ranges::{Normal, RangedF64},
    time::SampleRate,
};

mod midi;
mod numbers;
mod ranges;
mod time;
