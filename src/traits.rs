// Copyright (c) 2024 Mike Tsao

//! The traits that define many characteristics of the devices in this crate.

use crate::prelude::*;

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{
        Configurable, Configurables, HandlesMidi, HasSettings, MidiMessagesFn, Serializable,
        TransformsAudio,
    };
}

/// A convenience struct for the fields implied by [Configurable]. Note that
/// this struct is not serde-compliant, because these fields typically aren't
/// meant to be serialized.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Configurables {
    sample_rate: SampleRate,
}
impl Configurable for Configurables {
    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn update_sample_rate(&mut self, sample_rate: SampleRate) {
        self.sample_rate = sample_rate
    }
}

/// Something that is [Configurable] is interested in staying in sync with
/// global configuration.
pub trait Configurable {
    /// Returns this item's sample rate.
    fn sample_rate(&self) -> SampleRate {
        SampleRate::DEFAULT
    }

    /// The sample rate changed.
    #[allow(unused_variables)]
    fn update_sample_rate(&mut self, sample_rate: SampleRate) {}

    /// Sent to indicate that it's time to reset internal state, such as when
    /// the host stops and restarts playback.
    fn reset(&mut self) {}
}

/// Something that is [Serializable] might need to do work right before
/// serialization, or right after deserialization. These are the hooks.
pub trait Serializable {
    /// Called just before saving to disk.
    fn before_ser(&mut self) {}
    /// Called just after loading from disk.
    fn after_deser(&mut self) {}
}

/// Passes MIDI messages to the caller.
pub type MidiMessagesFn<'a> = dyn FnMut(MidiChannel, MidiMessage) + 'a;

/// Indicates that a device knows about MIDI.
pub trait HandlesMidi {
    /// Takes standard MIDI messages and optionally produces more in response.
    /// A MIDI processor like a transposer forwards a changed version of each
    /// message it receives; a passive listener produces nothing.
    #[allow(unused_variables)]
    fn handle_midi_message(
        &mut self,
        channel: MidiChannel,
        message: MidiMessage,
        midi_messages_fn: &mut MidiMessagesFn,
    ) {
    }
}

/// A [TransformsAudio] takes input audio, does something to it, and then
/// outputs it. It's what effects do.
pub trait TransformsAudio: core::fmt::Debug {
    /// Transforms a buffer of interleaved stereo audio.
    fn transform(&mut self, samples: &mut [StereoSample]) {
        for sample in samples {
            *sample = StereoSample(
                self.transform_channel(0, sample.0),
                self.transform_channel(1, sample.1),
            )
        }
    }

    /// channel: 0 is left, 1 is right. Use the value as an index into arrays.
    #[allow(unused_variables)]
    fn transform_channel(&mut self, channel: usize, input_sample: Sample) -> Sample {
        // Default implementation is passthrough
        input_sample
    }
}

/// Each app should have a Settings struct that is composed of subsystems having
/// their own settings. Implementing [HasSettings] helps the composed struct
/// manage its parts.
pub trait HasSettings {
    /// Whether the current state of this struct has been saved to disk.
    fn has_been_saved(&self) -> bool;
    /// Call this whenever the struct changes.
    fn needs_save(&mut self);
    /// Call this after a load() or a save().
    fn mark_clean(&mut self);
}
