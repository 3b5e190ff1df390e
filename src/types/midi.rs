// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use synonym::Synonym;

pub use midly::{
    num::{u4, u7},
    MidiMessage, PitchBend,
};

/// Newtype for MIDI channel.
#[derive(Synonym, Serialize, Deserialize)]
pub struct MidiChannel(pub u8);
#[allow(missing_docs)]
impl MidiChannel {
    pub const MIN_VALUE: u8 = 0;
    pub const MAX_VALUE: u8 = 15; // inclusive
    pub const COUNT: usize = 16;

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// The channel as an index into per-channel arrays. Out-of-range values
    /// wrap the way they would on the wire, where the channel is a nibble.
    pub const fn index(&self) -> usize {
        (self.0 & 0x0f) as usize
    }
}
impl From<u4> for MidiChannel {
    fn from(value: u4) -> Self {
        Self(value.as_int())
    }
}
