// Copyright (c) 2024 Mike Tsao

use crate::{prelude::*, types::u7};
use bit_vec::BitVec;
use core::ops::RangeInclusive;

/// [VoiceActivityGrid] watches a MIDI message stream and remembers which voices
/// are currently sounding (we've gotten a note-on without a note-off), one
/// cell per [MidiChannel] and key. A UI reads it to draw a grid of lit cells,
/// and it can produce the note-offs that would silence everything it knows
/// about.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceActivityGrid {
    active: BitVec,
}
impl Default for VoiceActivityGrid {
    fn default() -> Self {
        Self {
            active: BitVec::from_elem(MidiChannel::COUNT * Self::KEY_COUNT, false),
        }
    }
}
impl HandlesMidi for VoiceActivityGrid {
    fn handle_midi_message(
        &mut self,
        channel: MidiChannel,
        message: MidiMessage,
        _: &mut MidiMessagesFn,
    ) {
        match message {
            MidiMessage::NoteOff { key, .. } => {
                self.active.set(Self::cell(channel, key), false);
            }
            MidiMessage::NoteOn { key, vel } => {
                self.active
                    .set(Self::cell(channel, key), vel != u7::from(0));
            }
            MidiMessage::Controller { controller, .. } => {
                if matches!(controller.as_int(), 120 | 123) {
                    self.clear_channel(channel);
                }
            }
            _ => {}
        }
    }
}
impl VoiceActivityGrid {
    /// The number of columns per channel row.
    pub const KEY_COUNT: usize = 128;

    fn cell(channel: MidiChannel, key: u7) -> usize {
        channel.index() * Self::KEY_COUNT + key.as_int() as usize
    }

    /// Whether the given key is sounding on the given channel.
    pub fn is_active(&self, channel: MidiChannel, key: u7) -> bool {
        self.active.get(Self::cell(channel, key)).unwrap_or_default()
    }

    /// The number of voices sounding across all channels.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| *a).count()
    }

    /// The number of voices sounding on one channel.
    pub fn active_in_channel(&self, channel: MidiChannel) -> usize {
        self.active_keys(channel).count()
    }

    /// The sounding keys on one channel, lowest first.
    pub fn active_keys(&self, channel: MidiChannel) -> impl Iterator<Item = u7> + '_ {
        let start = channel.index() * Self::KEY_COUNT;
        (0..Self::KEY_COUNT)
            .filter(move |k| self.active.get(start + k).unwrap_or_default())
            .map(|k| u7::from(k as u8))
    }

    /// The lowest through highest sounding key over all channels, or None if
    /// nothing is sounding.
    pub fn key_range(&self) -> Option<RangeInclusive<u8>> {
        let mut keys = self
            .active
            .iter()
            .enumerate()
            .filter(|(_, a)| *a)
            .map(|(i, _)| (i % Self::KEY_COUNT) as u8);
        let first = keys.next()?;
        let (low, high) = keys.fold((first, first), |(lo, hi), k| (lo.min(k), hi.max(k)));
        Some(low..=high)
    }

    /// Emits a note-off for every sounding voice, then forgets them all.
    pub fn all_notes_off(&mut self, midi_messages_fn: &mut MidiMessagesFn) {
        for (i, active) in self.active.iter().enumerate() {
            if active {
                midi_messages_fn(
                    MidiChannel::new((i / Self::KEY_COUNT) as u8),
                    MidiMessage::NoteOff {
                        key: u7::from_int_lossy((i % Self::KEY_COUNT) as u8),
                        vel: u7::from(0),
                    },
                );
            }
        }
        self.active.clear();
    }

    /// Forgets every voice on one channel.
    pub fn clear_channel(&mut self, channel: MidiChannel) {
        let start = channel.index() * Self::KEY_COUNT;
        for i in start..start + Self::KEY_COUNT {
            self.active.set(i, false);
        }
    }

    /// Forgets every voice.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}
