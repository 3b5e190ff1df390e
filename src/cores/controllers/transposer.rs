// Copyright (c) 2024 Mike Tsao

use crate::{
    prelude::*,
    types::{u7, PitchBend},
};
use delegate::delegate;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// What happens to a note that transposes past either end of the MIDI range.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumIter,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OutOfRangePolicy {
    /// Play the nearest valid note (0 or 127) instead. Several held keys can
    /// clamp to the same note, which then sounds until the last of them is
    /// released.
    Clamp,
    /// Don't play the note at all.
    #[default]
    Drop,
}

/// [TransposerCore] is a MIDI processor. It shifts every incoming note by a
/// whole number of semitones, and it retunes by a fraction of a semitone by
/// sending pitch bend ahead of the notes it forwards.
///
/// It remembers which note it actually sent for each key that's down, so
/// changing the transposition while keys are held releases the right notes
/// later.
#[derive(Debug, Builder, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default, rename_all = "kebab-case")]
#[builder(
    default,
    build_fn(private, name = "build_from_builder", error = "crate::error::Error")
)]
pub struct TransposerCore {
    /// Whole-semitone shift.
    semitones: i8,

    /// Fine tuning, in cents (hundredths of a semitone).
    cents: f64,

    /// How many semitones a full pitch-bend swing covers on the receiving
    /// instrument. Needed to turn cents into a bend value.
    #[derivative(Default(value = "2"))]
    bend_range: u8,

    /// What to do with notes that land outside 0..=127.
    out_of_range: OutOfRangePolicy,

    #[serde(skip)]
    #[builder(setter(skip))]
    e: TransposerCoreEphemerals,
}
#[derive(Debug, Derivative)]
#[derivative(Default)]
pub struct TransposerCoreEphemerals {
    /// For each channel and incoming key, the key we sent for it.
    #[derivative(Default(value = "[[None; 128]; MidiChannel::COUNT]"))]
    sounding: [[Option<u7>; 128]; MidiChannel::COUNT],

    /// The most recent bend the performer sent on each channel.
    performer_bend: [i16; MidiChannel::COUNT],

    /// The bend we last sent downstream on each channel.
    sent_bend: [i16; MidiChannel::COUNT],

    c: Configurables,
}
impl TransposerCoreBuilder {
    /// The overridden Builder build() method.
    pub fn build(&self) -> Result<TransposerCore, Error> {
        let s = self.build_from_builder()?;
        s.validate()?;
        Ok(s)
    }
}
impl TransposerCore {
    #[allow(missing_docs)]
    pub const SEMITONES_RANGE: core::ops::RangeInclusive<i8> = -48..=48;
    #[allow(missing_docs)]
    pub const CENTS_RANGE: core::ops::RangeInclusive<f64> = -100.0..=100.0;
    #[allow(missing_docs)]
    pub const BEND_RANGE_RANGE: core::ops::RangeInclusive<u8> = 1..=24;

    // Pitch-bend units on either side of center.
    const BEND_UNITS: f64 = 8192.0;
    const BEND_MIN: i32 = -0x2000;
    const BEND_MAX: i32 = 0x1fff;

    /// Checks every parameter against its range.
    pub fn validate(&self) -> Result<(), Error> {
        if !Self::SEMITONES_RANGE.contains(&self.semitones) {
            return Err(Error::OutOfRange {
                name: "semitones",
                value: self.semitones as f64,
                min: *Self::SEMITONES_RANGE.start() as f64,
                max: *Self::SEMITONES_RANGE.end() as f64,
            });
        }
        if !Self::CENTS_RANGE.contains(&self.cents) {
            return Err(Error::OutOfRange {
                name: "cents",
                value: self.cents,
                min: *Self::CENTS_RANGE.start(),
                max: *Self::CENTS_RANGE.end(),
            });
        }
        if !Self::BEND_RANGE_RANGE.contains(&self.bend_range) {
            return Err(Error::OutOfRange {
                name: "bend-range",
                value: self.bend_range as f64,
                min: *Self::BEND_RANGE_RANGE.start() as f64,
                max: *Self::BEND_RANGE_RANGE.end() as f64,
            });
        }
        Ok(())
    }

    /// Returns the key that `key` transposes to, or None if it falls outside
    /// the MIDI range and the policy is [OutOfRangePolicy::Drop].
    pub fn transpose_key(&self, key: u7) -> Option<u7> {
        let transposed = key.as_int() as i16 + self.semitones as i16;
        if (0..=127).contains(&transposed) {
            Some(u7::from(transposed as u8))
        } else {
            match self.out_of_range {
                OutOfRangePolicy::Clamp => Some(u7::from(transposed.clamp(0, 127) as u8)),
                OutOfRangePolicy::Drop => None,
            }
        }
    }

    /// The retune amount in signed pitch-bend units (-8192..=8191).
    pub fn retune_units(&self) -> i16 {
        let units = (self.cents / (100.0 * self.bend_range as f64) * Self::BEND_UNITS).round();
        (units as i32).clamp(Self::BEND_MIN, Self::BEND_MAX) as i16
    }

    /// The pitch bend that retunes a channel whose performer isn't bending.
    pub fn retune_bend(&self) -> PitchBend {
        PitchBend::from_int(self.retune_units())
    }

    fn combined_bend(&self, channel_index: usize) -> i16 {
        (self.e.performer_bend[channel_index] as i32 + self.retune_units() as i32)
            .clamp(Self::BEND_MIN, Self::BEND_MAX) as i16
    }

    /// Sends one note-off for every note this transposer started and hasn't
    /// yet stopped, then forgets them.
    pub fn release_all(&mut self, midi_messages_fn: &mut MidiMessagesFn) {
        for (channel_index, keys) in self.e.sounding.iter_mut().enumerate() {
            for i in 0..keys.len() {
                if let Some(key) = keys[i].take() {
                    if !keys[i + 1..].contains(&Some(key)) {
                        midi_messages_fn(
                            MidiChannel::new(channel_index as u8),
                            MidiMessage::NoteOff {
                                key,
                                vel: u7::from(0),
                            },
                        );
                    }
                }
            }
        }
    }

    // Whether some held key still maps to `out_key`.
    fn is_sounding(&self, channel_index: usize, out_key: u7) -> bool {
        self.e.sounding[channel_index].contains(&Some(out_key))
    }

    fn forget_channel(&mut self, channel_index: usize) {
        self.e.sounding[channel_index].fill(None);
    }

    #[allow(missing_docs)]
    pub fn semitones(&self) -> i8 {
        self.semitones
    }

    /// Sets the shift, clamped to [TransposerCore::SEMITONES_RANGE]. Keys
    /// already down keep their old transposition until released.
    pub fn set_semitones(&mut self, semitones: i8) {
        self.semitones = semitones.clamp(
            *Self::SEMITONES_RANGE.start(),
            *Self::SEMITONES_RANGE.end(),
        );
    }

    #[allow(missing_docs)]
    pub fn cents(&self) -> f64 {
        self.cents
    }

    /// Sets fine tuning, clamped to [TransposerCore::CENTS_RANGE]. The new bend
    /// goes out with the next note on each channel.
    pub fn set_cents(&mut self, cents: f64) {
        if cents.is_finite() {
            self.cents = cents.clamp(*Self::CENTS_RANGE.start(), *Self::CENTS_RANGE.end());
        }
    }

    #[allow(missing_docs)]
    pub fn bend_range(&self) -> u8 {
        self.bend_range
    }

    #[allow(missing_docs)]
    pub fn set_bend_range(&mut self, bend_range: u8) {
        self.bend_range = bend_range.clamp(
            *Self::BEND_RANGE_RANGE.start(),
            *Self::BEND_RANGE_RANGE.end(),
        );
    }

    #[allow(missing_docs)]
    pub fn out_of_range(&self) -> OutOfRangePolicy {
        self.out_of_range
    }

    #[allow(missing_docs)]
    pub fn set_out_of_range(&mut self, out_of_range: OutOfRangePolicy) {
        self.out_of_range = out_of_range;
    }
}
impl HandlesMidi for TransposerCore {
    fn handle_midi_message(
        &mut self,
        channel: MidiChannel,
        message: MidiMessage,
        midi_messages_fn: &mut MidiMessagesFn,
    ) {
        let ci = channel.index();
        match message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                let Some(out_key) = self.transpose_key(key) else {
                    return;
                };
                let previous = self.e.sounding[ci][key.as_int() as usize].replace(out_key);
                if let Some(previous) = previous {
                    if previous != out_key && !self.is_sounding(ci, previous) {
                        midi_messages_fn(
                            channel,
                            MidiMessage::NoteOff {
                                key: previous,
                                vel: u7::from(0),
                            },
                        );
                    }
                }
                let bend = self.combined_bend(ci);
                if bend != self.e.sent_bend[ci] {
                    self.e.sent_bend[ci] = bend;
                    midi_messages_fn(
                        channel,
                        MidiMessage::PitchBend {
                            bend: PitchBend::from_int(bend),
                        },
                    );
                }
                midi_messages_fn(channel, MidiMessage::NoteOn { key: out_key, vel });
            }
            MidiMessage::NoteOn { key, vel } => {
                if let Some(out_key) = self.e.sounding[ci][key.as_int() as usize].take() {
                    if !self.is_sounding(ci, out_key) {
                        midi_messages_fn(channel, MidiMessage::NoteOn { key: out_key, vel });
                    }
                }
            }
            MidiMessage::NoteOff { key, vel } => {
                if let Some(out_key) = self.e.sounding[ci][key.as_int() as usize].take() {
                    if !self.is_sounding(ci, out_key) {
                        midi_messages_fn(channel, MidiMessage::NoteOff { key: out_key, vel });
                    }
                }
            }
            MidiMessage::Aftertouch { key, vel } => {
                if let Some(out_key) = self.e.sounding[ci][key.as_int() as usize] {
                    midi_messages_fn(channel, MidiMessage::Aftertouch { key: out_key, vel });
                }
            }
            MidiMessage::PitchBend { bend } => {
                self.e.performer_bend[ci] = bend.as_int();
                let bend = self.combined_bend(ci);
                self.e.sent_bend[ci] = bend;
                midi_messages_fn(
                    channel,
                    MidiMessage::PitchBend {
                        bend: PitchBend::from_int(bend),
                    },
                );
            }
            MidiMessage::Controller { controller, .. } => {
                midi_messages_fn(channel, message);
                // 120 all sound off, 123 all notes off
                if matches!(controller.as_int(), 120 | 123) {
                    self.forget_channel(ci);
                }
            }
            _ => midi_messages_fn(channel, message),
        }
    }
}
impl Configurable for TransposerCore {
    delegate! {
        to self.e.c {
            fn sample_rate(&self) -> SampleRate;
            fn update_sample_rate(&mut self, sample_rate: SampleRate);
        }
    }

    fn reset(&mut self) {
        for ci in 0..MidiChannel::COUNT {
            self.forget_channel(ci);
        }
        self.e.performer_bend.fill(0);
        self.e.sent_bend.fill(0);
    }
}
impl Serializable for TransposerCore {}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn note_on(key: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOn {
            key: u7::from(key),
            vel: u7::from(vel),
        }
    }

    fn note_off(key: u8) -> MidiMessage {
        MidiMessage::NoteOff {
            key: u7::from(key),
            vel: u7::from(0),
        }
    }

    fn send(t: &mut TransposerCore, channel: u8, message: MidiMessage) -> Vec<(u8, MidiMessage)> {
        let mut v = Vec::default();
        t.handle_midi_message(MidiChannel::new(channel), message, &mut |c, m| {
            v.push((c.0, m))
        });
        v
    }

    #[test]
    fn transposes_note_on_and_off() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(7)
            .build()
            .unwrap();
        assert_eq!(send(&mut t, 0, note_on(60, 100)), vec![(0, note_on(67, 100))]);
        assert_eq!(send(&mut t, 0, note_off(60)), vec![(0, note_off(67))]);
    }

    #[test]
    fn zero_velocity_note_on_releases_remembered_key() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(-12)
            .build()
            .unwrap();
        send(&mut t, 2, note_on(60, 90));
        assert_eq!(send(&mut t, 2, note_on(60, 0)), vec![(2, note_on(48, 0))]);
        assert!(send(&mut t, 2, note_on(60, 0)).is_empty());
    }

    #[test]
    fn changing_transposition_while_held_releases_original_note() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(2)
            .build()
            .unwrap();
        send(&mut t, 0, note_on(60, 100));
        t.set_semitones(5);
        assert_eq!(
            send(&mut t, 0, note_off(60)),
            vec![(0, note_off(62))],
            "note-off should go to the note that was actually started"
        );
    }

    #[test]
    fn retrigger_at_new_transposition_stops_old_note() {
        let mut t = TransposerCoreBuilder::default().build().unwrap();
        send(&mut t, 0, note_on(60, 100));
        t.set_semitones(1);
        assert_eq!(
            send(&mut t, 0, note_on(60, 100)),
            vec![(0, note_off(60)), (0, note_on(61, 100))]
        );
    }

    #[test]
    fn channels_are_tracked_separately() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(1)
            .build()
            .unwrap();
        send(&mut t, 0, note_on(60, 100));
        assert!(send(&mut t, 1, note_off(60)).is_empty());
        assert_eq!(send(&mut t, 0, note_off(60)), vec![(0, note_off(61))]);
    }

    #[test]
    fn out_of_range_policies() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(12)
            .build()
            .unwrap();
        assert_eq!(t.out_of_range(), OutOfRangePolicy::Drop);
        assert_eq!(t.transpose_key(u7::from(120)), None);
        assert!(send(&mut t, 0, note_on(120, 100)).is_empty());
        assert!(
            send(&mut t, 0, note_off(120)).is_empty(),
            "a dropped note's note-off should be dropped too"
        );

        t.set_out_of_range(OutOfRangePolicy::Clamp);
        assert_eq!(t.transpose_key(u7::from(120)), Some(u7::from(127)));
        t.set_semitones(-12);
        assert_eq!(t.transpose_key(u7::from(3)), Some(u7::from(0)));
    }

    #[test]
    fn clamped_keys_share_one_note() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(10)
            .out_of_range(OutOfRangePolicy::Clamp)
            .build()
            .unwrap();
        assert_eq!(send(&mut t, 0, note_on(120, 100)), vec![(0, note_on(127, 100))]);
        assert_eq!(send(&mut t, 0, note_on(125, 100)), vec![(0, note_on(127, 100))]);
        assert!(
            send(&mut t, 0, note_off(120)).is_empty(),
            "127 is still held through 125"
        );
        assert_eq!(send(&mut t, 0, note_off(125)), vec![(0, note_off(127))]);

        send(&mut t, 0, note_on(120, 100));
        send(&mut t, 0, note_on(125, 100));
        let mut released = Vec::default();
        t.release_all(&mut |c, m| released.push((c.0, m)));
        assert_eq!(released, vec![(0, note_off(127))]);
    }

    #[test]
    fn policy_names_match_serialized_form() {
        for policy in OutOfRangePolicy::iter() {
            assert_eq!(
                serde_json::to_string(&policy).unwrap(),
                format!("\"{policy}\"")
            );
        }
    }

    #[test]
    fn retune_sends_bend_before_first_note_only() {
        let mut t = TransposerCoreBuilder::default()
            .cents(50.0)
            .build()
            .unwrap();
        // 50 cents of a 2-semitone range is a quarter of full swing.
        assert_eq!(t.retune_units(), 2048);
        assert_eq!(
            send(&mut t, 0, note_on(60, 100)),
            vec![
                (
                    0,
                    MidiMessage::PitchBend {
                        bend: PitchBend::from_int(2048)
                    }
                ),
                (0, note_on(60, 100))
            ]
        );
        assert_eq!(send(&mut t, 0, note_on(64, 100)), vec![(0, note_on(64, 100))]);

        // New channel, new bend.
        assert_eq!(send(&mut t, 3, note_on(64, 100)).len(), 2);

        // Back to center.
        t.set_cents(0.0);
        assert_eq!(
            send(&mut t, 0, note_on(67, 100)),
            vec![
                (
                    0,
                    MidiMessage::PitchBend {
                        bend: PitchBend::from_int(0)
                    }
                ),
                (0, note_on(67, 100))
            ]
        );
    }

    #[test]
    fn performer_bend_is_offset_and_clamped() {
        let mut t = TransposerCoreBuilder::default()
            .cents(-100.0)
            .bend_range(2)
            .build()
            .unwrap();
        assert_eq!(t.retune_units(), -4096);
        assert_eq!(
            send(
                &mut t,
                0,
                MidiMessage::PitchBend {
                    bend: PitchBend::from_int(1000)
                }
            ),
            vec![(
                0,
                MidiMessage::PitchBend {
                    bend: PitchBend::from_int(-3096)
                }
            )]
        );
        assert_eq!(
            send(
                &mut t,
                0,
                MidiMessage::PitchBend {
                    bend: PitchBend::from_int(-8000)
                }
            ),
            vec![(
                0,
                MidiMessage::PitchBend {
                    bend: PitchBend::from_int(-8192)
                }
            )]
        );
    }

    #[test]
    fn aftertouch_follows_mapping() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(3)
            .build()
            .unwrap();
        let touch = |key: u8| MidiMessage::Aftertouch {
            key: u7::from(key),
            vel: u7::from(40),
        };
        assert!(send(&mut t, 0, touch(60)).is_empty());
        send(&mut t, 0, note_on(60, 100));
        assert_eq!(send(&mut t, 0, touch(60)), vec![(0, touch(63))]);
    }

    #[test]
    fn other_messages_pass_through() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(3)
            .build()
            .unwrap();
        let program = MidiMessage::ProgramChange {
            program: u7::from(5),
        };
        assert_eq!(send(&mut t, 9, program), vec![(9, program)]);
    }

    #[test]
    fn all_notes_off_forgets_channel() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(3)
            .build()
            .unwrap();
        send(&mut t, 0, note_on(60, 100));
        let all_notes_off = MidiMessage::Controller {
            controller: u7::from(123),
            value: u7::from(0),
        };
        assert_eq!(send(&mut t, 0, all_notes_off), vec![(0, all_notes_off)]);
        assert!(send(&mut t, 0, note_off(60)).is_empty());
    }

    #[test]
    fn release_all_stops_everything() {
        let mut t = TransposerCoreBuilder::default()
            .semitones(-1)
            .build()
            .unwrap();
        send(&mut t, 0, note_on(60, 100));
        send(&mut t, 4, note_on(70, 100));
        let mut v = Vec::default();
        t.release_all(&mut |c, m| v.push((c.0, m)));
        assert_eq!(v, vec![(0, note_off(59)), (4, note_off(69))]);

        let mut v = Vec::default();
        t.release_all(&mut |c, m| v.push((c.0, m)));
        assert!(v.is_empty());
    }

    #[test]
    fn builder_validates_ranges() {
        assert!(matches!(
            TransposerCoreBuilder::default().semitones(60).build(),
            Err(Error::OutOfRange {
                name: "semitones",
                ..
            })
        ));
        assert!(matches!(
            TransposerCoreBuilder::default().cents(150.0).build(),
            Err(Error::OutOfRange { name: "cents", .. })
        ));
        assert!(matches!(
            TransposerCoreBuilder::default().bend_range(0).build(),
            Err(Error::OutOfRange {
                name: "bend-range",
                ..
            })
        ));
    }

    #[test]
    fn setters_clamp() {
        let mut t = TransposerCoreBuilder::default().build().unwrap();
        t.set_semitones(100);
        assert_eq!(t.semitones(), 48);
        t.set_cents(-400.0);
        assert_eq!(t.cents(), -100.0);
        t.set_cents(f64::NAN);
        assert_eq!(t.cents(), -100.0);
        t.set_bend_range(0);
        assert_eq!(t.bend_range(), 1);
    }

    #[test]
    fn serializes_kebab_case() {
        let t = TransposerCoreBuilder::default()
            .semitones(-5)
            .bend_range(12)
            .out_of_range(OutOfRangePolicy::Clamp)
            .build()
            .unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"bend-range\":12"));
        assert!(json.contains("\"out-of-range\":\"clamp\""));
        let restored: TransposerCore = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.semitones(), -5);
        assert_eq!(restored.out_of_range(), OutOfRangePolicy::Clamp);
    }
}
