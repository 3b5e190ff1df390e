// Copyright (c) 2024 Mike Tsao

use hissmix::{prelude::*, types::u7};

// A transposer feeding a voice grid, the way a plugin would wire its MIDI
// processor to its activity display.
#[test]
fn transposed_notes_light_the_grid() {
    let mut transposer = TransposerCoreBuilder::default()
        .semitones(12)
        .build()
        .unwrap();
    let mut grid = VoiceActivityGrid::default();

    let mut route = |transposer: &mut TransposerCore, channel: u8, message: MidiMessage| {
        transposer.handle_midi_message(MidiChannel::new(channel), message, &mut |c, m| {
            grid.handle_midi_message(c, m, &mut |_, _| {})
        });
    };

    route(
        &mut transposer,
        0,
        MidiMessage::NoteOn {
            key: u7::from(60),
            vel: u7::from(100),
        },
    );
    route(
        &mut transposer,
        1,
        MidiMessage::NoteOn {
            key: u7::from(64),
            vel: u7::from(100),
        },
    );
    transposer.set_semitones(-12);
    route(
        &mut transposer,
        0,
        MidiMessage::NoteOff {
            key: u7::from(60),
            vel: u7::from(0),
        },
    );

    assert!(!grid.is_active(MidiChannel::new(0), u7::from(72)));
    assert!(!grid.is_active(MidiChannel::new(0), u7::from(48)));
    assert!(grid.is_active(MidiChannel::new(1), u7::from(76)));
    assert_eq!(grid.active_count(), 1);

    let mut released = Vec::default();
    transposer.release_all(&mut |c, m| released.push((c, m)));
    for (c, m) in released {
        grid.handle_midi_message(c, m, &mut |_, _| {});
    }
    assert_eq!(grid.active_count(), 0);
}
