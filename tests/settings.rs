// Copyright (c) 2024 Mike Tsao

use hissmix::{prelude::*, util::settings::Settings};

#[test]
fn settings_configure_devices() {
    let json = r#"{
        "noise-blend": { "blend": 0.2, "table-size": 1024, "flip-length": 16, "headroom-db": -6.0 },
        "transposer": { "semitones": -12, "cents": 25.0, "bend-range": 12, "out-of-range": "clamp" }
    }"#;
    let mut settings = Settings::from_json(json).unwrap();

    assert_eq!(settings.noise_blend.blend(), Normal::new(0.2));
    assert_eq!(settings.noise_blend.noise_table().len(), 1024);
    assert_eq!(settings.noise_blend.flip_length(), 16);
    let amplitude = settings.noise_blend.amplitude();
    assert!(settings
        .noise_blend
        .noise_table()
        .iter()
        .all(|v| v.abs() <= amplitude));

    assert_eq!(settings.transposer.semitones(), -12);
    assert_eq!(settings.transposer.out_of_range(), OutOfRangePolicy::Clamp);
    // 25 cents over a 12-semitone swing
    assert_eq!(settings.transposer.retune_units(), 171);

    let mut buffer = [0.0; 32];
    let blend = settings.noise_blend.blend();
    settings.noise_blend.process(&mut [&mut buffer], 32, blend);
    assert!(buffer.iter().any(|s| *s != 0.0));
}
