// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use anyhow::anyhow;
use std::path::Path;

/// Converts a sample to 16-bit PCM, clipping anything past full scale.
pub fn sample_to_i16(sample: SampleType) -> i16 {
    const I16_SCALE: SampleType = i16::MAX as SampleType;
    (sample.clamp(Sample::MIN_VALUE, Sample::MAX_VALUE) * I16_SCALE) as i16
}

/// Writes planar audio (one slice per channel) to a 16-bit WAV file. All
/// channels must be the same length.
pub fn export_to_wav(
    channels: &[&[SampleType]],
    sample_rate: SampleRate,
    path: &Path,
) -> anyhow::Result<()> {
    let Some(frames) = channels.first().map(|c| c.len()) else {
        return Err(anyhow!("nothing to export: no channels"));
    };
    if channels.iter().any(|c| c.len() != frames) {
        return Err(anyhow!("channels have different lengths"));
    }
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate: sample_rate.into(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for frame in 0..frames {
        for channel in channels {
            writer.write_sample(sample_to_i16(channel[frame]))?;
        }
    }
    writer.finalize()?;
    log::info!(
        "wrote {frames} frames x {} channels to {}",
        channels.len(),
        path.display()
    );
    Ok(())
}
