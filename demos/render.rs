// Copyright (c) 2024 Mike Tsao

//! The `render` example runs a test tone through the noise blender the way a
//! plugin host would, one block at a time, and writes the result to a WAV
//! file.

use clap::Parser;
use hissmix::{prelude::*, util::settings::Settings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, about, long_about = None)]
struct Args {
    /// Where to write the WAV file
    #[clap(short = 'o', long, default_value = "noise-blend.wav")]
    output: PathBuf,

    /// Load noise-blend configuration from this JSON settings file
    #[clap(short = 's', long)]
    settings: Option<PathBuf>,

    /// Noise amount, 0.0 (dry) to 1.0 (all noise). Overrides settings.
    #[clap(short = 'b', long)]
    blend: Option<f64>,

    /// Test tone frequency in Hz
    #[clap(short = 'f', long, default_value_t = 440.0)]
    frequency: f64,

    /// Length of the render in seconds
    #[clap(long, default_value_t = 2.0)]
    seconds: f64,

    /// Number of output channels
    #[clap(short = 'c', long, default_value_t = 2)]
    channels: usize,

    /// Samples per processing block
    #[clap(long, default_value_t = 512)]
    block_size: usize,

    /// Seed the noise for a reproducible render
    #[clap(long)]
    seed: Option<u128>,

    /// Print version and exit
    #[clap(short = 'v', long, value_parser)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.version {
        println!("hissmix {}", hissmix::app_version());
        return Ok(());
    }

    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let blend = args
        .blend
        .map(Normal::new)
        .unwrap_or(settings.noise_blend.blend());

    let mut builder = NoiseBlendCoreBuilder::default();
    builder
        .blend(blend)
        .table_size(settings.noise_blend.table_size())
        .flip_length(settings.noise_blend.flip_length())
        .headroom_db(settings.noise_blend.headroom_db());
    let mut noise_blend = match args.seed {
        Some(seed) => builder.build_with_source(Rng::new_with_seed(seed))?,
        None => builder.build()?,
    };

    let sample_rate = SampleRate::DEFAULT;
    noise_blend.update_sample_rate(sample_rate);
    let frames = (args.seconds * f64::from(sample_rate)) as usize;
    let block_size = args.block_size.max(1);

    let phase_step = args.frequency / f64::from(sample_rate);
    let tone: Vec<SampleType> = (0..frames)
        .map(|i| (2.0 * std::f64::consts::PI * phase_step * i as f64).sin() * 0.5)
        .collect();
    let mut output: Vec<Vec<SampleType>> = vec![tone; args.channels.max(1)];

    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);
        let mut block: Vec<&mut [SampleType]> =
            output.iter_mut().map(|c| &mut c[start..end]).collect();
        noise_blend.process(&mut block, end - start, blend);
        start = end;
    }

    let planar: Vec<&[SampleType]> = output.iter().map(|c| c.as_slice()).collect();
    hissmix::util::export_to_wav(&planar, sample_rate, &args.output)?;
    eprintln!(
        "Rendered {:.2}s at blend {} to {}",
        args.seconds,
        blend,
        args.output.display()
    );
    Ok(())
}
