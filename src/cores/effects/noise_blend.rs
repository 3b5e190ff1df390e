// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use delegate::delegate;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// [NoiseBlendCore] crossfades its input toward white noise.
///
/// The noise isn't generated on the fly. At construction the core fills a
/// table of `table_size` attenuated random values, and during processing it
/// reads that table sequentially. Every `flip_length` reads, the read cursor
/// jumps to a random position, so the short table never audibly loops.
///
/// One cursor is shared by all channels. Channels are processed one after
/// another, so the second channel continues reading where the first left off,
/// and the cursor advances once per (channel, sample) pair.
#[derive(Debug, Builder, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default, rename_all = "kebab-case")]
#[builder(
    default,
    build_fn(private, name = "build_from_builder", error = "crate::error::Error")
)]
pub struct NoiseBlendCore {
    /// How much noise replaces the input. 0.0 is dry, 1.0 is all noise.
    blend: Normal,

    /// Number of entries in the noise table. Must be a power of two.
    #[derivative(Default(value = "Self::DEFAULT_TABLE_SIZE"))]
    table_size: usize,

    /// Number of reads before the cursor jumps somewhere random.
    #[derivative(Default(value = "Self::DEFAULT_FLIP_LENGTH"))]
    flip_length: usize,

    /// Peak level of the noise table, in dB relative to full scale.
    #[derivative(Default(value = "Self::DEFAULT_HEADROOM_DB"))]
    headroom_db: f64,

    #[serde(skip)]
    #[builder(setter(skip))]
    e: NoiseBlendCoreEphemerals,
}
#[derive(Debug, Derivative)]
#[derivative(Default)]
pub struct NoiseBlendCoreEphemerals {
    table: Vec<SampleType>,
    mask: usize,
    cursor: usize,
    flip_counter: usize,

    #[derivative(Default(value = "Box::new(Rng::default())"))]
    source: Box<dyn RandomSource>,

    c: Configurables,
}
impl NoiseBlendCoreBuilder {
    /// The overridden Builder build() method. The noise table comes from an
    /// OS-seeded [Rng].
    pub fn build(&self) -> Result<NoiseBlendCore, Error> {
        let mut s = self.build_from_builder()?;
        s.validate()?;
        s.generate_table();
        Ok(s)
    }

    /// Builds with the given [RandomSource] instead of an OS-seeded one. The
    /// core keeps the source and draws cursor jumps from it, too.
    pub fn build_with_source(
        &self,
        source: impl RandomSource + 'static,
    ) -> Result<NoiseBlendCore, Error> {
        let mut s = self.build_from_builder()?;
        s.validate()?;
        s.e.source = Box::new(source);
        s.generate_table();
        Ok(s)
    }
}
impl NoiseBlendCore {
    #[allow(missing_docs)]
    pub const DEFAULT_TABLE_SIZE: usize = 4096;
    #[allow(missing_docs)]
    pub const DEFAULT_FLIP_LENGTH: usize = 8;
    #[allow(missing_docs)]
    pub const DEFAULT_HEADROOM_DB: f64 = -12.0;

    /// Checks that the configuration describes a table this core can index.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.table_size.is_power_of_two() {
            return Err(Error::TableSizeNotPowerOfTwo(self.table_size));
        }
        if self.flip_length == 0 {
            return Err(Error::ZeroFlipLength);
        }
        if self.table_size < self.flip_length {
            return Err(Error::TableSmallerThanFlipLength {
                table_size: self.table_size,
                flip_length: self.flip_length,
            });
        }
        if !self.headroom_db.is_finite() || self.headroom_db > 0.0 {
            return Err(Error::InvalidHeadroom(self.headroom_db));
        }
        Ok(())
    }

    fn generate_table(&mut self) {
        let amplitude = self.amplitude();
        let source = &mut self.e.source;
        self.e.table = (0..self.table_size)
            .map(|_| source.next_double().mul_add(2.0, -1.0) * amplitude)
            .collect();
        self.e.mask = self.table_size - 1;
        self.e.cursor = 0;
        self.e.flip_counter = 0;
        log::debug!(
            "noise table ready: {} entries, flip every {}, peak {:.4} ({} dB)",
            self.table_size,
            self.flip_length,
            amplitude,
            self.headroom_db
        );
    }

    /// Blends `num_samples` samples of each channel toward noise, in place.
    /// A `blend` of zero leaves both the buffers and the cursor untouched.
    ///
    /// Every channel must hold at least `num_samples` samples.
    pub fn process(
        &mut self,
        channels: &mut [&mut [SampleType]],
        num_samples: usize,
        blend: Normal,
    ) {
        let blend = blend.0;
        debug_assert!(blend.is_finite());
        if blend == 0.0 || self.e.table.is_empty() {
            return;
        }
        for channel in channels.iter_mut() {
            for sample in channel[..num_samples].iter_mut() {
                *sample = self.blend_one(*sample, blend);
            }
        }
    }

    #[inline]
    fn blend_one(&mut self, dry: SampleType, blend: SampleType) -> SampleType {
        let noise = self.e.table[self.e.cursor];
        self.advance();
        dry + blend * (noise - dry)
    }

    #[inline]
    fn advance(&mut self) {
        self.e.cursor = (self.e.cursor + 1) & self.e.mask;
        self.e.flip_counter += 1;
        if self.e.flip_counter == self.flip_length {
            self.e.flip_counter = 0;
            self.e.cursor = self.e.source.next_int(self.table_size) & self.e.mask;
        }
    }

    /// The linear peak level corresponding to `headroom_db`.
    pub fn amplitude(&self) -> SampleType {
        10.0f64.powf(self.headroom_db / 20.0)
    }

    /// The precomputed noise. Empty until the core is built or deserialized.
    pub fn noise_table(&self) -> &[SampleType] {
        &self.e.table
    }

    /// The table index that the next processed sample will read.
    pub fn cursor(&self) -> usize {
        self.e.cursor
    }

    /// Reads since the cursor last jumped.
    pub fn flip_counter(&self) -> usize {
        self.e.flip_counter
    }

    #[allow(missing_docs)]
    pub fn blend(&self) -> Normal {
        self.blend
    }

    #[allow(missing_docs)]
    pub fn set_blend(&mut self, blend: Normal) {
        self.blend = blend;
    }

    #[allow(missing_docs)]
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    #[allow(missing_docs)]
    pub fn flip_length(&self) -> usize {
        self.flip_length
    }

    #[allow(missing_docs)]
    pub fn headroom_db(&self) -> f64 {
        self.headroom_db
    }
}
impl TransformsAudio for NoiseBlendCore {
    /// Processes the whole left channel, then the whole right channel, the
    /// same order [NoiseBlendCore::process()] uses for planar buffers.
    fn transform(&mut self, samples: &mut [StereoSample]) {
        let blend = self.blend.0;
        if blend == 0.0 || self.e.table.is_empty() {
            return;
        }
        for sample in samples.iter_mut() {
            sample.0 = Sample(self.blend_one(sample.0 .0, blend));
        }
        for sample in samples.iter_mut() {
            sample.1 = Sample(self.blend_one(sample.1 .0, blend));
        }
    }

    fn transform_channel(&mut self, _channel: usize, input_sample: Sample) -> Sample {
        let blend = self.blend.0;
        if blend == 0.0 || self.e.table.is_empty() {
            return input_sample;
        }
        Sample(self.blend_one(input_sample.0, blend))
    }
}
impl Configurable for NoiseBlendCore {
    delegate! {
        to self.e.c {
            fn sample_rate(&self) -> SampleRate;
            fn update_sample_rate(&mut self, sample_rate: SampleRate);
        }
    }

    fn reset(&mut self) {
        self.e.cursor = 0;
        self.e.flip_counter = 0;
    }
}
impl Serializable for NoiseBlendCore {
    fn after_deser(&mut self) {
        match self.validate() {
            Ok(_) => self.generate_table(),
            Err(e) => {
                log::warn!("noise blender left in bypass: {e}");
                self.e.table.clear();
            }
        }
    }
}
