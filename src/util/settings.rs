// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information about the crate's devices.
//! Intended to be serialized.

use crate::prelude::*;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a plugin built from this crate needs to restore its devices:
/// the noise blender's and the transposer's configuration. Stored as JSON with
/// kebab-case keys.
///
/// ```json
/// {
///   "noise-blend": { "blend": 0.2, "table-size": 4096, "flip-length": 8, "headroom-db": -12.0 },
///   "transposer": { "semitones": -12, "cents": 0.0, "bend-range": 2, "out-of-range": "drop" }
/// }
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// The noise effect.
    pub noise_blend: NoiseBlendCore,

    /// The MIDI transposer.
    pub transposer: TransposerCore,

    #[serde(skip)]
    has_been_saved: bool,
}
impl HasSettings for Settings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
impl Serializable for Settings {
    fn after_deser(&mut self) {
        self.noise_blend.after_deser();
        self.transposer.after_deser();
    }
}
impl Settings {
    /// Parses settings from JSON, rejecting configurations the devices can't
    /// run with, and readies the devices for processing.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut settings: Self = serde_json::from_str(json).context("parsing settings")?;
        settings
            .noise_blend
            .validate()
            .context("noise-blend settings")?;
        settings
            .transposer
            .validate()
            .context("transposer settings")?;
        settings.after_deser();
        Ok(settings)
    }

    /// Renders settings as pretty-printed JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let mut settings =
            Self::from_json(&json).with_context(|| format!("loading {}", path.display()))?;
        settings.mark_clean();
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Saves settings to a JSON file.
    pub fn save(&mut self, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        self.mark_clean();
        log::info!("saved settings to {}", path.display());
        Ok(())
    }
}
