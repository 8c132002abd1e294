//! Preset file format for reverb settings.
//!
//! Presets are TOML files holding the nine normalized parameters; missing
//! fields fall back to the engine defaults, so a preset only has to name
//! what it changes:
//!
//! ```toml
//! name = "Cathedral"
//! description = "Long dark tail"
//!
//! [params]
//! room_size = 0.92
//! damping = 0.7
//! wet_level = 0.5
//! ```

use cavern_reverb::ReverbParams;
use serde::Deserialize;

/// Preset file format.
#[derive(Debug, Deserialize)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    #[allow(dead_code)]
    pub description: Option<String>,
    /// Parameter overrides.
    #[serde(default)]
    pub params: PresetParams,
}

/// Parameter table; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct PresetParams {
    room_size: Option<f32>,
    damping: Option<f32>,
    wet_level: Option<f32>,
    dry_level: Option<f32>,
    width: Option<f32>,
    freeze: Option<f32>,
    high_freq_delay: Option<f32>,
    crossover: Option<f32>,
    detune_amount: Option<f32>,
}

impl Preset {
    /// Parse a preset from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Resolve to a full parameter set, defaults filling the gaps.
    pub fn to_params(&self) -> ReverbParams {
        let defaults = ReverbParams::default();
        let p = &self.params;
        ReverbParams {
            room_size: p.room_size.unwrap_or(defaults.room_size),
            damping: p.damping.unwrap_or(defaults.damping),
            wet_level: p.wet_level.unwrap_or(defaults.wet_level),
            dry_level: p.dry_level.unwrap_or(defaults.dry_level),
            width: p.width.unwrap_or(defaults.width),
            freeze: p.freeze.unwrap_or(defaults.freeze),
            high_freq_delay: p.high_freq_delay.unwrap_or(defaults.high_freq_delay),
            crossover: p.crossover.unwrap_or(defaults.crossover),
            detune_amount: p.detune_amount.unwrap_or(defaults.detune_amount),
        }
    }
}
