// SPDX-License-Identifier: LGPL-3.0-or-later

//! Lock-free parameter store.
//!
//! Seven parameters shape the chain: three frequencies, peak gain and
//! quality, and two slope selectors. Values live in `AtomicF32` cells, so
//! the control thread can write while the audio thread takes
//! [`ChainSettings`] snapshots without locking.
//!
//! Ranges, steps and defaults come from [`ParamId::range`]; host adapters
//! should build their property specs from there too.

use std::sync::atomic::Ordering;

use atomic_float::AtomicF32;
use log::debug;

use crate::consts::{
    DEFAULT_HIGH_CUT_FREQ, DEFAULT_LOW_CUT_FREQ, DEFAULT_PEAK_FREQ, DEFAULT_PEAK_GAIN_DB,
    DEFAULT_PEAK_QUALITY,
};
use crate::error::EqError;
use crate::settings::{ChainSettings, ChainSettingsSource, Slope};

/// Identifies one parameter of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    LowCutFreq,
    HighCutFreq,
    PeakFreq,
    PeakGain,
    PeakQuality,
    LowCutSlope,
    HighCutSlope,
}

impl ParamId {
    pub const ALL: [ParamId; 7] = [
        ParamId::LowCutFreq,
        ParamId::HighCutFreq,
        ParamId::PeakFreq,
        ParamId::PeakGain,
        ParamId::PeakQuality,
        ParamId::LowCutSlope,
        ParamId::HighCutSlope,
    ];

    /// Host-visible name.
    pub const fn name(self) -> &'static str {
        match self {
            ParamId::LowCutFreq => "LowCut Freq",
            ParamId::HighCutFreq => "HighCut Freq",
            ParamId::PeakFreq => "Peak Freq",
            ParamId::PeakGain => "Peak Gain",
            ParamId::PeakQuality => "Peak Quality",
            ParamId::LowCutSlope => "LowCut Slope",
            ParamId::HighCutSlope => "HighCut Slope",
        }
    }

    /// Look a parameter up by its host-visible name.
    pub fn from_name(name: &str) -> Result<Self, EqError> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == name)
            .ok_or_else(|| EqError::UnknownParameter(name.to_owned()))
    }

    /// Slope selectors take integer choice values.
    pub const fn is_choice(self) -> bool {
        matches!(self, ParamId::LowCutSlope | ParamId::HighCutSlope)
    }

    /// Host-facing range, step, skew and default.
    pub const fn range(self) -> ParamRange {
        match self {
            ParamId::LowCutFreq => ParamRange::freq(DEFAULT_LOW_CUT_FREQ),
            ParamId::HighCutFreq => ParamRange::freq(DEFAULT_HIGH_CUT_FREQ),
            ParamId::PeakFreq => ParamRange::freq(DEFAULT_PEAK_FREQ),
            ParamId::PeakGain => ParamRange {
                min: -24.0,
                max: 24.0,
                step: 0.5,
                skew: 1.0,
                default: DEFAULT_PEAK_GAIN_DB,
            },
            ParamId::PeakQuality => ParamRange {
                min: 0.1,
                max: 10.0,
                step: 0.05,
                skew: 1.0,
                default: DEFAULT_PEAK_QUALITY,
            },
            ParamId::LowCutSlope | ParamId::HighCutSlope => ParamRange {
                min: 0.0,
                max: 3.0,
                step: 1.0,
                skew: 1.0,
                default: 0.0,
            },
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Value range of a parameter, with a skewed normalised mapping for hosts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    /// Snapping interval; `0.0` means continuous.
    pub step: f32,
    /// Exponent of the normalised mapping. Below 1 gives more resolution
    /// at the low end.
    pub skew: f32,
    pub default: f32,
}

impl ParamRange {
    const fn freq(default: f32) -> Self {
        Self {
            min: 20.0,
            max: 20000.0,
            step: 1.0,
            skew: 0.25,
            default,
        }
    }

    /// Clamp into `[min, max]`. NaN maps to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Map a value to `[0, 1]`: `((v - min) / (max - min))^skew`.
    pub fn to_normalized(&self, value: f32) -> f32 {
        let proportion = ((self.clamp(value) - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        if self.skew == 1.0 {
            proportion
        } else {
            proportion.powf(self.skew)
        }
    }

    /// Inverse of [`to_normalized`](Self::to_normalized), snapped to `step`.
    pub fn from_normalized(&self, normalized: f32) -> f32 {
        let mut proportion = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };
        if self.skew != 1.0 && proportion > 0.0 {
            proportion = (proportion.ln() / self.skew).exp();
        }
        self.snap(self.min + (self.max - self.min) * proportion)
    }

    fn snap(&self, value: f32) -> f32 {
        if self.step > 0.0 {
            let snapped = self.min + self.step * ((value - self.min) / self.step).round();
            snapped.clamp(self.min, self.max)
        } else {
            value
        }
    }
}

/// Atomic store of the seven chain parameters.
#[derive(Debug)]
pub struct EqParams {
    values: [AtomicF32; 7],
}

impl Default for EqParams {
    fn default() -> Self {
        Self::new()
    }
}

impl EqParams {
    /// Store holding every parameter's default.
    pub fn new() -> Self {
        Self {
            values: ParamId::ALL.map(|id| AtomicF32::new(id.range().default)),
        }
    }

    /// Set a parameter, clamped into its range (choices are rounded).
    /// Returns the value actually stored.
    pub fn set(&self, id: ParamId, value: f32) -> f32 {
        let range = id.range();
        let mut stored = range.clamp(value);
        if id.is_choice() {
            stored = stored.round();
        }
        if stored != value {
            debug!("{}: {value} adjusted to {stored}", id.name());
        }
        self.values[id.index()].store(stored, Ordering::Relaxed);
        stored
    }

    /// Set a parameter by host-visible name.
    pub fn set_by_name(&self, name: &str, value: f32) -> Result<f32, EqError> {
        Ok(self.set(ParamId::from_name(name)?, value))
    }

    /// Set a parameter from a normalised `[0, 1]` host value.
    pub fn set_normalized(&self, id: ParamId, normalized: f32) -> f32 {
        self.set(id, id.range().from_normalized(normalized))
    }

    /// Current plain value of `id`.
    pub fn get(&self, id: ParamId) -> f32 {
        self.values[id.index()].load(Ordering::Relaxed)
    }

    /// Current value of `id` mapped into `0.0..=1.0`.
    pub fn get_normalized(&self, id: ParamId) -> f32 {
        id.range().to_normalized(self.get(id))
    }

    /// Store a slope choice. Fails for ids that are not slope choices.
    pub fn set_slope(&self, id: ParamId, slope: Slope) -> Result<(), EqError> {
        if !id.is_choice() {
            return Err(EqError::NotASlope(id.name()));
        }
        self.set_slope_unchecked(id, slope);
        Ok(())
    }

    fn set_slope_unchecked(&self, id: ParamId, slope: Slope) {
        self.values[id.index()].store(slope.ordinal() as f32, Ordering::Relaxed);
    }

    /// Read a slope choice. Fails for ids that are not slope choices.
    pub fn slope(&self, id: ParamId) -> Result<Slope, EqError> {
        if !id.is_choice() {
            return Err(EqError::NotASlope(id.name()));
        }
        Ok(Slope::from_choice(self.get(id)))
    }

    /// Put every parameter back to its default.
    pub fn reset_to_defaults(&self) {
        for id in ParamId::ALL {
            self.values[id.index()].store(id.range().default, Ordering::Relaxed);
        }
    }

    /// Read every parameter into a [`ChainSettings`].
    pub fn snapshot(&self) -> ChainSettings {
        ChainSettings {
            peak_freq: self.get(ParamId::PeakFreq),
            peak_gain_db: self.get(ParamId::PeakGain),
            peak_quality: self.get(ParamId::PeakQuality),
            low_cut_freq: self.get(ParamId::LowCutFreq),
            high_cut_freq: self.get(ParamId::HighCutFreq),
            low_cut_slope: Slope::from_choice(self.get(ParamId::LowCutSlope)),
            high_cut_slope: Slope::from_choice(self.get(ParamId::HighCutSlope)),
        }
    }

    /// Write every field of `settings` (clamped as by [`set`](Self::set)).
    pub fn apply(&self, settings: &ChainSettings) {
        self.set(ParamId::PeakFreq, settings.peak_freq);
        self.set(ParamId::PeakGain, settings.peak_gain_db);
        self.set(ParamId::PeakQuality, settings.peak_quality);
        self.set(ParamId::LowCutFreq, settings.low_cut_freq);
        self.set(ParamId::HighCutFreq, settings.high_cut_freq);
        self.set_slope_unchecked(ParamId::LowCutSlope, settings.low_cut_slope);
        self.set_slope_unchecked(ParamId::HighCutSlope, settings.high_cut_slope);
    }
}

impl ChainSettingsSource for EqParams {
    fn chain_settings(&self) -> ChainSettings {
        self.snapshot()
    }
}
