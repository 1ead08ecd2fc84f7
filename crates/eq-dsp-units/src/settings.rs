// SPDX-License-Identifier: LGPL-3.0-or-later

//! User-facing chain settings and the cut-slope selector.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_HIGH_CUT_FREQ, DEFAULT_LOW_CUT_FREQ, DEFAULT_PEAK_FREQ, DEFAULT_PEAK_GAIN_DB,
    DEFAULT_PEAK_QUALITY, MAX_FREQUENCY_RATIO, MAX_GAIN_DB, MAX_QUALITY, MIN_FREQUENCY,
    MIN_QUALITY,
};
use crate::error::EqError;

/// Steepness of a low-cut or high-cut cascade.
///
/// Each active biquad stage contributes 12 dB/octave. The discriminant is
/// the ordinal, so `order() == ordinal() + 1` is the number of active
/// stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Slope {
    #[default]
    Slope12 = 0,
    Slope24 = 1,
    Slope36 = 2,
    Slope48 = 3,
}

impl Slope {
    /// All slopes in ordinal order.
    pub const ALL: [Slope; 4] = [Slope::Slope12, Slope::Slope24, Slope::Slope36, Slope::Slope48];

    /// Zero-based position of the selector.
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Number of active biquad stages.
    #[inline]
    pub const fn order(self) -> usize {
        self.ordinal() + 1
    }

    /// Roll-off in dB per octave.
    pub const fn db_per_octave(self) -> u32 {
        12 * self.order() as u32
    }

    /// Map a stored choice value to a slope, rounding and clamping into
    /// range. Non-finite values select [`Slope::Slope12`].
    pub fn from_choice(value: f32) -> Self {
        if !value.is_finite() {
            return Slope::Slope12;
        }
        let idx = value.round().clamp(0.0, 3.0) as usize;
        Self::ALL[idx]
    }
}

impl TryFrom<u32> for Slope {
    type Error = EqError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(v as usize)
            .copied()
            .ok_or(EqError::InvalidSlope(v))
    }
}

impl fmt::Display for Slope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} db/Oct", self.db_per_octave())
    }
}

/// Snapshot of every parameter that shapes the filter chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    /// Peak centre frequency in Hz.
    pub peak_freq: f32,
    /// Peak gain in dB.
    pub peak_gain_db: f32,
    /// Peak quality factor.
    pub peak_quality: f32,
    /// Low-cut (high-pass) corner frequency in Hz.
    pub low_cut_freq: f32,
    /// High-cut (low-pass) corner frequency in Hz.
    pub high_cut_freq: f32,
    pub low_cut_slope: Slope,
    pub high_cut_slope: Slope,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            peak_freq: DEFAULT_PEAK_FREQ,
            peak_gain_db: DEFAULT_PEAK_GAIN_DB,
            peak_quality: DEFAULT_PEAK_QUALITY,
            low_cut_freq: DEFAULT_LOW_CUT_FREQ,
            high_cut_freq: DEFAULT_HIGH_CUT_FREQ,
            low_cut_slope: Slope::Slope12,
            high_cut_slope: Slope::Slope12,
        }
    }
}

impl ChainSettings {
    /// Bring every field into the range the coefficient designers accept
    /// at `sample_rate`.
    ///
    /// Non-finite values fall back to their defaults. Frequencies clamp to
    /// `[MIN_FREQUENCY, MAX_FREQUENCY_RATIO * sample_rate]`, Q to
    /// `[MIN_QUALITY, MAX_QUALITY]`, gain to `±MAX_GAIN_DB`.
    pub fn sanitized(&self, sample_rate: f32) -> Self {
        let max_freq = (sample_rate * MAX_FREQUENCY_RATIO).max(MIN_FREQUENCY);
        let freq = |v: f32, default: f32| or_default(v, default).clamp(MIN_FREQUENCY, max_freq);

        Self {
            peak_freq: freq(self.peak_freq, DEFAULT_PEAK_FREQ),
            peak_gain_db: or_default(self.peak_gain_db, DEFAULT_PEAK_GAIN_DB)
                .clamp(-MAX_GAIN_DB, MAX_GAIN_DB),
            peak_quality: or_default(self.peak_quality, DEFAULT_PEAK_QUALITY)
                .clamp(MIN_QUALITY, MAX_QUALITY),
            low_cut_freq: freq(self.low_cut_freq, DEFAULT_LOW_CUT_FREQ),
            high_cut_freq: freq(self.high_cut_freq, DEFAULT_HIGH_CUT_FREQ),
            low_cut_slope: self.low_cut_slope,
            high_cut_slope: self.high_cut_slope,
        }
    }
}

#[inline]
fn or_default(v: f32, default: f32) -> f32 {
    if v.is_finite() { v } else { default }
}

/// Anything that can produce a [`ChainSettings`] snapshot.
///
/// Reads must be side-effect free and safe to call from the audio thread.
pub trait ChainSettingsSource: Send + Sync {
    fn chain_settings(&self) -> ChainSettings;
}

impl ChainSettingsSource for ChainSettings {
    fn chain_settings(&self) -> ChainSettings {
        *self
    }
}
