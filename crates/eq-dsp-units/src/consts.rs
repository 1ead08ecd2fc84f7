// SPDX-License-Identifier: LGPL-3.0-or-later

//! Limits and defaults shared by the settings, parameter store and
//! processor.

/// Number of biquad stages in every low-cut / high-cut cascade.
pub const CASCADE_STAGES: usize = 4;

/// Sample rate assumed before the host calls `prepare`.
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

/// Lowest frequency handed to a coefficient designer (Hz).
pub const MIN_FREQUENCY: f32 = 1.0;

/// Highest designer frequency as a fraction of the sample rate.
///
/// Slightly below Nyquist: `tan(pi * f / fs)` diverges at `f = fs / 2`.
pub const MAX_FREQUENCY_RATIO: f32 = 0.49;

/// Smallest quality factor handed to the peak designer.
pub const MIN_QUALITY: f32 = 0.025;

/// Largest quality factor handed to the peak designer.
pub const MAX_QUALITY: f32 = 40.0;

/// Peak gain limit in dB (symmetric).
pub const MAX_GAIN_DB: f32 = 48.0;

// Parameter defaults

pub const DEFAULT_LOW_CUT_FREQ: f32 = 20.0;
pub const DEFAULT_HIGH_CUT_FREQ: f32 = 20000.0;
pub const DEFAULT_PEAK_FREQ: f32 = 750.0;
pub const DEFAULT_PEAK_GAIN_DB: f32 = 0.0;
pub const DEFAULT_PEAK_QUALITY: f32 = 1.0;
