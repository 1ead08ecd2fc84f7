// SPDX-License-Identifier: LGPL-3.0-or-later

//! A single bypassable biquad stage with swappable coefficients.
//!
//! The stage holds control data only. The delay line lives with the
//! audio context and is passed in to [`BiquadStage::process`], so a stage
//! can be shared between the control and audio threads behind an `Arc`.

use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use eq_dsp_lib::filters::{biquad_freq_response, biquad_process_inplace};
use eq_dsp_lib::types::{BiquadCoeffs, BiquadState};

use super::SharedCoeffs;

#[derive(Debug)]
pub struct BiquadStage {
    coeffs: ArcSwap<BiquadCoeffs>,
    bypassed: AtomicBool,
}

impl Default for BiquadStage {
    fn default() -> Self {
        Self::new(false)
    }
}

impl BiquadStage {
    /// Create a stage holding identity coefficients.
    pub fn new(bypassed: bool) -> Self {
        Self {
            coeffs: ArcSwap::from_pointee(BiquadCoeffs::IDENTITY),
            bypassed: AtomicBool::new(bypassed),
        }
    }

    /// Replace the coefficient reference. The audio thread sees either the
    /// previous or the new object, never a mix.
    pub fn set_coefficients(&self, coeffs: SharedCoeffs) {
        self.coeffs.store(coeffs);
    }

    /// Current coefficient reference.
    pub fn coefficients(&self) -> SharedCoeffs {
        self.coeffs.load_full()
    }

    /// Bypassed stages leave the buffer and their delay line untouched.
    pub fn set_bypassed(&self, bypassed: bool) {
        self.bypassed.store(bypassed, Ordering::Release);
    }

    /// Whether the stage is currently skipped.
    pub fn is_bypassed(&self) -> bool {
        self.bypassed.load(Ordering::Acquire)
    }

    /// Filter `buf` in place using `state` as the delay line.
    ///
    /// Does nothing when bypassed; the delay line is left untouched.
    #[inline]
    pub fn process(&self, buf: &mut [f32], state: &mut BiquadState) {
        if self.is_bypassed() {
            return;
        }
        let coeffs = self.coeffs.load();
        biquad_process_inplace(buf, &coeffs, state);
    }

    /// Linear magnitude at `freq`, or 1.0 when bypassed.
    pub fn magnitude_at(&self, freq: f32, sample_rate: f32) -> f32 {
        if self.is_bypassed() {
            return 1.0;
        }
        biquad_freq_response(&self.coeffs.load(), freq, sample_rate).0
    }
}
