// SPDX-License-Identifier: LGPL-3.0-or-later

//! Fixed four-stage cascade used by the low-cut and high-cut banks.

use eq_dsp_lib::types::BiquadState;

use super::butterworth::CoefficientSet;
use super::stage::BiquadStage;
use crate::consts::CASCADE_STAGES;
use crate::settings::Slope;

/// Delay lines for one cascade, owned by the audio context.
pub type CascadeState = [BiquadState; CASCADE_STAGES];

/// Four biquad stages in series. Only the first `slope.order()` stages
/// are active; the rest are bypassed and keep whatever coefficients they
/// last held.
#[derive(Debug)]
pub struct StageCascade {
    stages: [BiquadStage; CASCADE_STAGES],
}

impl Default for StageCascade {
    fn default() -> Self {
        Self::new()
    }
}

impl StageCascade {
    /// All stages start bypassed with identity coefficients.
    pub fn new() -> Self {
        Self {
            stages: std::array::from_fn(|_| BiquadStage::new(true)),
        }
    }

    /// Load `coeffs` and activate the first `slope.order()` stages.
    ///
    /// Every stage is bypassed first, then stage `i` receives
    /// `coeffs[i]` and is re-enabled. A reader may observe the cascade
    /// partially re-enabled for one block; it never sees a torn stage.
    pub fn set_slope(&self, coeffs: &CoefficientSet, slope: Slope) {
        debug_assert!(
            coeffs.len() >= slope.order(),
            "{} sections for {slope}",
            coeffs.len()
        );

        for stage in &self.stages {
            stage.set_bypassed(true);
        }

        for (i, stage) in self.stages.iter().enumerate().take(slope.order()) {
            if let Some(c) = coeffs.get(i) {
                stage.set_coefficients(c.clone());
                stage.set_bypassed(false);
            }
        }
    }

    /// Stage at `index`, or `None` past the end of the cascade.
    pub fn stage(&self, index: usize) -> Option<&BiquadStage> {
        self.stages.get(index)
    }

    /// All stages, active or not, in processing order.
    pub fn stages(&self) -> &[BiquadStage; CASCADE_STAGES] {
        &self.stages
    }

    /// Number of stages currently not bypassed.
    pub fn active_stages(&self) -> usize {
        self.stages.iter().filter(|s| !s.is_bypassed()).count()
    }

    /// Run every stage in order 0..4 over `buf`.
    #[inline]
    pub fn process(&self, buf: &mut [f32], state: &mut CascadeState) {
        for (stage, st) in self.stages.iter().zip(state.iter_mut()) {
            stage.process(buf, st);
        }
    }

    /// Combined linear magnitude of the active stages.
    pub fn magnitude_at(&self, freq: f32, sample_rate: f32) -> f32 {
        self.stages
            .iter()
            .map(|s| s.magnitude_at(freq, sample_rate))
            .product()
    }
}
