// SPDX-License-Identifier: LGPL-3.0-or-later

//! Per-channel filter chain: low-cut cascade, peak stage, high-cut cascade.
//!
//! [`ChainStages`] is the control half, shared through an `Arc` with the
//! [`ChainCoordinator`](crate::coordinator::ChainCoordinator).
//! [`ChannelChain`] is the audio half: it holds the shared stages plus the
//! delay lines, which only the audio context touches.

use std::sync::Arc;

use eq_dsp_lib::float::sanitize_buf;
use eq_dsp_lib::types::BiquadState;

use super::cascade::{CascadeState, StageCascade};
use super::stage::BiquadStage;

/// Position of a block in the chain, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainPosition {
    LowCut,
    Peak,
    HighCut,
}

impl ChainPosition {
    pub const ALL: [ChainPosition; 3] = [
        ChainPosition::LowCut,
        ChainPosition::Peak,
        ChainPosition::HighCut,
    ];
}

/// Control-side topology of one channel. Fixed for the lifetime of the
/// processor; only bypass flags and coefficient references change.
#[derive(Debug, Default)]
pub struct ChainStages {
    pub low_cut: StageCascade,
    pub peak: BiquadStage,
    pub high_cut: StageCascade,
}

impl ChainStages {
    /// Identity peak stage and fully bypassed cut cascades.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the block at `pos` has any active stage.
    pub fn is_active(&self, pos: ChainPosition) -> bool {
        match pos {
            ChainPosition::LowCut => self.low_cut.active_stages() > 0,
            ChainPosition::Peak => !self.peak.is_bypassed(),
            ChainPosition::HighCut => self.high_cut.active_stages() > 0,
        }
    }

    /// Linear magnitude of the block at `pos`, bypassed stages excluded.
    pub fn block_magnitude(&self, pos: ChainPosition, freq: f32, sample_rate: f32) -> f32 {
        match pos {
            ChainPosition::LowCut => self.low_cut.magnitude_at(freq, sample_rate),
            ChainPosition::Peak => self.peak.magnitude_at(freq, sample_rate),
            ChainPosition::HighCut => self.high_cut.magnitude_at(freq, sample_rate),
        }
    }

    /// Linear magnitude of the whole chain at `freq`: the product over
    /// every active block.
    pub fn magnitude_at(&self, freq: f32, sample_rate: f32) -> f32 {
        ChainPosition::ALL
            .into_iter()
            .filter(|&pos| self.is_active(pos))
            .map(|pos| self.block_magnitude(pos, freq, sample_rate))
            .product()
    }
}

/// One channel's chain as seen by the audio context.
#[derive(Debug)]
pub struct ChannelChain {
    stages: Arc<ChainStages>,
    low_cut: CascadeState,
    peak: BiquadState,
    high_cut: CascadeState,
}

impl Default for ChannelChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelChain {
    /// Fresh stages and cleared delay lines.
    pub fn new() -> Self {
        Self {
            stages: Arc::new(ChainStages::new()),
            low_cut: CascadeState::default(),
            peak: BiquadState::default(),
            high_cut: CascadeState::default(),
        }
    }

    /// Shared control half of this chain.
    pub fn stages(&self) -> &Arc<ChainStages> {
        &self.stages
    }

    /// Filter `buf` in place: low-cut, then peak, then high-cut.
    pub fn process(&mut self, buf: &mut [f32]) {
        let stages = &*self.stages;
        stages.low_cut.process(buf, &mut self.low_cut);
        stages.peak.process(buf, &mut self.peak);
        stages.high_cut.process(buf, &mut self.high_cut);

        self.sanitize_state();
    }

    /// Clear every delay line.
    pub fn reset(&mut self) {
        self.low_cut.iter_mut().for_each(BiquadState::reset);
        self.peak.reset();
        self.high_cut.iter_mut().for_each(BiquadState::reset);
    }

    fn sanitize_state(&mut self) {
        for st in self
            .low_cut
            .iter_mut()
            .chain(std::iter::once(&mut self.peak))
            .chain(self.high_cut.iter_mut())
        {
            sanitize_buf(&mut st.d);
        }
    }

    #[cfg(test)]
    fn is_silent(&self) -> bool {
        self.low_cut
            .iter()
            .chain(std::iter::once(&self.peak))
            .chain(self.high_cut.iter())
            .all(|st| st.d == [0.0; 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::butterworth::{design_high_cut, design_low_cut};
    use crate::filters::coeffs::make_peak_filter;
    use crate::settings::Slope;

    const SR: f32 = 48000.0;

    fn configure(stages: &ChainStages) {
        stages.peak.set_coefficients(make_peak_filter(SR, 1000.0, 1.0, 6.0));
        stages
            .low_cut
            .set_slope(&design_low_cut(SR, 100.0, Slope::Slope24), Slope::Slope24);
        stages
            .high_cut
            .set_slope(&design_high_cut(SR, 8000.0, Slope::Slope12), Slope::Slope12);
    }

    #[test]
    fn new_chain_passes_audio_through() {
        let mut chain = ChannelChain::new();
        // Peak is active with identity coefficients, cuts are bypassed.
        assert!(chain.stages().is_active(ChainPosition::Peak));
        assert!(!chain.stages().is_active(ChainPosition::LowCut));
        assert!(!chain.stages().is_active(ChainPosition::HighCut));

        let input: Vec<f32> = (0..64).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buf = input.clone();
        chain.process(&mut buf);
        assert_eq!(buf, input);
    }

    #[test]
    fn order_is_low_cut_peak_high_cut() {
        let mut chain = ChannelChain::new();
        configure(chain.stages());

        let input: Vec<f32> = (0..256).map(|i| ((i * 7919) % 97) as f32 / 97.0 - 0.5).collect();
        let mut buf = input.clone();
        chain.process(&mut buf);

        // Run the same stages by hand in the documented order.
        let stages = chain.stages();
        let mut expected = input;
        let mut lc = CascadeState::default();
        let mut pk = BiquadState::default();
        let mut hc = CascadeState::default();
        stages.low_cut.process(&mut expected, &mut lc);
        stages.peak.process(&mut expected, &mut pk);
        stages.high_cut.process(&mut expected, &mut hc);

        assert_eq!(buf, expected);
    }

    #[test]
    fn reset_clears_history() {
        let mut chain = ChannelChain::new();
        configure(chain.stages());

        let mut buf = vec![0.5f32; 128];
        chain.process(&mut buf);
        assert!(!chain.is_silent());

        chain.reset();
        assert!(chain.is_silent());
    }

    #[test]
    fn magnitude_multiplies_blocks() {
        let chain = ChannelChain::new();
        let stages = chain.stages();
        configure(stages);

        let f = 1000.0;
        let expected = ChainPosition::ALL
            .iter()
            .map(|&pos| stages.block_magnitude(pos, f, SR))
            .fold(1.0, |acc, m| acc * m);
        assert_eq!(stages.magnitude_at(f, SR), expected);
        assert!(stages.magnitude_at(f, SR) > 1.9);
    }

    #[test]
    fn bypassed_blocks_drop_out_of_response() {
        let chain = ChannelChain::new();
        let stages = chain.stages();
        configure(stages);
        let f = 60.0;
        let with_low_cut = stages.magnitude_at(f, SR);

        for stage in stages.low_cut.stages() {
            stage.set_bypassed(true);
        }
        assert!(!stages.is_active(ChainPosition::LowCut));
        let without = stages.magnitude_at(f, SR);
        assert_eq!(
            without,
            stages.block_magnitude(ChainPosition::Peak, f, SR)
                * stages.block_magnitude(ChainPosition::HighCut, f, SR)
        );
        assert!(without > with_low_cut * 2.0);
    }
}
