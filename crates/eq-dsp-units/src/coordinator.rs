// SPDX-License-Identifier: LGPL-3.0-or-later

//! Distributes freshly designed coefficients to both stereo chains.

use std::sync::Arc;

use crate::filters::butterworth::{design_high_cut, design_low_cut};
use crate::filters::chain::{ChainStages, ChannelChain};
use crate::filters::coeffs::make_peak_filter;
use crate::settings::ChainSettings;

/// Writer for the left and right chains.
///
/// Every design is computed once and the same shared object is handed to
/// both channels, so left and right always run identical coefficients.
/// Exactly one coordinator should write to a pair of chains; two writers
/// interleaving their updates can leave the channels out of step.
#[derive(Debug)]
pub struct ChainCoordinator {
    chains: [Arc<ChainStages>; 2],
}

impl ChainCoordinator {
    /// Coordinator writing to the stages of `left` and `right`.
    pub fn new(left: &ChannelChain, right: &ChannelChain) -> Self {
        Self {
            chains: [Arc::clone(left.stages()), Arc::clone(right.stages())],
        }
    }

    /// Redesign all three blocks from `settings` and publish them.
    ///
    /// Settings are sanitized for `sample_rate` first, so any snapshot is
    /// safe to pass here.
    pub fn update(&self, settings: &ChainSettings, sample_rate: f32) {
        let s = settings.sanitized(sample_rate);
        self.update_peak(&s, sample_rate);
        self.update_low_cut(&s, sample_rate);
        self.update_high_cut(&s, sample_rate);
    }

    fn update_peak(&self, s: &ChainSettings, sample_rate: f32) {
        let coeffs = make_peak_filter(sample_rate, s.peak_freq, s.peak_quality, s.peak_gain_db);
        for chain in &self.chains {
            chain.peak.set_coefficients(Arc::clone(&coeffs));
        }
    }

    fn update_low_cut(&self, s: &ChainSettings, sample_rate: f32) {
        let set = design_low_cut(sample_rate, s.low_cut_freq, s.low_cut_slope);
        for chain in &self.chains {
            chain.low_cut.set_slope(&set, s.low_cut_slope);
        }
    }

    fn update_high_cut(&self, s: &ChainSettings, sample_rate: f32) {
        let set = design_high_cut(sample_rate, s.high_cut_freq, s.high_cut_slope);
        for chain in &self.chains {
            chain.high_cut.set_slope(&set, s.high_cut_slope);
        }
    }

    /// Stages of the left chain.
    pub fn left(&self) -> &ChainStages {
        &self.chains[0]
    }

    /// Stages of the right chain.
    pub fn right(&self) -> &ChainStages {
        &self.chains[1]
    }
}
