// SPDX-License-Identifier: LGPL-3.0-or-later

//! Host-facing stereo processor.
//!
//! The host calls [`EqProcessor::prepare`] once the sample rate is known
//! and then [`EqProcessor::process`] for every block. Each block starts by
//! reading a settings snapshot from the parameter source; coefficients are
//! redesigned only when that snapshot differs from the last one applied.
//!
//! The processor is the only writer of coefficients. A control thread
//! changes the filter by writing to the settings source; the next block
//! picks the change up and hands the same design to both channels.

use std::sync::Arc;

use eq_dsp_lib::types::DspContext;
use log::{debug, warn};

use crate::consts::DEFAULT_SAMPLE_RATE;
use crate::coordinator::ChainCoordinator;
use crate::error::EqError;
use crate::filters::chain::{ChainStages, ChannelChain};
use crate::params::EqParams;
use crate::settings::{ChainSettings, ChainSettingsSource};

/// Three-band EQ over a left and right channel.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use eq_dsp_units::params::{EqParams, ParamId};
/// use eq_dsp_units::processor::EqProcessor;
///
/// let params = Arc::new(EqParams::new());
/// let mut eq = EqProcessor::new(Arc::clone(&params));
/// eq.prepare(48000.0, 512).unwrap();
///
/// params.set(ParamId::PeakGain, 6.0);
/// let mut left = vec![0.0f32; 512];
/// let mut right = vec![0.0f32; 512];
/// eq.process(&mut left, &mut right);
/// ```
#[derive(Debug)]
pub struct EqProcessor<S: ChainSettingsSource = EqParams> {
    source: Arc<S>,
    left: ChannelChain,
    right: ChannelChain,
    coordinator: ChainCoordinator,
    sample_rate: f32,
    max_block_size: usize,
    prepared: bool,
    /// Last sanitized settings pushed to the chains.
    applied: Option<ChainSettings>,
    ctx: DspContext,
}

impl Default for EqProcessor<EqParams> {
    fn default() -> Self {
        Self::new(Arc::new(EqParams::new()))
    }
}

impl<S: ChainSettingsSource> EqProcessor<S> {
    /// Unprepared processor reading settings from `source`.
    pub fn new(source: Arc<S>) -> Self {
        let left = ChannelChain::new();
        let right = ChannelChain::new();
        let coordinator = ChainCoordinator::new(&left, &right);
        Self {
            source,
            left,
            right,
            coordinator,
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_block_size: 0,
            prepared: false,
            applied: None,
            ctx: DspContext::default(),
        }
    }

    /// Configure for `sample_rate` and clear all filter history.
    ///
    /// Must be called before the first [`process`](Self::process) and
    /// again whenever the sample rate changes. On error the processor is
    /// left unprepared.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<(), EqError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            warn!("prepare: rejecting sample rate {sample_rate}");
            self.prepared = false;
            return Err(EqError::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 {
            warn!("prepare: rejecting zero block size");
            self.prepared = false;
            return Err(EqError::InvalidBlockSize(max_block_size));
        }

        self.sample_rate = sample_rate as f32;
        self.max_block_size = max_block_size;
        self.reset();

        self.applied = None;
        self.update_if_changed();
        self.prepared = true;

        debug!("prepared at {} Hz, max block {max_block_size}", self.sample_rate);
        Ok(())
    }

    /// Filter one stereo block in place.
    ///
    /// Before [`prepare`](Self::prepare) succeeds the audio passes through
    /// unchanged. Both slices are expected to have the same length.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        if !self.prepared {
            return;
        }

        self.ctx.start();
        self.update_if_changed();
        self.left.process(left);
        self.right.process(right);
        self.ctx.finish();
    }

    /// Filter a single-channel block through the left chain.
    pub fn process_mono(&mut self, buf: &mut [f32]) {
        if !self.prepared {
            return;
        }

        self.ctx.start();
        self.update_if_changed();
        self.left.process(buf);
        self.ctx.finish();
    }

    /// Clear all delay lines. Coefficients are kept.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        debug!("filter state reset");
    }

    /// Read-only view of the left chain's stages, for analysers.
    pub fn left_stages(&self) -> &ChainStages {
        self.coordinator.left()
    }

    /// Read-only view of the right chain's stages.
    pub fn right_stages(&self) -> &ChainStages {
        self.coordinator.right()
    }

    /// Linear magnitude of the chain at `freq`, for the current sample rate.
    pub fn magnitude_response(&self, freq: f32) -> f32 {
        self.left.stages().magnitude_at(freq, self.sample_rate)
    }

    /// Sample rate from the last successful `prepare`.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Largest block the host announced in `prepare`.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Whether `prepare` has succeeded since construction.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Settings source read at the start of every block.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    fn update_if_changed(&mut self) {
        let settings = self.source.chain_settings().sanitized(self.sample_rate);
        if self.applied == Some(settings) {
            return;
        }
        self.coordinator.update(&settings, self.sample_rate);
        self.applied = Some(settings);
    }
}
