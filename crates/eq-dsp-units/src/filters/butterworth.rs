// SPDX-License-Identifier: LGPL-3.0-or-later

//! Nth-order Butterworth design as cascaded second-order sections.
//!
//! Butterworth filters are maximally flat in the passband. This module
//! designs lowpass and highpass variants with orders 1 to 8 and returns
//! one coefficient object per section, ready to be loaded into a
//! [`StageCascade`](super::cascade::StageCascade).
//!
//! For even orders, N/2 biquad sections are produced. For odd orders, one
//! first-order section plus (N-1)/2 biquad sections are produced.
//!
//! Pole placement follows the standard Butterworth formula: the k-th
//! conjugate pair sits at angle `pi * (2k + 1) / (2N)` from the imaginary
//! axis of the s-plane, mapped to the z-plane via the bilinear transform
//! with a pre-warped cutoff.

use std::f32::consts::PI;
use std::sync::Arc;

use eq_dsp_lib::types::BiquadCoeffs;

use super::SharedCoeffs;
use crate::consts::CASCADE_STAGES;
use crate::settings::Slope;

/// Maximum supported filter order.
pub const MAX_ORDER: usize = 2 * CASCADE_STAGES;

/// Butterworth filter type (lowpass or highpass).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButterworthType {
    /// Passes frequencies below the cutoff (high-cut bank).
    Lowpass,
    /// Passes frequencies above the cutoff (low-cut bank).
    Highpass,
}

/// Ordered sections of one Butterworth design.
///
/// Sections are produced together by a single design call; cascading
/// them in order yields the full response.
#[derive(Debug, Clone)]
pub struct CoefficientSet {
    sections: Vec<SharedCoeffs>,
}

impl CoefficientSet {
    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section `index`, if present.
    pub fn get(&self, index: usize) -> Option<&SharedCoeffs> {
        self.sections.get(index)
    }

    /// Sections in cascade order.
    pub fn as_slice(&self) -> &[SharedCoeffs] {
        &self.sections
    }

    /// Iterate the sections in cascade order.
    pub fn iter(&self) -> impl Iterator<Item = &SharedCoeffs> {
        self.sections.iter()
    }

    /// Combined linear magnitude of all sections at `freq`.
    pub fn magnitude_at(&self, freq: f32, sample_rate: f32) -> f32 {
        self.sections
            .iter()
            .map(|c| eq_dsp_lib::filters::biquad_freq_response(c, freq, sample_rate).0)
            .product()
    }
}

/// Design an `order`-th order Butterworth filter (clamped to 1..=8).
///
/// Returns `ceil(order / 2)` sections. For odd orders the first section
/// is first-order (`b2 = a2 = 0`).
pub fn design_butterworth(
    filter_type: ButterworthType,
    sample_rate: f32,
    cutoff: f32,
    order: usize,
) -> CoefficientSet {
    let n = order.clamp(1, MAX_ORDER);
    let mut sections = Vec::with_capacity(n.div_ceil(2));

    // Pre-warp the cutoff frequency for bilinear transform
    let wc = (PI * cutoff / sample_rate).tan();

    if n % 2 == 1 {
        sections.push(Arc::new(first_order_section(filter_type, wc)));
    }

    for k in 0..n / 2 {
        let theta = PI * (2 * k + 1) as f32 / (2 * n) as f32;
        sections.push(Arc::new(second_order_section(filter_type, wc, theta)));
    }

    CoefficientSet { sections }
}

/// Low-cut bank design: a highpass with `slope.order()` biquad sections.
pub fn design_low_cut(sample_rate: f32, cutoff: f32, slope: Slope) -> CoefficientSet {
    design_butterworth(ButterworthType::Highpass, sample_rate, cutoff, 2 * slope.order())
}

/// High-cut bank design: a lowpass with `slope.order()` biquad sections.
pub fn design_high_cut(sample_rate: f32, cutoff: f32, slope: Slope) -> CoefficientSet {
    design_butterworth(ButterworthType::Lowpass, sample_rate, cutoff, 2 * slope.order())
}

/// First-order section for odd-order filters.
fn first_order_section(filter_type: ButterworthType, wc: f32) -> BiquadCoeffs {
    // H(s) = wc / (s + wc) or s / (s + wc), then bilinear transform.
    // a1_std = (wc - 1) / (1 + wc); pre-negated a1 = (1 - wc) / (1 + wc).
    let k = 1.0 / (1.0 + wc);
    let a1 = (1.0 - wc) * k;

    let (b0, b1) = match filter_type {
        ButterworthType::Lowpass => (wc * k, wc * k),
        ButterworthType::Highpass => (k, -k),
    };

    BiquadCoeffs {
        b0,
        b1,
        b2: 0.0,
        a1,
        a2: 0.0,
    }
}

/// Second-order section for the conjugate pole pair at angle `theta`.
fn second_order_section(filter_type: ButterworthType, wc: f32, theta: f32) -> BiquadCoeffs {
    // Prototype denominator: s^2 + 2*sin(theta)*wc*s + wc^2
    let wc2 = wc * wc;
    let two_sin_theta = 2.0 * theta.sin();
    let inv_d = 1.0 / (1.0 + two_sin_theta * wc + wc2);

    let (b0, b1, b2) = match filter_type {
        // Numerator: wc^2 * (1 + 2*z^-1 + z^-2)
        ButterworthType::Lowpass => (wc2 * inv_d, 2.0 * wc2 * inv_d, wc2 * inv_d),
        // Numerator: 1 - 2*z^-1 + z^-2
        ButterworthType::Highpass => (inv_d, -2.0 * inv_d, inv_d),
    };

    let a1_std = 2.0 * (wc2 - 1.0) * inv_d;
    let a2_std = (1.0 - two_sin_theta * wc + wc2) * inv_d;

    BiquadCoeffs {
        b0,
        b1,
        b2,
        a1: -a1_std,
        a2: -a2_std,
    }
}
