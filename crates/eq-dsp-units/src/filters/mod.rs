// SPDX-License-Identifier: LGPL-3.0-or-later

//! Coefficient designers and the stage / cascade / chain topology.
//!
//! Designers return coefficients in the eq-dsp-lib pre-negated `a1/a2`
//! convention, wrapped in [`SharedCoeffs`] so one design can be handed to
//! both stereo channels without recomputation.

use std::sync::Arc;

use eq_dsp_lib::types::BiquadCoeffs;

pub mod butterworth;
pub mod cascade;
pub mod chain;
pub mod coeffs;
pub mod stage;

/// Immutable, reference-counted biquad coefficients.
pub type SharedCoeffs = Arc<BiquadCoeffs>;
