// SPDX-License-Identifier: LGPL-3.0-or-later

//! # eq-dsp-lib
//!
//! Low-level DSP primitives used by `eq-dsp-units` to build the
//! three-band equalizer chain. It includes:
//!
//! - **Types**: biquad coefficients, biquad delay-line state, and the
//!   denormal-flushing [`types::DspContext`]
//! - **Filters**: single-section biquad kernels and frequency-response
//!   evaluation
//! - **Float utilities**: denormal/NaN sanitisation
//! - **Interleave**: stereo interleave/de-interleave helpers for hosts
//!   that deliver interleaved frames
//!
//! ## Design
//!
//! Coefficients follow the pre-negated `a1`/`a2` convention: the
//! recurrence adds the feedback terms, so the sign flip lives in the
//! coefficients rather than in the inner loop.
//!
//! Buffer-shuffling functions use runtime SIMD dispatch via the
//! `multiversion` crate. Recursive filter kernels are scalar by nature
//! and are left to the compiler.

pub mod filters;
pub mod float;
pub mod interleave;
pub mod types;
