// SPDX-License-Identifier: LGPL-3.0-or-later

//! Errors raised at the control surface.
//!
//! The filter kernels and coefficient designers are infallible; these
//! errors only come from host-facing entry points (preparation and the
//! parameter store).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EqError {
    #[error("invalid sample rate {0} Hz (must be finite and > 0)")]
    InvalidSampleRate(f64),
    #[error("invalid maximum block size {0} (must be > 0)")]
    InvalidBlockSize(usize),
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("invalid slope index {0} (expected 0..=3)")]
    InvalidSlope(u32),
    #[error("parameter '{0}' is not a slope selector")]
    NotASlope(&'static str),
}
