// SPDX-License-Identifier: LGPL-3.0-or-later

//! Biquad section kernels.
//!
//! Coefficients use the pre-negated feedback convention from [`BiquadCoeffs`],
//! so both delay updates are sums. One sample `x` becomes `y` as:
//! ```text
//!   y    = b0 * x + d[0]
//!   d[0] = d[1] + b1 * x + a1 * y
//!   d[1] =        b2 * x + a2 * y
//! ```

use std::f32::consts::TAU;

use crate::types::{BiquadCoeffs, BiquadState, BIQUAD_D_ITEMS};

/// One transposed direct form II step.
#[inline(always)]
fn tick(c: &BiquadCoeffs, d: &mut [f32; BIQUAD_D_ITEMS], x: f32) -> f32 {
    let y = c.b0 * x + d[0];
    d[0] = d[1] + c.b1 * x + c.a1 * y;
    d[1] = c.b2 * x + c.a2 * y;
    y
}

/// Filter `src` into `dst`. The shorter of the two slices sets the length.
pub fn biquad_process(dst: &mut [f32], src: &[f32], c: &BiquadCoeffs, st: &mut BiquadState) {
    let mut d = st.d;
    dst.iter_mut()
        .zip(src)
        .for_each(|(y, &x)| *y = tick(c, &mut d, x));
    st.d = d;
}

/// Filter `buf` in place.
pub fn biquad_process_inplace(buf: &mut [f32], c: &BiquadCoeffs, st: &mut BiquadState) {
    let mut d = st.d;
    buf.iter_mut().for_each(|v| *v = tick(c, &mut d, *v));
    st.d = d;
}

/// Linear magnitude and phase (radians) of one section at `freq` Hz.
pub fn biquad_freq_response(c: &BiquadCoeffs, freq: f32, sample_rate: f32) -> (f32, f32) {
    // z^-1 and z^-2 on the unit circle, as (re, im).
    let w = TAU * freq / sample_rate;
    let (s1, c1) = w.sin_cos();
    let (s2, c2) = (2.0 * w).sin_cos();
    let z1 = (c1, -s1);
    let z2 = (c2, -s2);

    let num = (c.b0 + c.b1 * z1.0 + c.b2 * z2.0, c.b1 * z1.1 + c.b2 * z2.1);
    let den = (1.0 - c.a1 * z1.0 - c.a2 * z2.0, -(c.a1 * z1.1 + c.a2 * z2.1));

    let norm = den.0 * den.0 + den.1 * den.1;
    let re = (num.0 * den.0 + num.1 * den.1) / norm;
    let im = (num.1 * den.0 - num.0 * den.1) / norm;

    (re.hypot(im), im.atan2(re))
}
