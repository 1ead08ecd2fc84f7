// SPDX-License-Identifier: LGPL-3.0-or-later

//! Peaking (bell) coefficient design using the RBJ Audio EQ Cookbook.
//!
//! All coefficients are returned in the eq-dsp-lib convention where
//! `a1` and `a2` are **pre-negated** relative to the cookbook formulas.

use std::f32::consts::PI;
use std::sync::Arc;

use eq_dsp_lib::types::BiquadCoeffs;

use super::SharedCoeffs;

/// Calculate peaking-EQ biquad coefficients.
///
/// The cookbook amplitude `A = 10^(gain_db/40)` puts a linear magnitude of
/// `A^2 = 10^(gain_db/20)` at the centre frequency.
///
/// # Parameters
///
/// - `sample_rate` -- sample rate in Hz (must be > 0)
/// - `freq` -- centre frequency in Hz, in `(0, sample_rate / 2)`
/// - `q` -- quality factor (must be > 0)
/// - `gain_db` -- boost (positive) or cut (negative) in dB
///
/// Inputs are not validated; out-of-range values give degenerate but
/// non-panicking coefficients.
pub fn calc_peaking(sample_rate: f32, freq: f32, q: f32, gain_db: f32) -> BiquadCoeffs {
    let w0 = 2.0 * PI * freq / sample_rate;
    let cos_w0 = w0.cos();
    let alpha = w0.sin() / (2.0 * q);
    let a_lin = 10.0_f32.powf(gain_db / 40.0);

    let b0 = 1.0 + alpha * a_lin;
    let b1 = -2.0 * cos_w0;
    let b2 = 1.0 - alpha * a_lin;
    let a0 = 1.0 + alpha / a_lin;
    let a1_std = -2.0 * cos_w0;
    let a2_std = 1.0 - alpha / a_lin;

    let inv_a0 = 1.0 / a0;

    BiquadCoeffs {
        b0: b0 * inv_a0,
        b1: b1 * inv_a0,
        b2: b2 * inv_a0,
        // Pre-negate for eq-dsp-lib convention
        a1: -a1_std * inv_a0,
        a2: -a2_std * inv_a0,
    }
}

/// Design the peak stage as a shareable coefficient object.
pub fn make_peak_filter(sample_rate: f32, freq: f32, q: f32, gain_db: f32) -> SharedCoeffs {
    Arc::new(calc_peaking(sample_rate, freq, q, gain_db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{db_to_gain, gain_to_db};
    use eq_dsp_lib::filters::biquad_freq_response;
    use float_cmp::assert_approx_eq;

    const SR: f32 = 48000.0;

    fn mag(c: &BiquadCoeffs, freq: f32) -> f32 {
        biquad_freq_response(c, freq, SR).0
    }

    #[test]
    fn known_values() {
        let c = calc_peaking(SR, 1000.0, 1.0, 6.0);
        assert!(c.is_finite());

        let w0 = 2.0 * PI * 1000.0 / SR;
        let alpha = w0.sin() / 2.0;
        let a = 10.0_f32.powf(6.0 / 40.0);
        let a0 = 1.0 + alpha / a;

        let tol = 1e-6;
        assert!((c.b0 - (1.0 + alpha * a) / a0).abs() < tol, "b0 mismatch");
        assert!((c.b1 - (-2.0 * w0.cos()) / a0).abs() < tol, "b1 mismatch");
        assert!((c.b2 - (1.0 - alpha * a) / a0).abs() < tol, "b2 mismatch");
        assert!((c.a1 - 2.0 * w0.cos() / a0).abs() < tol, "a1 mismatch");
        assert!((c.a2 - -(1.0 - alpha / a) / a0).abs() < tol, "a2 mismatch");
    }

    #[test]
    fn zero_gain_is_unity_everywhere() {
        let c = calc_peaking(SR, 750.0, 1.0, 0.0);
        for freq in [20.0, 100.0, 750.0, 1000.0, 5000.0, 15000.0, 23000.0] {
            assert_approx_eq!(f32, mag(&c, freq), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn zero_gain_numerator_equals_denominator() {
        let c = calc_peaking(SR, 2500.0, 0.7, 0.0);
        // b1 == -a1 and b2 == -a2 when A == 1 (pre-negated denominator).
        assert_approx_eq!(f32, c.b1, -c.a1, ulps = 2);
        assert_approx_eq!(f32, c.b2, -c.a2, ulps = 2);
        assert_approx_eq!(f32, c.b0, 1.0, ulps = 2);
    }

    #[test]
    fn centre_gain_matches_request() {
        for gain_db in [-12.0, -3.0, 6.0, 15.0, 24.0] {
            let c = calc_peaking(SR, 1000.0, 1.0, gain_db);
            let measured = mag(&c, 1000.0);
            assert_approx_eq!(f32, gain_to_db(measured), gain_db, epsilon = 0.01);
            assert!((measured / db_to_gain(gain_db) - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn boost_falls_off_an_octave_away() {
        let c = calc_peaking(SR, 1000.0, 1.0, 15.0);
        let centre = gain_to_db(mag(&c, 1000.0));
        let below = gain_to_db(mag(&c, 500.0));
        let above = gain_to_db(mag(&c, 2000.0));
        assert!(below < centre - 3.0, "500 Hz: {below} dB vs {centre} dB");
        assert!(above < centre - 3.0, "2 kHz: {above} dB vs {centre} dB");
        assert!(below > 0.0 && above > 0.0, "octave neighbours still boosted");
    }

    #[test]
    fn boost_and_cut_are_complementary() {
        let boost = calc_peaking(SR, 1000.0, 1.0, 6.0);
        let cut = calc_peaking(SR, 1000.0, 1.0, -6.0);
        for freq in [100.0, 1000.0, 4000.0] {
            assert_approx_eq!(f32, mag(&boost, freq) * mag(&cut, freq), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn design_is_deterministic() {
        let a = make_peak_filter(44100.0, 3150.0, 2.5, -7.5);
        let b = make_peak_filter(44100.0, 3150.0, 2.5, -7.5);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.b0.to_bits(), b.b0.to_bits());
        assert_eq!(a.b1.to_bits(), b.b1.to_bits());
        assert_eq!(a.b2.to_bits(), b.b2.to_bits());
        assert_eq!(a.a1.to_bits(), b.a1.to_bits());
        assert_eq!(a.a2.to_bits(), b.a2.to_bits());
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        let _ = calc_peaking(SR, 1000.0, 0.0, 6.0);
        let _ = calc_peaking(SR, 0.0, 1.0, 6.0);
        let _ = calc_peaking(SR, SR, 1.0, 6.0);
    }
}
