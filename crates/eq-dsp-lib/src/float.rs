// SPDX-License-Identifier: LGPL-3.0-or-later

//! Float cleanup for recursive filter state.

/// Zero anything that is not a normal float: subnormals, NaN, infinities.
#[inline]
pub fn sanitize(x: f32) -> f32 {
    if x.is_normal() { x } else { 0.0 }
}

/// [`sanitize`] every element of `buf`.
pub fn sanitize_buf(buf: &mut [f32]) {
    buf.iter_mut().for_each(|x| *x = sanitize(*x));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_normal_values_and_zero() {
        for x in [1.0, -0.5, 0.0, f32::MIN_POSITIVE, f32::MAX] {
            assert_eq!(sanitize(x), x);
        }
    }

    #[test]
    fn zeroes_subnormal_and_non_finite() {
        for x in [f32::from_bits(1), -f32::from_bits(7), f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(sanitize(x), 0.0, "{x:e}");
        }
    }

    #[test]
    fn delay_line_cleanup() {
        let mut d = [1.0e-39, -3.5];
        sanitize_buf(&mut d);
        assert_eq!(d, [0.0, -3.5]);
    }
}
