// SPDX-License-Identifier: LGPL-3.0-or-later

//! Stereo interleave / de-interleave.
//!
//! Hosts such as GStreamer deliver interleaved `L R L R ...` frames while
//! the filter chains work on one contiguous buffer per channel.

use multiversion::multiversion;

/// Split interleaved stereo frames into `left` and `right`.
///
/// Processes `min(src.len() / 2, left.len(), right.len())` frames.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn deinterleave2(left: &mut [f32], right: &mut [f32], src: &[f32]) {
    for ((l, r), frame) in left
        .iter_mut()
        .zip(right.iter_mut())
        .zip(src.chunks_exact(2))
    {
        *l = frame[0];
        *r = frame[1];
    }
}

/// Merge `left` and `right` into interleaved stereo frames.
///
/// Processes `min(dst.len() / 2, left.len(), right.len())` frames.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn interleave2(dst: &mut [f32], left: &[f32], right: &[f32]) {
    for ((frame, &l), &r) in dst
        .chunks_exact_mut(2)
        .zip(left.iter())
        .zip(right.iter())
    {
        frame[0] = l;
        frame[1] = r;
    }
}
