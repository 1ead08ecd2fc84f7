// SPDX-License-Identifier: LGPL-3.0-or-later

//! Caps and pad templates shared by the EQ elements.
//!
//! The filter chains run one mono or one stereo pair, so caps are limited
//! to interleaved f32 with one or two channels.

use once_cell::sync::Lazy;

/// Highest channel count the element accepts.
pub const MAX_CHANNELS: i32 = 2;

/// Interleaved f32 caps, mono or stereo.
pub static F32_STEREO_CAPS: Lazy<gstreamer::Caps> = Lazy::new(|| {
    gstreamer_audio::AudioCapsBuilder::new_interleaved()
        .format(gstreamer_audio::AUDIO_FORMAT_F32)
        .channels_range(1..=MAX_CHANNELS)
        .build()
});

/// Always-present src + sink templates for an in-place f32 filter.
pub fn f32_pad_templates() -> Vec<gstreamer::PadTemplate> {
    let caps = &*F32_STEREO_CAPS;

    [
        ("src", gstreamer::PadDirection::Src),
        ("sink", gstreamer::PadDirection::Sink),
    ]
    .into_iter()
    .map(|(name, direction)| {
        gstreamer::PadTemplate::new(name, direction, gstreamer::PadPresence::Always, caps)
            .expect("failed to create pad template")
    })
    .collect()
}
