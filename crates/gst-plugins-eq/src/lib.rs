// SPDX-License-Identifier: LGPL-3.0-or-later

//! GStreamer audio plugin for the three-band EQ.
//!
//! Registers one element backed by [`eq_dsp_units::processor::EqProcessor`]:
//!
//! | Element            | Description                                      |
//! |--------------------|--------------------------------------------------|
//! | `eq-rs-simple-eq`  | Low-cut, peak and high-cut filter chain          |

use gstreamer::glib;
use gstreamer::prelude::*;

mod base;
mod simple_eq;

glib::wrapper! {
    /// Public GLib type for the simple EQ element.
    pub struct EqRsSimpleEq(ObjectSubclass<simple_eq::EqRsSimpleEq>)
        @extends gstreamer_audio::AudioFilter, gstreamer_base::BaseTransform,
                 gstreamer::Element, gstreamer::Object;
}

/// GStreamer plugin entry point.
fn plugin_init(plugin: &gstreamer::Plugin) -> Result<(), glib::BoolError> {
    gstreamer::Element::register(
        Some(plugin),
        "eq-rs-simple-eq",
        gstreamer::Rank::NONE,
        EqRsSimpleEq::static_type(),
    )?;
    Ok(())
}

gstreamer::plugin_define!(
    eqdsprs,
    env!("CARGO_PKG_DESCRIPTION"),
    plugin_init,
    concat!(env!("CARGO_PKG_VERSION")),
    "LGPL-3.0-or-later",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_REPOSITORY"),
    "2026-10-16"
);
