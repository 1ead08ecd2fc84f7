// SPDX-License-Identifier: LGPL-3.0-or-later

//! GStreamer element wrapping [`eq_dsp_units::processor::EqProcessor`].
//!
//! A three-band equalizer as a GStreamer `AudioFilter` / `BaseTransform`
//! element: a Butterworth low-cut, an RBJ peak and a Butterworth high-cut,
//! in that order. The element works in place on interleaved f32 audio with
//! one or two channels.
//!
//! Properties write straight into a lock-free [`EqParams`] store that the
//! processor snapshots at the start of every buffer, so changes take
//! effect on the next buffer without touching the streaming lock.

use std::sync::{Arc, Mutex};

use gstreamer::glib;
use gstreamer::prelude::*;
use gstreamer::subclass::prelude::*;
use gstreamer_audio::subclass::prelude::*;
use gstreamer_base::prelude::*;

use eq_dsp_lib::interleave::{deinterleave2, interleave2};
use eq_dsp_units::EqError;
use eq_dsp_units::params::{EqParams, ParamId};
use eq_dsp_units::processor::EqProcessor;

use crate::base;
use once_cell::sync::Lazy;

static CAT: Lazy<gstreamer::DebugCategory> = Lazy::new(|| {
    gstreamer::DebugCategory::new(
        "eq-rs-simple-eq",
        gstreamer::DebugColorFlags::empty(),
        Some("Three-band EQ element"),
    )
});

/// Frames preallocated per channel at setup. Audio caps carry no buffer
/// size, so this is a fixed guess; a larger buffer grows the scratch space
/// once.
const DEFAULT_BLOCK_FRAMES: usize = 4096;

const PROP_ENABLED: &str = "enabled";

/// Property name for every parameter in the store.
const PARAM_PROPERTIES: [(&str, ParamId); 7] = [
    ("low-cut-freq", ParamId::LowCutFreq),
    ("low-cut-slope", ParamId::LowCutSlope),
    ("peak-freq", ParamId::PeakFreq),
    ("peak-gain", ParamId::PeakGain),
    ("peak-quality", ParamId::PeakQuality),
    ("high-cut-freq", ParamId::HighCutFreq),
    ("high-cut-slope", ParamId::HighCutSlope),
];

fn param_for_property(name: &str) -> Option<ParamId> {
    PARAM_PROPERTIES
        .iter()
        .find(|(prop, _)| *prop == name)
        .map(|&(_, id)| id)
}

/// Build the ParamSpec for one store parameter from its range.
fn param_spec(name: &str, id: ParamId) -> glib::ParamSpec {
    let range = id.range();
    if id.is_choice() {
        glib::ParamSpecUInt::builder(name)
            .nick(id.name())
            .blurb("Cut slope: 0=12, 1=24, 2=36, 3=48 dB/octave")
            .minimum(range.min as u32)
            .maximum(range.max as u32)
            .default_value(range.default as u32)
            .mutable_playing()
            .build()
    } else {
        glib::ParamSpecFloat::builder(name)
            .nick(id.name())
            .blurb(match id {
                ParamId::PeakGain => "Peak gain in dB",
                ParamId::PeakQuality => "Peak quality factor",
                _ => "Frequency in Hz",
            })
            .minimum(range.min)
            .maximum(range.max)
            .default_value(range.default)
            .mutable_playing()
            .build()
    }
}

// ── Streaming state ────────────────────────────────────────────────

/// Processor plus per-channel scratch buffers, created at caps setup.
struct State {
    processor: EqProcessor,
    channels: usize,
    left: Vec<f32>,
    right: Vec<f32>,
}

impl State {
    fn new(params: Arc<EqParams>, sample_rate: u32, channels: usize) -> Result<Self, EqError> {
        let mut processor = EqProcessor::new(params);
        processor.prepare(f64::from(sample_rate), DEFAULT_BLOCK_FRAMES)?;
        Ok(Self {
            processor,
            channels,
            left: vec![0.0; DEFAULT_BLOCK_FRAMES],
            right: vec![0.0; DEFAULT_BLOCK_FRAMES],
        })
    }

    /// Make room for `frames` per channel. Returns `true` if it had to grow.
    fn ensure_capacity(&mut self, frames: usize) -> bool {
        if frames <= self.left.len() {
            return false;
        }
        self.left.resize(frames, 0.0);
        self.right.resize(frames, 0.0);
        true
    }

    /// Filter interleaved `samples` in place. Returns `true` if the
    /// scratch buffers had to grow for this buffer.
    fn process(&mut self, samples: &mut [f32]) -> bool {
        if self.channels == 1 {
            self.processor.process_mono(samples);
            return false;
        }

        let frames = samples.len() / 2;
        let grown = self.ensure_capacity(frames);
        let left = &mut self.left[..frames];
        let right = &mut self.right[..frames];

        deinterleave2(left, right, samples);
        self.processor.process(left, right);
        interleave2(samples, left, right);
        grown
    }
}

// ── Element definition ─────────────────────────────────────────────

/// GStreamer three-band EQ element backed by `eq_dsp_units`.
#[derive(Default)]
pub struct EqRsSimpleEq {
    params: Arc<EqParams>,
    inner: Mutex<EqRsSimpleEqInner>,
}

struct EqRsSimpleEqInner {
    enabled: bool,
    state: Option<State>,
}

impl Default for EqRsSimpleEqInner {
    fn default() -> Self {
        Self {
            enabled: true,
            state: None,
        }
    }
}

#[glib::object_subclass]
impl ObjectSubclass for EqRsSimpleEq {
    const NAME: &'static str = "EqRsSimpleEq";
    type Type = super::EqRsSimpleEq;
    type ParentType = gstreamer_audio::AudioFilter;
}

impl ObjectImpl for EqRsSimpleEq {
    fn properties() -> &'static [glib::ParamSpec] {
        static PROPERTIES: Lazy<Vec<glib::ParamSpec>> = Lazy::new(|| {
            let mut props: Vec<glib::ParamSpec> = PARAM_PROPERTIES
                .iter()
                .map(|&(name, id)| param_spec(name, id))
                .collect();
            props.push(
                glib::ParamSpecBoolean::builder(PROP_ENABLED)
                    .nick("Enabled")
                    .blurb("Enable processing (false = passthrough)")
                    .default_value(true)
                    .mutable_playing()
                    .build(),
            );
            props
        });
        PROPERTIES.as_ref()
    }

    fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
        let name = pspec.name();
        if name == PROP_ENABLED {
            let enabled: bool = value.get().expect("type checked");
            self.inner.lock().expect("mutex poisoned").enabled = enabled;
            self.obj().set_passthrough(!enabled);
            gstreamer::debug!(CAT, imp = self, "enabled = {enabled}");
            return;
        }

        let Some(id) = param_for_property(name) else {
            panic!("unknown property {name}");
        };
        let stored = if id.is_choice() {
            let choice: u32 = value.get().expect("type checked");
            self.params.set(id, choice as f32)
        } else {
            self.params.set(id, value.get().expect("type checked"))
        };
        gstreamer::debug!(CAT, imp = self, "{} = {stored}", id.name());
    }

    fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
        let name = pspec.name();
        if name == PROP_ENABLED {
            return self.inner.lock().expect("mutex poisoned").enabled.to_value();
        }

        match param_for_property(name) {
            Some(id) if id.is_choice() => (self.params.get(id) as u32).to_value(),
            Some(id) => self.params.get(id).to_value(),
            None => panic!("unknown property {name}"),
        }
    }
}

impl GstObjectImpl for EqRsSimpleEq {}

impl ElementImpl for EqRsSimpleEq {
    fn metadata() -> Option<&'static gstreamer::subclass::ElementMetadata> {
        static ELEMENT_METADATA: Lazy<gstreamer::subclass::ElementMetadata> = Lazy::new(|| {
            gstreamer::subclass::ElementMetadata::new(
                "EQ RS Simple EQ",
                "Filter/Effect/Audio",
                "Low-cut, peak and high-cut equalizer",
                "EQ DSP <noreply@eq-dsp.dev>",
            )
        });
        Some(&*ELEMENT_METADATA)
    }

    fn pad_templates() -> &'static [gstreamer::PadTemplate] {
        static PAD_TEMPLATES: Lazy<Vec<gstreamer::PadTemplate>> =
            Lazy::new(base::f32_pad_templates);
        PAD_TEMPLATES.as_ref()
    }
}

impl BaseTransformImpl for EqRsSimpleEq {
    const MODE: gstreamer_base::subclass::BaseTransformMode =
        gstreamer_base::subclass::BaseTransformMode::AlwaysInPlace;
    const PASSTHROUGH_ON_SAME_CAPS: bool = false;
    const TRANSFORM_IP_ON_PASSTHROUGH: bool = false;

    fn transform_ip(
        &self,
        buf: &mut gstreamer::BufferRef,
    ) -> Result<gstreamer::FlowSuccess, gstreamer::FlowError> {
        let mut inner = self.inner.lock().map_err(|_| {
            gstreamer::element_error!(self.obj(), gstreamer::CoreError::Failed, ["Mutex poisoned"]);
            gstreamer::FlowError::Error
        })?;

        let Some(state) = inner.state.as_mut() else {
            return Ok(gstreamer::FlowSuccess::Ok);
        };

        let mut map = buf.map_writable().map_err(|_| {
            gstreamer::element_error!(
                self.obj(),
                gstreamer::CoreError::Failed,
                ["Failed to map buffer writable"]
            );
            gstreamer::FlowError::Error
        })?;

        // Safety: caps negotiation guarantees f32 interleaved audio.
        let samples: &mut [f32] = unsafe {
            let ptr = map.as_mut_ptr() as *mut f32;
            let len = map.len() / std::mem::size_of::<f32>();
            std::slice::from_raw_parts_mut(ptr, len)
        };

        if state.process(samples) {
            let frames = samples.len() / state.channels;
            gstreamer::debug!(CAT, imp = self, "scratch buffers grown to {frames} frames");
        }

        drop(map);
        Ok(gstreamer::FlowSuccess::Ok)
    }

    fn stop(&self) -> Result<(), gstreamer::ErrorMessage> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| gstreamer::error_msg!(gstreamer::CoreError::Failed, ["Mutex poisoned"]))?;
        inner.state = None;
        gstreamer::debug!(CAT, imp = self, "stopped");
        Ok(())
    }
}

impl AudioFilterImpl for EqRsSimpleEq {
    fn allowed_caps() -> &'static gstreamer::Caps {
        &base::F32_STEREO_CAPS
    }

    fn setup(&self, info: &gstreamer_audio::AudioInfo) -> Result<(), gstreamer::LoggableError> {
        self.parent_setup(info)?;

        let sample_rate = info.rate();
        let channels = info.channels() as usize;
        if channels == 0 || channels > base::MAX_CHANNELS as usize {
            return Err(gstreamer::loggable_error!(
                gstreamer::CAT_RUST,
                "Unsupported channel count {}",
                channels
            ));
        }

        let state = State::new(Arc::clone(&self.params), sample_rate, channels).map_err(|e| {
            gstreamer::loggable_error!(gstreamer::CAT_RUST, "Failed to prepare EQ: {}", e)
        })?;

        let mut inner = self.inner.lock().map_err(|_| {
            gstreamer::loggable_error!(
                gstreamer::CAT_RUST,
                "Mutex poisoned in AudioFilterImpl::setup"
            )
        })?;
        inner.state = Some(state);
        let enabled = inner.enabled;
        drop(inner);

        self.obj().set_passthrough(!enabled);
        gstreamer::info!(
            CAT,
            imp = self,
            "configured for {sample_rate} Hz, {channels} channel(s)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eq_dsp_units::settings::Slope;
    use std::f32::consts::PI;

    fn init() {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            gstreamer::init().expect("Failed to initialize GStreamer");
            crate::plugin_register_static().expect("Failed to register eqdsprs plugin");
        });
    }

    fn make_eq() -> gstreamer::Element {
        init();
        gstreamer::ElementFactory::make("eq-rs-simple-eq")
            .build()
            .expect("failed to create eq-rs-simple-eq")
    }

    fn stereo_sine(freq: f32, sr: f32, frames: usize) -> Vec<f32> {
        (0..frames)
            .flat_map(|i| {
                let s = (2.0 * PI * freq * i as f32 / sr).sin();
                [s, -s]
            })
            .collect()
    }

    #[test]
    fn element_creation() {
        let _elem = make_eq();
    }

    #[test]
    fn property_defaults() {
        let elem = make_eq();
        assert_eq!(elem.property::<f32>("low-cut-freq"), 20.0);
        assert_eq!(elem.property::<f32>("high-cut-freq"), 20000.0);
        assert_eq!(elem.property::<f32>("peak-freq"), 750.0);
        assert_eq!(elem.property::<f32>("peak-gain"), 0.0);
        assert_eq!(elem.property::<f32>("peak-quality"), 1.0);
        assert_eq!(elem.property::<u32>("low-cut-slope"), 0);
        assert_eq!(elem.property::<u32>("high-cut-slope"), 0);
        assert!(elem.property::<bool>("enabled"));
    }

    #[test]
    fn property_set_get_roundtrip() {
        let elem = make_eq();
        elem.set_property("low-cut-freq", 80.0f32);
        elem.set_property("low-cut-slope", 3u32);
        elem.set_property("peak-freq", 2500.0f32);
        elem.set_property("peak-gain", -6.5f32);
        elem.set_property("peak-quality", 2.0f32);
        elem.set_property("high-cut-freq", 12000.0f32);
        elem.set_property("high-cut-slope", 1u32);
        elem.set_property("enabled", false);

        assert_eq!(elem.property::<f32>("low-cut-freq"), 80.0);
        assert_eq!(elem.property::<u32>("low-cut-slope"), 3);
        assert_eq!(elem.property::<f32>("peak-freq"), 2500.0);
        assert_eq!(elem.property::<f32>("peak-gain"), -6.5);
        assert_eq!(elem.property::<f32>("peak-quality"), 2.0);
        assert_eq!(elem.property::<f32>("high-cut-freq"), 12000.0);
        assert_eq!(elem.property::<u32>("high-cut-slope"), 1);
        assert!(!elem.property::<bool>("enabled"));
    }

    #[test]
    fn every_parameter_has_a_property() {
        for id in ParamId::ALL {
            assert!(
                PARAM_PROPERTIES.iter().any(|&(_, p)| p == id),
                "{} has no property",
                id.name()
            );
        }
        assert_eq!(param_for_property("peak-gain"), Some(ParamId::PeakGain));
        assert_eq!(param_for_property("band0-gain"), None);
    }

    #[test]
    fn state_rejects_zero_rate() {
        let params = Arc::new(EqParams::new());
        assert!(State::new(params, 0, 2).is_err());
    }

    #[test]
    fn state_stereo_matches_processor() {
        let params = Arc::new(EqParams::new());
        params.set(ParamId::PeakGain, 12.0);
        params.set(ParamId::PeakFreq, 1000.0);
        params
            .set_slope(ParamId::HighCutSlope, Slope::Slope24)
            .unwrap();

        let mut state = State::new(Arc::clone(&params), 48000, 2).unwrap();
        let mut interleaved = stereo_sine(1000.0, 48000.0, 1024);
        let original = interleaved.clone();
        state.process(&mut interleaved);

        let mut reference = EqProcessor::new(params);
        reference.prepare(48000.0, 1024).unwrap();
        let mut left: Vec<f32> = original.iter().step_by(2).copied().collect();
        let mut right: Vec<f32> = original.iter().skip(1).step_by(2).copied().collect();
        reference.process(&mut left, &mut right);

        for (i, frame) in interleaved.chunks_exact(2).enumerate() {
            assert_eq!(frame[0], left[i]);
            assert_eq!(frame[1], right[i]);
        }
    }

    #[test]
    fn state_grows_for_large_buffers() {
        let params = Arc::new(EqParams::new());
        let mut state = State::new(params, 44100, 2).unwrap();
        assert!(!state.ensure_capacity(DEFAULT_BLOCK_FRAMES));

        let mut big = stereo_sine(440.0, 44100.0, DEFAULT_BLOCK_FRAMES * 2);
        assert!(state.process(&mut big));
        assert_eq!(state.left.len(), DEFAULT_BLOCK_FRAMES * 2);
        assert!(!state.process(&mut big));
        assert!(big.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn state_mono() {
        let params = Arc::new(EqParams::new());
        params.set(ParamId::PeakGain, -12.0);
        let mut state = State::new(params, 48000, 1).unwrap();

        let mut buf: Vec<f32> = (0..4800)
            .map(|i| (2.0 * PI * 750.0 * i as f32 / 48000.0).sin())
            .collect();
        state.process(&mut buf);
        let tail = buf[2400..].iter().fold(0.0f32, |m, &x| m.max(x.abs()));
        assert!(tail < 0.3, "expected ~-12 dB, got peak {tail}");
    }

    #[test]
    fn pipeline_processes_audio() {
        init();
        let pipeline = gstreamer::Pipeline::new();
        let src = gstreamer::ElementFactory::make("audiotestsrc")
            .property("num-buffers", 5i32)
            .property("samplesperbuffer", 1024i32)
            .build()
            .expect("audiotestsrc");
        let capsfilter = gstreamer::ElementFactory::make("capsfilter")
            .property(
                "caps",
                gstreamer_audio::AudioCapsBuilder::new_interleaved()
                    .format(gstreamer_audio::AUDIO_FORMAT_F32)
                    .rate(44100)
                    .channels(2)
                    .build(),
            )
            .build()
            .expect("capsfilter");
        let eq = make_eq();
        eq.set_property("peak-freq", 1000.0f32);
        eq.set_property("peak-gain", 6.0f32);
        eq.set_property("low-cut-slope", 2u32);

        let sink = gstreamer::ElementFactory::make("fakesink")
            .build()
            .expect("fakesink");

        pipeline
            .add_many([&src, &capsfilter, &eq, &sink])
            .expect("add elements");
        gstreamer::Element::link_many([&src, &capsfilter, &eq, &sink]).expect("link elements");

        pipeline
            .set_state(gstreamer::State::Playing)
            .expect("set playing");

        let bus = pipeline.bus().expect("bus");
        for msg in bus.iter_timed(gstreamer::ClockTime::from_seconds(5)) {
            match msg.view() {
                gstreamer::MessageView::Eos(..) => break,
                gstreamer::MessageView::Error(err) => {
                    panic!("Pipeline error: {} ({:?})", err.error(), err.debug());
                }
                _ => {}
            }
        }

        pipeline
            .set_state(gstreamer::State::Null)
            .expect("set null");
    }
}
