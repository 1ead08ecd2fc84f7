// SPDX-License-Identifier: LGPL-3.0-or-later

//! # eq-dsp-units
//!
//! The filter-chain core of a three-band parametric equalizer, built on
//! top of [`eq_dsp_lib`]. Each audio channel runs:
//!
//! ```text
//!   low-cut cascade (Butterworth HP, 1..4 stages)
//!     -> peak (RBJ bell)
//!     -> high-cut cascade (Butterworth LP, 1..4 stages)
//! ```
//!
//! - **Filters**: coefficient designers, [`filters::stage::BiquadStage`],
//!   [`filters::cascade::StageCascade`], [`filters::chain::ChannelChain`]
//! - **Coordinator**: [`coordinator::ChainCoordinator`] distributes one set
//!   of designed coefficients to both stereo channels
//! - **Parameters**: [`settings::ChainSettings`] snapshots and the lock-free
//!   [`params::EqParams`] store
//! - **Processor**: [`processor::EqProcessor`], the host-facing
//!   `prepare`/`process` surface
//!
//! ## Real-time model
//!
//! Coefficients are immutable values behind an atomically swappable
//! reference-counted handle; bypass flags are atomics. The audio path
//! never locks and never allocates, and always observes either the old
//! or the new coefficient object for a stage.

pub mod consts;
pub mod coordinator;
pub mod error;
pub mod filters;
pub mod params;
pub mod processor;
pub mod settings;
pub mod units;

pub use error::EqError;
