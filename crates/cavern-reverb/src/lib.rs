//! Cavern Reverb - the reverberation engine
//!
//! A Schroeder-topology reverb extended with frequency-dependent
//! processing: the input is split at a crossover, the low band feeds a bank
//! of damped comb filters, the high band takes a separate short delay, and
//! the recombined signal is diffused through allpass chains and widened by
//! a short-delay stereo detuner.
//!
//! # Quick Start
//!
//! ```rust
//! use cavern_reverb::{ReverbEngine, ReverbParams};
//!
//! let mut engine = ReverbEngine::with_sample_rate(48000.0).unwrap();
//! engine.set_params(ReverbParams {
//!     room_size: 0.8,
//!     wet_level: 0.5,
//!     ..ReverbParams::default()
//! });
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! engine.process_stereo(&mut left, &mut right).unwrap();
//! ```
//!
//! # Threading
//!
//! The engine itself is single-threaded and meant to live on the audio
//! thread. For hosts where parameter changes originate on a control thread,
//! [`SharedParams`] provides a lock-free snapshot handoff: the control side
//! calls [`SharedParams::store`], the audio side picks the snapshot up with
//! [`SharedParams::load`] before each block. Processing never allocates,
//! locks or panics once the engine is configured.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod detune;
pub mod engine;
pub mod hf_delay;
pub mod params;
pub mod shared;

// Re-export main types at crate root
pub use detune::HarmonicDetuner;
pub use engine::{ALLPASS_TUNINGS_44K, COMB_TUNINGS_44K, ReverbEngine, ReverbError};
pub use hf_delay::HighFreqDelay;
pub use params::ReverbParams;
pub use shared::SharedParams;
