//! Cavern Core - DSP primitives for the cavern reverberator
//!
//! This crate provides the stateful building blocks the reverb engine is
//! assembled from, designed for real-time audio processing with zero
//! allocation in the audio path.
//!
//! # Building Blocks
//!
//! - [`DelayLine`] - fixed-capacity circular delay buffer with integer reads
//! - [`DampedComb`] - feedback comb with in-loop damping and freeze support
//! - [`DiffusionAllpass`] - Schroeder allpass for diffusion without coloration
//! - [`CrossoverSplitter`] - one-pole low/high band splitter
//!
//! # Utilities
//!
//! - Math helpers: [`flush_denormal`], [`mono_sum`], [`wet_dry_mix`],
//!   [`db_to_linear`], [`linear_to_db`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! cavern-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: buffers are sized once at construction; processing
//!   never allocates, locks, or panics
//! - **Explicit state**: every filter owns its delay state; no shared or
//!   module-level mutable state
//! - **`libm` for math**: no dependency on `std` float intrinsics

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod crossover;
pub mod delay;
pub mod math;

// Re-export main types at crate root
pub use allpass::DiffusionAllpass;
pub use comb::DampedComb;
pub use crossover::CrossoverSplitter;
pub use delay::DelayLine;
pub use math::{
    db_to_linear, flush_denormal, linear_to_db, mono_sum, wet_dry_mix, wet_dry_mix_stereo,
};
