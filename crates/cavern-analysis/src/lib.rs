//! Cavern Analysis - spectrum visualization pipeline
//!
//! Turns the reverb's output into a temporally smooth, perceptually scaled
//! display signal:
//!
//! 1. [`FftCore`] - fixed-order radix-2 transform with precomputed twiddle
//!    factors and a Hann-windowed magnitude front end
//! 2. [`SpectrumPipeline`] - sample FIFO, double-buffered analysis frames,
//!    logarithmic frequency remap and exponential smoothing
//! 3. [`WaveAnimator`] - spring-mass smoothing with neighbor diffusion that
//!    makes the display move like a fluid instead of flickering
//!
//! The pipeline is single-threaded; for hosts where samples arrive on an
//! audio callback while a UI thread drives the display, the
//! [`spectrum_channel`] handoff accumulates windows on the audio side and
//! ships completed frames over a bounded channel that never blocks.
//!
//! ```rust
//! use cavern_analysis::SpectrumPipeline;
//!
//! let mut pipeline = SpectrumPipeline::with_defaults();
//! for i in 0..4096 {
//!     let t = i as f32 / 44100.0;
//!     pipeline.push_sample((t * 1000.0 * std::f32::consts::TAU).sin());
//! }
//! pipeline.update();
//! let bins = pipeline.display_bins();
//! assert_eq!(bins.len(), 512);
//! ```

pub mod animator;
pub mod channel;
pub mod fft;
pub mod pipeline;

// Re-export main types at crate root
pub use animator::{SpringConfig, WaveAnimator};
pub use channel::{FrameReceiver, SpectrumSink, spectrum_channel};
pub use fft::{FftCore, FftError};
pub use pipeline::{AnalyzerConfig, AnimationMode, ColorScheme, SpectrumPipeline};
