//! The reverb engine: crossover, comb bank, diffusion, detune, mix.
//!
//! Signal path per stereo sample:
//!
//! ```text
//!          ┌─ low ──┐                      ┌─ allpass x4 (L) ─┐
//! in L ─ split      ├ mono ─ combs 0..4 ──┤                   ├─ detune ─ width ─ mix ─ out L
//! in R ─ split      ├ mono ─ combs 4..8 ──┤                   │
//!          └─ high ─┴─ hf delay blend ────┴─ allpass x4 (R) ──┘
//! ```
//!
//! The low band of both channels is mono-summed into the comb bank (half
//! the bank per output channel); the high band takes the per-channel
//! high-frequency delay and rejoins the wet path before diffusion. Freeze
//! acts on the comb bank only.

use cavern_core::{CrossoverSplitter, DampedComb, DiffusionAllpass, mono_sum, wet_dry_mix};

use crate::{HarmonicDetuner, HighFreqDelay, ReverbParams};

/// Comb filter delay times in samples at the 44.1 kHz reference rate.
///
/// The classic mutually-prime tuning set; mutual primeness keeps the comb
/// resonances from stacking onto common frequencies.
pub const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass delay times in samples at the 44.1 kHz reference rate.
pub const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Reference sample rate for the tuning tables.
const REFERENCE_RATE: f32 = 44100.0;

/// Gain applied to each stereo half-bank sum (4 combs per channel).
const STEREO_COMB_GAIN: f32 = 0.25;

/// Gain applied to the full-bank sum in mono (8 combs).
const MONO_COMB_GAIN: f32 = 0.125;

/// Scale a reference-rate delay length to the target rate, minimum 1.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    ((samples as f32 * target_rate / REFERENCE_RATE) as usize).max(1)
}

/// Errors surfaced by the engine API.
///
/// Processing errors are reported before any sample is touched: a call
/// either runs to completion or does not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverbError {
    /// `process_mono`/`process_stereo` called before `set_sample_rate`.
    NotConfigured,
    /// Stereo buffers of different lengths were passed.
    ChannelLengthMismatch {
        /// Length of the left buffer.
        left: usize,
        /// Length of the right buffer.
        right: usize,
    },
    /// `set_sample_rate` called with a rate that is not finite and positive.
    InvalidSampleRate,
}

impl core::fmt::Display for ReverbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConfigured => {
                write!(f, "engine not configured: call set_sample_rate first")
            }
            Self::ChannelLengthMismatch { left, right } => {
                write!(
                    f,
                    "stereo buffers must have equal length (left={left}, right={right})"
                )
            }
            Self::InvalidSampleRate => {
                write!(f, "sample rate must be finite and positive")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReverbError {}

/// All sample-rate-sized processing state, built by `set_sample_rate`.
#[derive(Debug, Clone)]
struct Stages {
    combs: [DampedComb; 8],
    allpass_l: [DiffusionAllpass; 4],
    allpass_r: [DiffusionAllpass; 4],
    crossover_l: CrossoverSplitter,
    crossover_r: CrossoverSplitter,
    hf_delay_l: HighFreqDelay,
    hf_delay_r: HighFreqDelay,
    detuner: HarmonicDetuner,
}

impl Stages {
    fn new(sample_rate: f32, params: &ReverbParams) -> Self {
        let mut stages = Self {
            combs: core::array::from_fn(|i| {
                DampedComb::new(scale_to_rate(COMB_TUNINGS_44K[i], sample_rate))
            }),
            allpass_l: core::array::from_fn(|i| {
                DiffusionAllpass::new(scale_to_rate(ALLPASS_TUNINGS_44K[i], sample_rate))
            }),
            allpass_r: core::array::from_fn(|i| {
                DiffusionAllpass::new(scale_to_rate(ALLPASS_TUNINGS_44K[i], sample_rate))
            }),
            crossover_l: CrossoverSplitter::new(sample_rate, params.crossover),
            crossover_r: CrossoverSplitter::new(sample_rate, params.crossover),
            hf_delay_l: HighFreqDelay::new(sample_rate),
            hf_delay_r: HighFreqDelay::new(sample_rate),
            detuner: HarmonicDetuner::new(),
        };
        stages.apply_params(params);
        stages
    }

    /// Derive per-filter coefficients from a parameter snapshot.
    ///
    /// Runs once per parameter change, never per sample.
    fn apply_params(&mut self, params: &ReverbParams) {
        let room_scale = 0.28 + 0.5 * params.room_size;
        let tuning_max = COMB_TUNINGS_44K[COMB_TUNINGS_44K.len() - 1] as f32;
        let damp = 0.4 * params.damping;

        for (comb, &tuning) in self.combs.iter_mut().zip(&COMB_TUNINGS_44K) {
            // Longer combs get proportionally more feedback, normalized by
            // the longest tuning so the loop gain stays below unity.
            comb.set_feedback(room_scale * tuning as f32 / tuning_max);
            comb.set_damp(damp);
            comb.set_freeze(params.freeze);
        }

        self.crossover_l.set_crossover(params.crossover);
        self.crossover_r.set_crossover(params.crossover);
        self.hf_delay_l.set_amount(params.high_freq_delay);
        self.hf_delay_r.set_amount(params.high_freq_delay);
    }

    fn clear(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in self.allpass_l.iter_mut().chain(&mut self.allpass_r) {
            allpass.clear();
        }
        self.crossover_l.reset();
        self.crossover_r.reset();
        self.hf_delay_l.clear();
        self.hf_delay_r.clear();
        self.detuner.reset();
    }

    #[inline]
    fn tick_stereo(&mut self, in_l: f32, in_r: f32, params: &ReverbParams) -> (f32, f32) {
        let (low_l, high_l) = self.crossover_l.split(in_l);
        let (low_r, high_r) = self.crossover_r.split(in_r);

        // High band: blend delayed against undelayed; bypasses the combs so
        // room feedback only applies below the crossover.
        let hf = params.high_freq_delay;
        let high_out_l = wet_dry_mix(high_l, self.hf_delay_l.process(high_l), hf);
        let high_out_r = wet_dry_mix(high_r, self.hf_delay_r.process(high_r), hf);

        // Low band: mono into the bank, half the bank per channel.
        let comb_in = mono_sum(low_l, low_r);
        let mut comb_l = 0.0f32;
        let mut comb_r = 0.0f32;
        for comb in &mut self.combs[..4] {
            comb_l += comb.process(comb_in);
        }
        for comb in &mut self.combs[4..] {
            comb_r += comb.process(comb_in);
        }
        comb_l *= STEREO_COMB_GAIN;
        comb_r *= STEREO_COMB_GAIN;

        // Recombine the bands, then diffuse each channel through its own
        // allpass chain.
        let mut wet_l = comb_l + high_out_l;
        let mut wet_r = comb_r + high_out_r;
        for allpass in &mut self.allpass_l {
            wet_l = allpass.process(wet_l);
        }
        for allpass in &mut self.allpass_r {
            wet_r = allpass.process(wet_r);
        }

        let (wet_l, wet_r) = self.detuner.process(wet_l, wet_r, params.detune_amount);

        // Stereo width: pull the wet channels toward each other as width
        // shrinks.
        let spread = 1.0 - params.width;
        let out_wet_l = wet_l + (wet_r - wet_l) * spread;
        let out_wet_r = wet_r + (wet_l - wet_r) * spread;

        (
            params.dry_level * in_l + params.wet_level * out_wet_l,
            params.dry_level * in_r + params.wet_level * out_wet_r,
        )
    }

    #[inline]
    fn tick_mono(&mut self, input: f32, params: &ReverbParams) -> f32 {
        let (low, high) = self.crossover_l.split(input);

        let hf = params.high_freq_delay;
        let high_out = wet_dry_mix(high, self.hf_delay_l.process(high), hf);

        let mut comb_sum = 0.0f32;
        for comb in &mut self.combs {
            comb_sum += comb.process(low);
        }
        comb_sum *= MONO_COMB_GAIN;

        let mut wet = comb_sum + high_out;
        for allpass in &mut self.allpass_l {
            wet = allpass.process(wet);
        }

        params.dry_level * input + params.wet_level * wet
    }
}

/// The reverb engine.
///
/// Lifecycle: a freshly constructed engine is unconfigured and refuses to
/// process; [`set_sample_rate`](Self::set_sample_rate) sizes every delay
/// line and makes it ready. Parameters may be set at any time and take
/// effect from the next processed sample onward.
///
/// Changing the sample rate rebuilds and zeroes all delay lines — a
/// momentary audible discontinuity callers must tolerate.
///
/// # Example
///
/// ```rust
/// use cavern_reverb::{ReverbEngine, ReverbParams};
///
/// let mut engine = ReverbEngine::new();
/// assert!(engine.process_mono(&mut [0.0; 16]).is_err());
///
/// engine.set_sample_rate(44100.0).unwrap();
/// engine.set_params(ReverbParams::default());
/// engine.process_mono(&mut [0.0; 16]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ReverbEngine {
    params: ReverbParams,
    stages: Option<Stages>,
    sample_rate: f32,
}

impl ReverbEngine {
    /// Create an unconfigured engine with default parameters.
    pub fn new() -> Self {
        Self {
            params: ReverbParams::default(),
            stages: None,
            sample_rate: 0.0,
        }
    }

    /// Create an engine already configured for `sample_rate`.
    pub fn with_sample_rate(sample_rate: f32) -> Result<Self, ReverbError> {
        let mut engine = Self::new();
        engine.set_sample_rate(sample_rate)?;
        Ok(engine)
    }

    /// Configure the engine for a sample rate, (re)building all delay
    /// lines. Existing reverb content is dropped.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), ReverbError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ReverbError::InvalidSampleRate);
        }
        self.sample_rate = sample_rate;
        self.stages = Some(Stages::new(sample_rate, &self.params));
        Ok(())
    }

    /// Configured sample rate, if any.
    pub fn sample_rate(&self) -> Option<f32> {
        self.stages.as_ref().map(|_| self.sample_rate)
    }

    /// Replace the parameter set.
    ///
    /// Values are clamped to [0, 1] (NaN becomes 0) and all derived filter
    /// coefficients are recomputed here, synchronously — the processing
    /// path only ever reads finished coefficients.
    pub fn set_params(&mut self, params: ReverbParams) {
        self.params = params.clamped();
        if let Some(stages) = &mut self.stages {
            stages.apply_params(&self.params);
        }
    }

    /// Current parameter set (post-clamping).
    pub fn params(&self) -> ReverbParams {
        self.params
    }

    /// Zero all delay lines and filter state, keeping configuration and
    /// parameters.
    pub fn reset(&mut self) {
        if let Some(stages) = &mut self.stages {
            stages.clear();
        }
    }

    /// Process a mono buffer in place.
    ///
    /// Fails with [`ReverbError::NotConfigured`] if no sample rate has been
    /// set; the buffer is untouched in that case.
    pub fn process_mono(&mut self, buffer: &mut [f32]) -> Result<(), ReverbError> {
        let stages = self.stages.as_mut().ok_or(ReverbError::NotConfigured)?;
        for sample in buffer.iter_mut() {
            *sample = stages.tick_mono(*sample, &self.params);
        }
        Ok(())
    }

    /// Process a stereo buffer pair in place.
    ///
    /// Both slices must have equal length; the error cases are checked
    /// before any sample is modified.
    pub fn process_stereo(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
    ) -> Result<(), ReverbError> {
        let stages = self.stages.as_mut().ok_or(ReverbError::NotConfigured)?;
        if left.len() != right.len() {
            return Err(ReverbError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = stages.tick_stereo(*l, *r, &self.params);
        }
        Ok(())
    }
}

impl Default for ReverbEngine {
    fn default() -> Self {
        Self::new()
    }
}
