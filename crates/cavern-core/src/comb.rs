//! Feedback comb filter with damping and freeze.
//!
//! The comb bank is what gives the reverb its decaying reflection train.
//! Each comb recirculates a delayed copy of its output through a one-pole
//! lowpass (high frequencies die faster, as in real rooms) and back into
//! the delay line together with the input.

use crate::DelayLine;
use crate::flush_denormal;

/// Feedback comb filter with in-loop damping and a freeze control.
///
/// Normal operation writes `input + damped_feedback * feedback` into the
/// delay line each sample. Engaging freeze mutes the input injection,
/// raises the effective loop gain to unity and disables damping, so
/// whatever the tank holds recirculates indefinitely instead of decaying.
///
/// # Example
///
/// ```rust
/// use cavern_core::DampedComb;
///
/// let mut comb = DampedComb::new(1000);
/// comb.set_feedback(0.7);
/// comb.set_damp(0.3);
///
/// let output = comb.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DampedComb {
    delay: DelayLine,
    filter_store: f32,
    feedback: f32,
    damp: f32,
    freeze: f32,
    // Cached per-sample coefficients, refreshed whenever a control changes.
    input_gain: f32,
    loop_gain: f32,
    damp_a: f32,
    damp_b: f32,
}

impl DampedComb {
    /// Create a comb filter with the given delay length in samples.
    pub fn new(delay_samples: usize) -> Self {
        let mut comb = Self {
            delay: DelayLine::new(delay_samples),
            filter_store: 0.0,
            feedback: 0.5,
            damp: 0.5,
            freeze: 0.0,
            input_gain: 1.0,
            loop_gain: 0.5,
            damp_a: 0.5,
            damp_b: 0.5,
        };
        comb.refresh_coefficients();
        comb
    }

    /// Set the feedback amount (clamped to 0.0..=0.98).
    ///
    /// Higher values produce longer decay; the ceiling keeps the loop
    /// strictly stable outside of freeze.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.98);
        self.refresh_coefficients();
    }

    /// Get the current feedback value.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the damping amount (0.0 = bright, 1.0 = dark).
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
        self.refresh_coefficients();
    }

    /// Get the current damping value.
    #[inline]
    pub fn damp(&self) -> f32 {
        self.damp
    }

    /// Set the freeze amount (0.0 = normal decay, 1.0 = infinite sustain).
    ///
    /// At full freeze the input is muted, the loop gain becomes unity and
    /// damping is lifted, so stored content neither grows nor decays.
    /// Intermediate values interpolate between the two regimes.
    #[inline]
    pub fn set_freeze(&mut self, freeze: f32) {
        self.freeze = freeze.clamp(0.0, 1.0);
        self.refresh_coefficients();
    }

    /// Get the current freeze value.
    #[inline]
    pub fn freeze(&self) -> f32 {
        self.freeze
    }

    /// Process a single sample; returns the delayed (wet) output.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.delay.read(self.delay.capacity() - 1);

        // One-pole lowpass in the feedback path.
        self.filter_store = flush_denormal(output * self.damp_b + self.filter_store * self.damp_a);

        self.delay
            .write(input * self.input_gain + self.filter_store * self.loop_gain);

        output
    }

    /// Clear all internal state.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.filter_store = 0.0;
    }

    /// Delay length in samples.
    pub fn capacity(&self) -> usize {
        self.delay.capacity()
    }

    fn refresh_coefficients(&mut self) {
        self.input_gain = 1.0 - self.freeze;
        self.loop_gain = self.feedback + (1.0 - self.feedback) * self.freeze;
        self.damp_a = self.damp * (1.0 - self.freeze);
        self.damp_b = 1.0 - self.damp_a;
    }
}
