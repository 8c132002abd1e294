//! One-pole crossover splitter for frequency-dependent processing.
//!
//! Splits a signal into a low band (one-pole lowpass output) and a high
//! band defined as the exact residual, so the two bands always sum back to
//! the input. The reverb engine keeps one instance per channel; sharing an
//! instance across channels would leak filter state between them.

use crate::flush_denormal;
use libm::{expf, logf};

/// Lower end of the crossover range, reached at `crossover = 0.0`.
pub const MIN_CROSSOVER_HZ: f32 = 500.0;

/// Upper end of the crossover range, reached at `crossover = 1.0`.
pub const MAX_CROSSOVER_HZ: f32 = 8000.0;

/// One-pole low/high band splitter.
///
/// The lowpass is the classic one-pole smoother
/// `low = state + alpha * (input - state)` with
/// `alpha = 1 - exp(-2*pi*fc/Fs)`; the high band is `input - low`.
/// The normalized crossover control maps exponentially over
/// [`MIN_CROSSOVER_HZ`]..[`MAX_CROSSOVER_HZ`] so equal control increments
/// correspond to equal pitch intervals.
///
/// # Example
///
/// ```rust
/// use cavern_core::CrossoverSplitter;
///
/// let mut splitter = CrossoverSplitter::new(48000.0, 0.5);
/// let (low, high) = splitter.split(1.0);
/// assert!((low + high - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct CrossoverSplitter {
    state: f32,
    alpha: f32,
    sample_rate: f32,
    crossover: f32,
}

impl CrossoverSplitter {
    /// Create a splitter at the given sample rate and normalized crossover.
    pub fn new(sample_rate: f32, crossover: f32) -> Self {
        let mut splitter = Self {
            state: 0.0,
            alpha: 0.0,
            sample_rate,
            crossover: crossover.clamp(0.0, 1.0),
        };
        splitter.recalculate_alpha();
        splitter
    }

    /// Set the normalized crossover position (0.0 to 1.0).
    pub fn set_crossover(&mut self, crossover: f32) {
        self.crossover = crossover.clamp(0.0, 1.0);
        self.recalculate_alpha();
    }

    /// Update the sample rate and recalculate the filter coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_alpha();
    }

    /// Current crossover frequency in Hz.
    pub fn cutoff_hz(&self) -> f32 {
        let ratio = MAX_CROSSOVER_HZ / MIN_CROSSOVER_HZ;
        MIN_CROSSOVER_HZ * expf(self.crossover * logf(ratio))
    }

    /// Split one sample into (low, high) bands.
    ///
    /// `high` is the exact residual `input - low`, so recombining the bands
    /// reconstructs the input to within one float rounding step.
    #[inline]
    pub fn split(&mut self, input: f32) -> (f32, f32) {
        let low = self.state + self.alpha * (input - self.state);
        self.state = flush_denormal(low);
        (low, input - low)
    }

    /// Reset the filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    fn recalculate_alpha(&mut self) {
        self.alpha = 1.0 - expf(-core::f32::consts::TAU * self.cutoff_hz() / self.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_sum_to_input() {
        let mut splitter = CrossoverSplitter::new(48000.0, 0.5);
        for i in 0..2000 {
            let input = libm::sinf(i as f32 * 0.13) * 0.8;
            let (low, high) = splitter.split(input);
            assert!(
                (low + high - input).abs() < 1e-6,
                "reconstruction off at sample {i}: {} vs {input}",
                low + high
            );
        }
    }

    #[test]
    fn impulse_reconstructs_exactly() {
        // From zero state the residual subtraction is exact for an impulse.
        let mut splitter = CrossoverSplitter::new(44100.0, 0.5);
        let (low, high) = splitter.split(1.0);
        assert_eq!(low + high, 1.0);
    }

    #[test]
    fn cutoff_map_endpoints() {
        let low_end = CrossoverSplitter::new(48000.0, 0.0);
        let high_end = CrossoverSplitter::new(48000.0, 1.0);
        assert!((low_end.cutoff_hz() - MIN_CROSSOVER_HZ).abs() < 1.0);
        assert!((high_end.cutoff_hz() - MAX_CROSSOVER_HZ).abs() < 10.0);

        let mid = CrossoverSplitter::new(48000.0, 0.5);
        // Exponential map: midpoint is the geometric mean, 2 kHz.
        assert!((mid.cutoff_hz() - 2000.0).abs() < 20.0);
    }

    #[test]
    fn dc_lands_in_low_band() {
        let mut splitter = CrossoverSplitter::new(48000.0, 0.5);
        let mut low = 0.0;
        let mut high = 0.0;
        for _ in 0..48000 {
            (low, high) = splitter.split(1.0);
        }
        assert!((low - 1.0).abs() < 1e-3, "DC should settle in low band, got {low}");
        assert!(high.abs() < 1e-3, "high band should reject DC, got {high}");
    }

    #[test]
    fn nyquist_lands_in_high_band() {
        let mut splitter = CrossoverSplitter::new(48000.0, 0.0);
        let mut low_energy = 0.0f32;
        let mut high_energy = 0.0f32;
        for i in 0..4800 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            let (low, high) = splitter.split(input);
            low_energy += low * low;
            high_energy += high * high;
        }
        assert!(
            high_energy > low_energy * 10.0,
            "alternating signal should be mostly high band: low={low_energy}, high={high_energy}"
        );
    }

    #[test]
    fn reset_clears_state() {
        let mut splitter = CrossoverSplitter::new(48000.0, 0.5);
        splitter.split(1.0);
        splitter.split(1.0);
        splitter.reset();
        let (low, _) = splitter.split(0.0);
        assert_eq!(low, 0.0);
    }

    #[test]
    fn clamps_out_of_range_control() {
        let mut splitter = CrossoverSplitter::new(48000.0, 7.0);
        assert!((splitter.cutoff_hz() - MAX_CROSSOVER_HZ).abs() < 10.0);
        splitter.set_crossover(-3.0);
        assert!((splitter.cutoff_hz() - MIN_CROSSOVER_HZ).abs() < 1.0);
    }
}
