//! Short-delay stereo detuner.
//!
//! Despite the "harmonic" framing this effect inherits, it performs no
//! spectral analysis and no true pitch shift. Each channel is blended with
//! a copy of itself read from a short circular buffer at a small integer
//! offset; the offsets differ between channels, so the comb-like phase
//! pattern each channel picks up is different. The result is inter-channel
//! decorrelation, heard as added stereo width, while the mono sum stays
//! well-behaved.

use cavern_core::{DelayLine, wet_dry_mix};

/// Length of each channel's detune buffer in samples.
///
/// Short enough that the offset reads stay in the sub-millisecond range
/// where decorrelation is heard as width rather than as an echo.
pub const DETUNE_BUFFER_LEN: usize = 50;

/// Dual-buffer stereo decorrelator.
///
/// The left channel reads at an offset of `1 + floor(amount * 10)` slots
/// ahead of the write cursor, the right at `1 + floor(amount * 8)`; the
/// mismatch between the two mappings is what decorrelates the channels.
/// The offset-read sample is mixed against the dry input with a wet share
/// of `amount * 0.5`, so the effect fades in continuously from silence at
/// zero amount to an equal blend at full amount.
///
/// Both buffers are written on every call regardless of amount, so turning
/// the effect up mid-stream reads real history instead of stale zeros.
#[derive(Debug, Clone)]
pub struct HarmonicDetuner {
    left: DelayLine,
    right: DelayLine,
}

impl HarmonicDetuner {
    /// Create a detuner with zeroed buffers.
    pub fn new() -> Self {
        Self {
            left: DelayLine::new(DETUNE_BUFFER_LEN),
            right: DelayLine::new(DETUNE_BUFFER_LEN),
        }
    }

    /// Process one stereo sample pair at the given amount (0.0..=1.0).
    #[inline]
    pub fn process(&mut self, left: f32, right: f32, amount: f32) -> (f32, f32) {
        let amount = amount.clamp(0.0, 1.0);

        let offset_l = (1 + (amount * 10.0) as usize).min(DETUNE_BUFFER_LEN - 1);
        let offset_r = (1 + (amount * 8.0) as usize).min(DETUNE_BUFFER_LEN - 1);

        // Peek before writing so the offset read never lands on the sample
        // being written this call.
        let detuned_l = self.left.offset_peek(offset_l);
        let detuned_r = self.right.offset_peek(offset_r);
        self.left.write(left);
        self.right.write(right);

        let wet = amount * 0.5;
        (
            wet_dry_mix(left, detuned_l, wet),
            wet_dry_mix(right, detuned_r, wet),
        )
    }

    /// Zero both buffers.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

impl Default for HarmonicDetuner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_is_identity() {
        let mut detuner = HarmonicDetuner::new();
        for i in 0..200 {
            let l = libm::sinf(i as f32 * 0.1);
            let r = libm::cosf(i as f32 * 0.1);
            let (out_l, out_r) = detuner.process(l, r, 0.0);
            assert_eq!(out_l, l);
            assert_eq!(out_r, r);
        }
    }

    #[test]
    fn output_stays_finite_and_bounded() {
        let mut detuner = HarmonicDetuner::new();
        for i in 0..2000 {
            let x = libm::sinf(i as f32 * 0.37);
            let (l, r) = detuner.process(x, x, 1.0);
            assert!(l.is_finite() && r.is_finite());
            assert!(l.abs() <= 1.0 && r.abs() <= 1.0);
        }
    }

    #[test]
    fn full_amount_decorrelates_identical_channels() {
        // Feed the same signal to both channels; asymmetric offsets should
        // break the left/right identity.
        let mut detuner = HarmonicDetuner::new();
        let mut diverged = false;
        for i in 0..500 {
            let x = libm::sinf(i as f32 * 0.21) * 0.8;
            let (l, r) = detuner.process(x, x, 1.0);
            if (l - r).abs() > 1e-3 {
                diverged = true;
            }
        }
        assert!(diverged, "channels should decorrelate at full amount");
    }

    #[test]
    fn amount_ramps_effect_continuously() {
        // Wet energy difference against the dry signal grows with amount.
        let divergence = |amount: f32| -> f32 {
            let mut detuner = HarmonicDetuner::new();
            let mut acc = 0.0f32;
            for i in 0..1000 {
                let x = libm::sinf(i as f32 * 0.37) * 0.5;
                let (l, _) = detuner.process(x, x, amount);
                acc += (l - x).abs();
            }
            acc
        };
        let low = divergence(0.1);
        let high = divergence(0.9);
        assert!(low > 0.0, "small amounts should already alter the signal");
        assert!(high > low, "effect should grow with amount: {low} vs {high}");
    }

    #[test]
    fn buffers_written_even_at_zero_amount() {
        let mut detuner = HarmonicDetuner::new();
        // Run dry for a full buffer length...
        for i in 0..DETUNE_BUFFER_LEN {
            let x = (i + 1) as f32 / DETUNE_BUFFER_LEN as f32;
            detuner.process(x, x, 0.0);
        }
        // ...then engage: the offset read must see the earlier signal, not
        // zeros.
        let (l, _) = detuner.process(0.0, 0.0, 1.0);
        assert!(l.abs() > 0.0, "history should be available on engage");
    }

    #[test]
    fn reset_clears_history() {
        let mut detuner = HarmonicDetuner::new();
        for _ in 0..100 {
            detuner.process(1.0, 1.0, 1.0);
        }
        detuner.reset();
        let (l, r) = detuner.process(0.0, 0.0, 1.0);
        assert_eq!(l, 0.0);
        assert_eq!(r, 0.0);
    }
}
