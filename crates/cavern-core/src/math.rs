//! Math helpers shared across the DSP path.
//!
//! Allocation-free, `no_std`-friendly utility functions. Everything here is
//! a single expression or close to it; the value is having one canonical
//! definition per operation instead of scattered inline copies.

use libm::{expf, logf};

/// Flush denormal values to zero.
///
/// IEEE 754 subnormals (below ~1.2e-38 for f32) cause severe CPU penalties
/// on most architectures. Feedback paths decay through that range, so every
/// recirculating write is passed through this guard. The threshold is well
/// above the subnormal range; anything that small is silence.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Average a stereo pair down to mono.
#[inline]
pub fn mono_sum(left: f32, right: f32) -> f32 {
    (left + right) * 0.5
}

/// Linear crossfade between a dry and wet sample.
///
/// `mix` = 0.0 returns `dry`, 1.0 returns `wet`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

/// Applies [`wet_dry_mix`] independently to left and right channels.
#[inline]
pub fn wet_dry_mix_stereo(dry_l: f32, dry_r: f32, wet_l: f32, wet_r: f32, mix: f32) -> (f32, f32) {
    (
        wet_dry_mix(dry_l, wet_l, mix),
        wet_dry_mix(dry_r, wet_r, mix),
    )
}

/// Convert decibels to linear gain.
///
/// 0 dB → 1.0, -6 dB → ~0.5, +6 dB → ~2.0.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// The input is floored at 1e-10 so silence maps to -200 dB instead of
/// negative infinity.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_denormal_zeroes_tiny_values() {
        assert_eq!(flush_denormal(1e-30), 0.0);
        assert_eq!(flush_denormal(-1e-30), 0.0);
        assert_eq!(flush_denormal(1e-10), 1e-10);
        assert_eq!(flush_denormal(0.5), 0.5);
    }

    #[test]
    fn mono_sum_averages() {
        assert_eq!(mono_sum(1.0, 0.0), 0.5);
        assert_eq!(mono_sum(-1.0, 1.0), 0.0);
    }

    #[test]
    fn wet_dry_endpoints() {
        assert_eq!(wet_dry_mix(1.0, 0.5, 0.0), 1.0);
        assert_eq!(wet_dry_mix(1.0, 0.5, 1.0), 0.5);
        assert_eq!(wet_dry_mix(0.0, 1.0, 0.25), 0.25);
    }

    #[test]
    fn db_round_trip() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 1e-3);
        assert!((linear_to_db(2.0) - 6.0206).abs() < 1e-3);
        for db in [-40.0f32, -12.0, 0.0, 12.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "round trip {db} -> {back}");
        }
    }
}
