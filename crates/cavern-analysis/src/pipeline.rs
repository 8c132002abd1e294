//! The spectrum pipeline: FIFO, FFT, log remap, smoothing, animation.
//!
//! Samples stream in one at a time; complete windows are frozen into a
//! double buffer, transformed, remapped onto a logarithmic display axis,
//! exponentially smoothed, and finally passed through the spring-mass
//! animator that the renderer reads.
//!
//! Per display tick the pipeline walks this cycle:
//!
//! ```text
//! Accumulating -> FrameReady (FIFO full, snapshot taken)
//!              -> Analyzed   (FFT done, targets updated)
//!              -> Accumulating
//! ```
//!
//! Samples arriving while a frame awaits analysis keep accumulating in the
//! (now empty) FIFO — nothing is dropped, the display just lags by at most
//! one window.

use crate::animator::{SpringConfig, WaveAnimator};
use crate::channel::FrameReceiver;
use crate::fft::FftCore;

/// Visualization style hint for the renderer.
///
/// The pipeline itself only stores this; drawing is the consumer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationMode {
    /// Continuous filled wave.
    #[default]
    Wave,
    /// Discrete bars.
    Bars,
    /// Scattered particles.
    Particles,
}

impl AnimationMode {
    /// Map an arbitrary index onto a mode, wrapping modulo the mode count.
    pub fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Self::Wave,
            1 => Self::Bars,
            _ => Self::Particles,
        }
    }
}

/// Color palette hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Blue to cyan.
    #[default]
    BlueCyan,
    /// Purple to pink.
    PurplePink,
    /// Green to yellow.
    GreenYellow,
}

impl ColorScheme {
    /// Map an arbitrary index onto a scheme, wrapping modulo the count.
    pub fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Self::BlueCyan,
            1 => Self::PurplePink,
            _ => Self::GreenYellow,
        }
    }
}

/// Pipeline construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// FFT order; the window holds `2^order` samples.
    pub fft_order: usize,
    /// Number of display bins.
    pub scope_size: usize,
    /// Per-tick exponential smoothing coefficient toward new targets.
    pub smoothing: f32,
    /// Spring-mass animation tuning.
    pub spring: SpringConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_order: 11, // 2048-sample window
            scope_size: 512,
            smoothing: 0.2,
            spring: SpringConfig::default(),
        }
    }
}

/// Exponent of the logarithmic frequency warp.
///
/// Smaller values push more display bins toward the low end of the
/// spectrum; 0.2 matches the voicing the display was tuned with.
const LOG_SKEW: f32 = 0.2;

/// Streaming spectrum analyzer with display smoothing.
///
/// Feed mono samples with [`push_sample`](Self::push_sample) (or frames
/// from an audio thread via [`update_from`](Self::update_from)), call
/// [`update`](Self::update) once per render tick, and read
/// [`display_bins`](Self::display_bins).
pub struct SpectrumPipeline {
    fft: FftCore,
    window_len: usize,
    scope_size: usize,
    smoothing: f32,

    // Sample FIFO and the frozen analysis frame (double buffer).
    fifo: Vec<f32>,
    fill: usize,
    analysis: Vec<f32>,
    frame_ready: bool,

    // Magnitude scratch and display state.
    magnitudes: Vec<f32>,
    current: Vec<f32>,
    target: Vec<f32>,
    animator: WaveAnimator,

    mode: AnimationMode,
    scheme: ColorScheme,
}

impl SpectrumPipeline {
    /// Create a pipeline from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if `scope_size` is 0 — a zero-bin display has no meaning.
    pub fn new(config: AnalyzerConfig) -> Self {
        assert!(config.scope_size > 0, "scope size must be > 0");
        let fft = FftCore::new(config.fft_order);
        let window_len = fft.size();
        Self {
            window_len,
            scope_size: config.scope_size,
            smoothing: config.smoothing,
            fifo: vec![0.0; window_len],
            fill: 0,
            analysis: vec![0.0; window_len],
            frame_ready: false,
            magnitudes: vec![0.0; window_len / 2],
            current: vec![0.0; config.scope_size],
            target: vec![0.0; config.scope_size],
            animator: WaveAnimator::new(config.scope_size, config.spring),
            mode: AnimationMode::default(),
            scheme: ColorScheme::default(),
            fft,
        }
    }

    /// Create a pipeline with the standard 2048-point / 512-bin setup.
    pub fn with_defaults() -> Self {
        Self::new(AnalyzerConfig::default())
    }

    /// Analysis window length in samples.
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Number of display bins.
    pub fn scope_size(&self) -> usize {
        self.scope_size
    }

    /// Push one mono sample into the FIFO.
    ///
    /// When the FIFO fills, its contents are frozen into the analysis
    /// buffer (unless a frame is already awaiting analysis) and the FIFO
    /// restarts empty, so accumulation continues during analysis.
    #[inline]
    pub fn push_sample(&mut self, sample: f32) {
        if self.fill == self.window_len {
            if !self.frame_ready {
                self.analysis.copy_from_slice(&self.fifo);
                self.frame_ready = true;
            }
            self.fill = 0;
        }
        self.fifo[self.fill] = sample;
        self.fill += 1;
    }

    /// Submit a complete analysis window directly, bypassing the FIFO.
    ///
    /// Used by the threaded handoff; also handy for offline analysis. The
    /// frame must be exactly [`window_len`](Self::window_len) samples.
    pub fn submit_frame(&mut self, frame: &[f32]) {
        debug_assert_eq!(frame.len(), self.window_len, "frame length mismatch");
        if frame.len() != self.window_len {
            return;
        }
        self.analysis.copy_from_slice(frame);
        self.frame_ready = true;
    }

    /// Advance the display by one render tick.
    ///
    /// If an analysis frame is pending it is transformed and remapped into
    /// new display targets first; either way the smoothing and animation
    /// steps run, so the display keeps easing toward its targets between
    /// frames.
    pub fn update(&mut self) {
        if self.frame_ready {
            self.analyze_pending_frame();
            self.frame_ready = false;
        }

        for (current, &target) in self.current.iter_mut().zip(&self.target) {
            *current += self.smoothing * (target - *current);
        }
        self.animator.step(&self.current);
    }

    /// Drain the newest frame (if any) from an audio-thread receiver, then
    /// run a normal [`update`](Self::update) tick.
    pub fn update_from(&mut self, receiver: &FrameReceiver) {
        if let Some(frame) = receiver.latest() {
            self.submit_frame(&frame);
        }
        self.update();
    }

    /// Animated display values, one per display bin, for the renderer.
    pub fn display_bins(&self) -> &[f32] {
        self.animator.positions()
    }

    /// Smoothed (pre-animation) spectrum values.
    pub fn smoothed_spectrum(&self) -> &[f32] {
        &self.current
    }

    /// Approximate center frequency of a display bin, given the rate the
    /// analyzed audio was sampled at.
    pub fn display_bin_frequency(&self, bin: usize, sample_rate: f32) -> f32 {
        let fft_bin = self.map_display_bin(bin);
        fft_bin as f32 * sample_rate / self.window_len as f32
    }

    /// Set the renderer style hint.
    pub fn set_animation_mode(&mut self, mode: AnimationMode) {
        self.mode = mode;
    }

    /// Current renderer style hint.
    pub fn animation_mode(&self) -> AnimationMode {
        self.mode
    }

    /// Set the renderer palette hint.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    /// Current renderer palette hint.
    pub fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Discard all accumulated audio and return the display to rest.
    pub fn reset(&mut self) {
        self.fifo.fill(0.0);
        self.fill = 0;
        self.analysis.fill(0.0);
        self.frame_ready = false;
        self.magnitudes.fill(0.0);
        self.current.fill(0.0);
        self.target.fill(0.0);
        self.animator.reset();
    }

    /// FFT the frozen frame and remap it onto the display axis.
    fn analyze_pending_frame(&mut self) {
        self.fft
            .magnitude_spectrum(&self.analysis, &mut self.magnitudes)
            .expect("analysis buffers are sized at construction");

        for i in 0..self.scope_size {
            let bin = self.map_display_bin(i);
            self.target[i] = self.magnitudes[bin];
        }
    }

    /// Logarithmic frequency warp from display bin to FFT bin.
    ///
    /// `skewed = 1 - exp(ln(1 - i/scope) * LOG_SKEW)` compresses the high
    /// end and spreads the low end across most of the display width.
    fn map_display_bin(&self, bin: usize) -> usize {
        let proportion = bin as f32 / self.scope_size as f32;
        let skewed = 1.0 - ((1.0 - proportion).ln() * LOG_SKEW).exp();
        let index = (skewed * self.window_len as f32 * 0.5) as usize;
        index.min(self.window_len / 2 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    fn feed_tone(pipeline: &mut SpectrumPipeline, freq: f32, samples: usize) {
        for i in 0..samples {
            let phase = std::f32::consts::TAU * freq * i as f32 / SAMPLE_RATE;
            pipeline.push_sample(phase.sin() * 0.8);
        }
    }

    #[test]
    fn tone_raises_its_display_bin() {
        let mut pipeline = SpectrumPipeline::with_defaults();

        // Several windows of a 1 kHz tone with display ticks in between.
        for _ in 0..40 {
            let window_len = pipeline.window_len();
            feed_tone(&mut pipeline, 1000.0, window_len);
            pipeline.update();
        }

        // Locate the display bin whose mapped frequency is closest to 1 kHz.
        let scope = pipeline.scope_size();
        let tone_bin = (0..scope)
            .min_by(|&a, &b| {
                let fa = (pipeline.display_bin_frequency(a, SAMPLE_RATE) - 1000.0).abs();
                let fb = (pipeline.display_bin_frequency(b, SAMPLE_RATE) - 1000.0).abs();
                fa.total_cmp(&fb)
            })
            .unwrap();

        let bins = pipeline.display_bins();
        let peak = bins[tone_bin.saturating_sub(2)..(tone_bin + 3).min(scope)]
            .iter()
            .fold(0.0f32, |a, &b| a.max(b));

        // Compare against bins well away from the tone.
        let far = bins[scope - 50..]
            .iter()
            .fold(0.0f32, |a, &b| a.max(b));
        assert!(
            peak > far * 5.0 && peak > 1e-4,
            "tone bin {tone_bin} should stand out: peak={peak}, far={far}"
        );
    }

    #[test]
    fn fifo_snapshots_once_per_window() {
        let mut pipeline = SpectrumPipeline::new(AnalyzerConfig {
            fft_order: 8, // small window keeps the test quick
            scope_size: 64,
            ..AnalyzerConfig::default()
        });
        let window = pipeline.window_len();

        // Fill exactly one window: frame becomes ready on the next push.
        for _ in 0..window {
            pipeline.push_sample(1.0);
        }
        assert!(!pipeline.frame_ready, "snapshot happens lazily on overflow");
        pipeline.push_sample(1.0);
        assert!(pipeline.frame_ready);

        // A pending frame is not overwritten by further accumulation.
        let before = pipeline.analysis.clone();
        for _ in 0..window {
            pipeline.push_sample(-1.0);
        }
        assert_eq!(pipeline.analysis, before, "pending frame must stay frozen");

        // After analysis the next full window can snapshot again.
        pipeline.update();
        assert!(!pipeline.frame_ready);
        for _ in 0..window + 1 {
            pipeline.push_sample(-1.0);
        }
        assert!(pipeline.frame_ready);
    }

    #[test]
    fn update_without_frames_still_eases_display() {
        let mut pipeline = SpectrumPipeline::with_defaults();
        let window_len = pipeline.window_len() + 1;
        feed_tone(&mut pipeline, 500.0, window_len);
        pipeline.update();

        // Ticks with no new audio keep moving the animation toward the
        // last targets.
        let first: Vec<f32> = pipeline.display_bins().to_vec();
        for _ in 0..30 {
            pipeline.update();
        }
        let later = pipeline.display_bins();
        let moved = first
            .iter()
            .zip(later)
            .any(|(a, b)| (a - b).abs() > 1e-6);
        assert!(moved, "display should ease between frames");
    }

    #[test]
    fn log_mapping_is_monotonic_and_low_heavy() {
        let pipeline = SpectrumPipeline::with_defaults();
        let scope = pipeline.scope_size();

        let mut previous = 0;
        for i in 0..scope {
            let mapped = pipeline.map_display_bin(i);
            assert!(mapped >= previous, "mapping must be monotonic");
            assert!(mapped < pipeline.window_len() / 2);
            previous = mapped;
        }

        // The lower half of the display covers far fewer FFT bins than the
        // upper half: low frequencies get the resolution.
        let mid = pipeline.map_display_bin(scope / 2);
        assert!(
            mid < pipeline.window_len() / 8,
            "half the display should cover a small slice of the spectrum, got bin {mid}"
        );
    }

    #[test]
    fn mode_and_scheme_round_trip() {
        let mut pipeline = SpectrumPipeline::with_defaults();
        assert_eq!(pipeline.animation_mode(), AnimationMode::Wave);

        pipeline.set_animation_mode(AnimationMode::from_index(1));
        assert_eq!(pipeline.animation_mode(), AnimationMode::Bars);
        pipeline.set_animation_mode(AnimationMode::from_index(5));
        assert_eq!(pipeline.animation_mode(), AnimationMode::Particles);

        pipeline.set_color_scheme(ColorScheme::from_index(4));
        assert_eq!(pipeline.color_scheme(), ColorScheme::PurplePink);
    }

    #[test]
    fn reset_silences_the_display() {
        let mut pipeline = SpectrumPipeline::with_defaults();
        let window_len = pipeline.window_len() * 3;
        feed_tone(&mut pipeline, 2000.0, window_len);
        for _ in 0..10 {
            pipeline.update();
        }
        pipeline.reset();
        assert!(pipeline.display_bins().iter().all(|&b| b == 0.0));
        // And ticking after reset stays silent with no input.
        for _ in 0..10 {
            pipeline.update();
        }
        assert!(pipeline.display_bins().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn silence_produces_a_flat_display() {
        let mut pipeline = SpectrumPipeline::with_defaults();
        for _ in 0..pipeline.window_len() * 2 {
            pipeline.push_sample(0.0);
        }
        for _ in 0..20 {
            pipeline.update();
        }
        assert!(
            pipeline.display_bins().iter().all(|&b| b.abs() < 1e-6),
            "silence should display as silence"
        );
    }
}
