//! Fixed-order radix-2 FFT with a windowed magnitude front end.
//!
//! The display pipeline needs one transform size for the life of the
//! analyzer, so this core precomputes its twiddle factors once at
//! construction and runs the classic in-place decimation-in-time
//! Cooley-Tukey schedule: bit-reversal permutation, then `order` butterfly
//! stages. `rustfft` supplies the `Complex` type (and serves as the
//! reference implementation in the test suite); the transform itself is
//! this code.

use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Errors from the FFT front end.
///
/// All of these are caller-contract violations; none can occur once inputs
/// are sized to the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FftError {
    /// The complex buffer length does not match the transform size.
    #[error("buffer length {got} does not match transform size {expected}")]
    BufferSize {
        /// Required length.
        expected: usize,
        /// Provided length.
        got: usize,
    },
    /// More input samples than the transform can hold.
    #[error("input of {got} samples exceeds transform size {size}")]
    TooManySamples {
        /// Transform size.
        size: usize,
        /// Provided sample count.
        got: usize,
    },
    /// Fewer than two input samples.
    ///
    /// The Hann window normalizes by `num_samples - 1`, so a one-sample
    /// input would divide by zero; it is rejected here instead.
    #[error("windowed analysis needs at least 2 samples, got {got}")]
    TooFewSamples {
        /// Provided sample count.
        got: usize,
    },
    /// Magnitude output buffer smaller than `size / 2`.
    #[error("magnitude output needs {expected} bins, got {got}")]
    OutputSize {
        /// Required length.
        expected: usize,
        /// Provided length.
        got: usize,
    },
}

/// Radix-2 decimation-in-time FFT of a fixed power-of-two size.
///
/// The twiddle table `e^{-2*pi*i*k/size}` is computed once at construction
/// and shared read-only by every transform.
///
/// # Example
///
/// ```rust
/// use cavern_analysis::FftCore;
/// use rustfft::num_complex::Complex;
///
/// let fft = FftCore::new(8); // 256-point
/// let mut buffer = vec![Complex::new(0.0f32, 0.0); 256];
/// buffer[0] = Complex::new(1.0, 0.0);
/// fft.perform(&mut buffer).unwrap();
/// // An impulse transforms to a flat spectrum.
/// assert!((buffer[17].norm() - 1.0).abs() < 1e-5);
/// ```
pub struct FftCore {
    order: usize,
    size: usize,
    twiddles: Vec<Complex<f32>>,
    window: Vec<f32>,
}

impl FftCore {
    /// Create a transform of size `2^order`.
    ///
    /// # Panics
    ///
    /// Panics if `order` is 0 or large enough that `2^order` overflows
    /// `usize` — both are configuration mistakes, not runtime conditions.
    pub fn new(order: usize) -> Self {
        assert!(order >= 1, "FFT order must be at least 1");
        assert!(order < usize::BITS as usize, "FFT order too large");
        let size = 1usize << order;

        // Twiddles in f64 then narrowed, so table accuracy is not limited
        // by f32 argument reduction for large sizes.
        let twiddles = (0..size / 2)
            .map(|k| {
                let angle = -2.0 * PI * k as f64 / size as f64;
                Complex::new(angle.cos() as f32, angle.sin() as f32)
            })
            .collect();

        Self {
            order,
            size,
            twiddles,
            window: Vec::new(),
        }
    }

    /// Transform size (`2^order`).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform order (log2 of the size).
    pub fn order(&self) -> usize {
        self.order
    }

    /// In-place FFT over exactly [`size`](Self::size) complex values.
    pub fn perform(&self, data: &mut [Complex<f32>]) -> Result<(), FftError> {
        if data.len() != self.size {
            return Err(FftError::BufferSize {
                expected: self.size,
                got: data.len(),
            });
        }

        // Bit-reversal permutation.
        let mut j = 0usize;
        for i in 0..self.size - 1 {
            if i < j {
                data.swap(i, j);
            }
            let mut m = self.size / 2;
            while m <= j && m > 0 {
                j -= m;
                m /= 2;
            }
            j += m;
        }

        // Butterfly stages.
        for stage in 1..=self.order {
            let m = 1usize << stage;
            let half = m / 2;
            let step = self.size / m;

            for block in (0..self.size).step_by(m) {
                for k in 0..half {
                    let t = self.twiddles[k * step] * data[block + k + half];
                    let u = data[block + k];
                    data[block + k] = u + t;
                    data[block + k + half] = u - t;
                }
            }
        }

        Ok(())
    }

    /// Hann-windowed magnitude spectrum of a real input.
    ///
    /// Windows the input, zero-pads to the transform size, transforms, and
    /// writes `|X[k]| / (size/2)` into the first `size/2` slots of
    /// `output`. Requires `2 <= input.len() <= size` and
    /// `output.len() >= size / 2`.
    pub fn magnitude_spectrum(
        &mut self,
        input: &[f32],
        output: &mut [f32],
    ) -> Result<(), FftError> {
        let num_samples = input.len();
        if num_samples < 2 {
            return Err(FftError::TooFewSamples { got: num_samples });
        }
        if num_samples > self.size {
            return Err(FftError::TooManySamples {
                size: self.size,
                got: num_samples,
            });
        }
        let half = self.size / 2;
        if output.len() < half {
            return Err(FftError::OutputSize {
                expected: half,
                got: output.len(),
            });
        }

        self.refresh_window(num_samples);
        let mut data: Vec<Complex<f32>> = Vec::with_capacity(self.size);
        data.extend(
            input
                .iter()
                .zip(&self.window)
                .map(|(&x, &w)| Complex::new(x * w, 0.0)),
        );
        data.resize(self.size, Complex::new(0.0, 0.0));

        self.perform(&mut data)?;

        let scale = 1.0 / half as f32;
        for (out, value) in output[..half].iter_mut().zip(&data) {
            *out = value.norm() * scale;
        }
        Ok(())
    }

    /// Rebuild the cached Hann window if the input length changed.
    fn refresh_window(&mut self, num_samples: usize) {
        if self.window.len() == num_samples {
            return;
        }
        let denom = (num_samples - 1) as f32;
        self.window = (0..num_samples)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();
    }
}
