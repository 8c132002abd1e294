//! Audio file I/O for the cavern reverb.
//!
//! The engine itself only consumes and produces `f32` sample slices; this
//! crate handles getting those in and out of WAV files:
//!
//! - [`read_wav`] / [`write_wav`] for mono buffers (multi-channel files are
//!   mixed down on read)
//! - [`read_wav_stereo`] / [`write_wav_stereo`] with the [`StereoBuffer`]
//!   container (mono files are duplicated to both channels)
//!
//! 16-bit PCM is the interchange default; 24-bit PCM and 32-bit float are
//! accepted on read and selectable on write.

mod wav;

pub use wav::{
    StereoBuffer, WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, read_wav_stereo,
    write_wav, write_wav_stereo,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested bit depth cannot be written.
    #[error("unsupported bit depth: {0} (expected 16, 24, or 32)")]
    UnsupportedBitDepth(u16),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
