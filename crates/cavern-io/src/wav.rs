//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;
use tracing::debug;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len());
    let num_frames = total_samples / u64::from(spec.channels);
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24, or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        // 16-bit PCM at 44.1 kHz is the interchange format.
        Self {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Owned stereo sample pair with equal-length channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoBuffer {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoBuffer {
    /// Create from two equal-length channel buffers.
    ///
    /// # Panics
    ///
    /// Panics if the channels differ in length.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        assert_eq!(
            left.len(),
            right.len(),
            "stereo channels must have equal length"
        );
        Self { left, right }
    }

    /// Duplicate a mono buffer onto both channels.
    pub fn from_mono(samples: Vec<f32>) -> Self {
        Self {
            right: samples.clone(),
            left: samples,
        }
    }

    /// Deinterleave an LRLR... buffer.
    pub fn from_interleaved(samples: &[f32]) -> Self {
        let frames = samples.len() / 2;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for frame in samples.chunks_exact(2) {
            left.push(frame[0]);
            right.push(frame[1]);
        }
        Self { left, right }
    }

    /// Interleave to an LRLR... buffer.
    pub fn interleave(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.left.len() * 2);
        for (&l, &r) in self.left.iter().zip(&self.right) {
            out.push(l);
            out.push(r);
        }
        out
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

fn decode_samples(reader: WavReader<std::io::BufReader<std::fs::File>>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

/// Read a WAV file and return mono samples as f32 along with the spec.
///
/// Multi-channel files are mixed down to mono by averaging channels.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(&path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;
    let samples = decode_samples(reader)?;

    debug!(
        path = %path.as_ref().display(),
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "read wav"
    );

    let mono_samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono_samples, spec))
}

/// Read a WAV file and return stereo samples along with the spec.
///
/// Mono files are expanded to stereo by duplication. Files with more than
/// two channels use only the first two.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoBuffer, WavSpec)> {
    let reader = WavReader::open(&path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;
    let all_samples = decode_samples(reader)?;

    debug!(
        path = %path.as_ref().display(),
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "read wav (stereo)"
    );

    let stereo = match channels {
        0 => StereoBuffer::default(),
        1 => StereoBuffer::from_mono(all_samples),
        2 => StereoBuffer::from_interleaved(&all_samples),
        _ => {
            let frames = all_samples.len() / channels;
            let mut left = Vec::with_capacity(frames);
            let mut right = Vec::with_capacity(frames);
            for frame in all_samples.chunks_exact(channels) {
                left.push(frame[0]);
                right.push(frame[1]);
            }
            StereoBuffer::new(left, right)
        }
    };

    Ok((stereo, spec))
}

fn write_samples<W>(writer: &mut WavWriter<W>, samples: &[f32], bits: u16) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    match bits {
        32 => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        16 | 24 => {
            let max_val = (1i64 << (bits - 1)) as f32;
            for &sample in samples {
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
        other => return Err(Error::UnsupportedBitDepth(other)),
    }
    Ok(())
}

/// Write mono samples to a WAV file.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        ..spec
    };
    debug!(
        path = %path.as_ref().display(),
        samples = samples.len(),
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "write wav"
    );
    let mut writer = WavWriter::create(path, spec.into())?;
    write_samples(&mut writer, samples, spec.bits_per_sample)?;
    writer.finalize()?;
    Ok(())
}

/// Write a stereo buffer to a WAV file.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoBuffer,
    spec: WavSpec,
) -> Result<()> {
    let spec = WavSpec {
        channels: 2,
        ..spec
    };
    debug!(
        path = %path.as_ref().display(),
        frames = samples.len(),
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "write wav (stereo)"
    );
    let mut writer = WavWriter::create(path, spec.into())?;
    write_samples(&mut writer, &samples.interleave(), spec.bits_per_sample)?;
    writer.finalize()?;
    Ok(())
}
