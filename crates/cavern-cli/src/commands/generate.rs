//! Test signal generation command.

use cavern_io::{StereoBuffer, WavSpec, write_wav, write_wav_stereo};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Sine {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "3.0")]
        duration: f32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,

        /// Sample rate
        #[arg(long, default_value = "44100")]
        sample_rate: u32,

        /// Write a stereo file (same signal on both channels)
        #[arg(long)]
        stereo: bool,
    },

    /// Generate a single-sample impulse followed by silence
    Impulse {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Length in samples
        #[arg(long, default_value = "44100")]
        length: usize,

        /// Sample rate
        #[arg(long, default_value = "44100")]
        sample_rate: u32,

        /// Write a stereo file
        #[arg(long)]
        stereo: bool,
    },
}

fn sine_wave(freq: f32, duration: f32, amplitude: f32, sample_rate: u32) -> Vec<f32> {
    let total = (duration * sample_rate as f32) as usize;
    (0..total)
        .map(|i| {
            let phase = std::f32::consts::TAU * freq * i as f32 / sample_rate as f32;
            phase.sin() * amplitude
        })
        .collect()
}

fn write(output: &Path, samples: Vec<f32>, sample_rate: u32, stereo: bool) -> anyhow::Result<()> {
    let spec = WavSpec {
        sample_rate,
        ..WavSpec::default()
    };
    let frames = samples.len();
    if stereo {
        write_wav_stereo(output, &StereoBuffer::from_mono(samples), spec)?;
    } else {
        write_wav(output, &samples, spec)?;
    }
    println!("Wrote {} ({frames} frames)", output.display());
    Ok(())
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Sine {
            output,
            freq,
            duration,
            amplitude,
            sample_rate,
            stereo,
        } => {
            anyhow::ensure!(freq > 0.0, "frequency must be positive");
            anyhow::ensure!(duration > 0.0, "duration must be positive");
            let samples = sine_wave(freq, duration, amplitude.clamp(0.0, 1.0), sample_rate);
            write(&output, samples, sample_rate, stereo)
        }
        GenerateCommand::Impulse {
            output,
            length,
            sample_rate,
            stereo,
        } => {
            anyhow::ensure!(length > 0, "length must be positive");
            let mut samples = vec![0.0f32; length];
            samples[0] = 1.0;
            write(&output, samples, sample_rate, stereo)
        }
    }
}
