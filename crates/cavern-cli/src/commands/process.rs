//! File-based reverb processing command.

use super::{peak, rms};
use crate::preset::Preset;
use cavern_core::linear_to_db;
use cavern_reverb::{ReverbEngine, ReverbParams};
use cavern_io::{WavSpec, read_wav, read_wav_info, read_wav_stereo, write_wav, write_wav_stereo};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset file (TOML); flags below override preset values
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Room size (0-1)
    #[arg(long)]
    room_size: Option<f32>,

    /// High-frequency damping (0-1)
    #[arg(long)]
    damping: Option<f32>,

    /// Wet level (0-1)
    #[arg(long)]
    wet: Option<f32>,

    /// Dry level (0-1)
    #[arg(long)]
    dry: Option<f32>,

    /// Stereo width (0-1)
    #[arg(long)]
    width: Option<f32>,

    /// Freeze mode (0-1)
    #[arg(long)]
    freeze: Option<f32>,

    /// High-frequency delay amount (0-1)
    #[arg(long)]
    hf_delay: Option<f32>,

    /// Crossover position (0-1, 500 Hz - 8 kHz)
    #[arg(long)]
    crossover: Option<f32>,

    /// Stereo detune amount (0-1)
    #[arg(long)]
    detune: Option<f32>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "16")]
    bit_depth: u16,
}

impl ProcessArgs {
    /// Resolve preset file and flag overrides into a parameter set.
    fn resolve_params(&self) -> anyhow::Result<ReverbParams> {
        let mut params = if let Some(preset_path) = &self.preset {
            let text = std::fs::read_to_string(preset_path)?;
            let preset = Preset::from_toml(&text)?;
            println!("Loading preset: {}", preset.name);
            preset.to_params()
        } else {
            ReverbParams::default()
        };

        if let Some(v) = self.room_size {
            params.room_size = v;
        }
        if let Some(v) = self.damping {
            params.damping = v;
        }
        if let Some(v) = self.wet {
            params.wet_level = v;
        }
        if let Some(v) = self.dry {
            params.dry_level = v;
        }
        if let Some(v) = self.width {
            params.width = v;
        }
        if let Some(v) = self.freeze {
            params.freeze = v;
        }
        if let Some(v) = self.hf_delay {
            params.high_freq_delay = v;
        }
        if let Some(v) = self.crossover {
            params.crossover = v;
        }
        if let Some(v) = self.detune {
            params.detune_amount = v;
        }
        Ok(params)
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );
    pb
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.input)?;
    let sample_rate = info.sample_rate as f32;

    println!(
        "Reading {} ({} ch, {} Hz, {:.2}s)...",
        args.input.display(),
        info.channels,
        info.sample_rate,
        info.duration_secs
    );

    let params = args.resolve_params()?;
    tracing::debug!(?params, sample_rate, "configuring engine");
    let mut engine = ReverbEngine::with_sample_rate(sample_rate)?;
    engine.set_params(params);

    let out_spec = WavSpec {
        channels: info.channels.min(2),
        sample_rate: info.sample_rate,
        bits_per_sample: args.bit_depth,
    };

    if info.channels == 1 {
        let (mut samples, _) = read_wav(&args.input)?;
        let input_rms = rms(&samples);
        let input_peak = peak(&samples);

        let pb = progress_bar(samples.len() as u64);
        for chunk in samples.chunks_mut(args.block_size) {
            engine.process_mono(chunk)?;
            pb.inc(chunk.len() as u64);
        }
        pb.finish_with_message("done");

        print_stats(input_rms, input_peak, rms(&samples), peak(&samples));
        write_wav(&args.output, &samples, out_spec)?;
    } else {
        let (mut stereo, _) = read_wav_stereo(&args.input)?;
        let input_rms = rms(&stereo.left).max(rms(&stereo.right));
        let input_peak = peak(&stereo.left).max(peak(&stereo.right));

        let pb = progress_bar(stereo.len() as u64);
        let frames = stereo.len();
        for start in (0..frames).step_by(args.block_size) {
            let end = (start + args.block_size).min(frames);
            engine.process_stereo(&mut stereo.left[start..end], &mut stereo.right[start..end])?;
            pb.inc((end - start) as u64);
        }
        pb.finish_with_message("done");

        let output_rms = rms(&stereo.left).max(rms(&stereo.right));
        let output_peak = peak(&stereo.left).max(peak(&stereo.right));
        print_stats(input_rms, input_peak, output_rms, output_peak);
        write_wav_stereo(&args.output, &stereo, out_spec)?;
    }

    println!("Wrote {}", args.output.display());
    Ok(())
}

fn print_stats(input_rms: f32, input_peak: f32, output_rms: f32, output_peak: f32) {
    println!(
        "  in:  rms {:6.2} dB, peak {:6.2} dB",
        linear_to_db(input_rms),
        linear_to_db(input_peak)
    );
    println!(
        "  out: rms {:6.2} dB, peak {:6.2} dB",
        linear_to_db(output_rms),
        linear_to_db(output_peak)
    );
}
