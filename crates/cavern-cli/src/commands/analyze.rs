//! Spectrum analysis command.
//!
//! Streams a WAV file through the display pipeline the way a host UI
//! would: samples are pushed continuously and the pipeline ticks at a
//! simulated refresh rate. The final display state is reported as peak
//! bins and optionally dumped to CSV.

use cavern_analysis::SpectrumPipeline;
use cavern_io::read_wav;
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Simulated display refresh rate in Hz
    #[arg(long, default_value = "60")]
    tick_rate: u32,

    /// Show the top N display-bin peaks
    #[arg(long, default_value = "5")]
    peaks: usize,

    /// Write the final display bins to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.tick_rate > 0, "tick rate must be positive");

    let (samples, spec) = read_wav(&args.input)?;
    let sample_rate = spec.sample_rate as f32;
    println!(
        "Analyzing {} ({} samples, {} Hz)...",
        args.input.display(),
        samples.len(),
        spec.sample_rate
    );

    let mut pipeline = SpectrumPipeline::with_defaults();
    let samples_per_tick = (spec.sample_rate / args.tick_rate).max(1) as usize;

    for chunk in samples.chunks(samples_per_tick) {
        for &sample in chunk {
            pipeline.push_sample(sample);
        }
        pipeline.update();
    }

    // Let the animation settle on the final spectrum before reporting.
    for _ in 0..args.tick_rate {
        pipeline.update();
    }

    report_peaks(&pipeline, sample_rate, args.peaks);

    if let Some(csv_path) = &args.csv {
        write_csv(csv_path, &pipeline, sample_rate)?;
        println!("Wrote {}", csv_path.display());
    }

    Ok(())
}

fn report_peaks(pipeline: &SpectrumPipeline, sample_rate: f32, count: usize) {
    let bins = pipeline.display_bins();
    let mut indexed: Vec<(usize, f32)> = bins.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

    println!("Top display bins:");
    for (bin, level) in indexed.into_iter().take(count) {
        println!(
            "  bin {bin:4}  ~{:7.1} Hz  level {level:.5}",
            pipeline.display_bin_frequency(bin, sample_rate)
        );
    }
}

fn write_csv(path: &Path, pipeline: &SpectrumPipeline, sample_rate: f32) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "bin,frequency_hz,level")?;
    for (bin, level) in pipeline.display_bins().iter().enumerate() {
        writeln!(
            file,
            "{bin},{:.2},{level}",
            pipeline.display_bin_frequency(bin, sample_rate)
        )?;
    }
    Ok(())
}
