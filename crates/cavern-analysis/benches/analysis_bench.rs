//! Criterion benchmarks for the spectrum pipeline
//!
//! Run with: cargo bench -p cavern-analysis
#![allow(missing_docs)]

use cavern_analysis::{FftCore, SpectrumPipeline};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rustfft::num_complex::Complex;

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("FftCore");

    let fft = FftCore::new(11);
    let template: Vec<Complex<f32>> = (0..2048)
        .map(|i| Complex::new((i as f32 * 0.13).sin(), 0.0))
        .collect();

    group.bench_function("perform_2048", |b| {
        let mut data = template.clone();
        b.iter(|| {
            data.copy_from_slice(&template);
            fft.perform(black_box(&mut data)).unwrap();
        });
    });

    group.bench_function("magnitude_spectrum_2048", |b| {
        let mut fft = FftCore::new(11);
        let input: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.13).sin()).collect();
        let mut output = vec![0.0f32; 1024];
        b.iter(|| {
            fft.magnitude_spectrum(black_box(&input), black_box(&mut output))
                .unwrap();
        });
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("SpectrumPipeline");

    group.bench_function("push_one_window", |b| {
        let mut pipeline = SpectrumPipeline::with_defaults();
        let window: Vec<f32> = (0..pipeline.window_len())
            .map(|i| (i as f32 * 0.1).sin())
            .collect();
        b.iter(|| {
            for &sample in &window {
                pipeline.push_sample(black_box(sample));
            }
        });
    });

    group.bench_function("update_with_pending_frame", |b| {
        let mut pipeline = SpectrumPipeline::with_defaults();
        let frame: Vec<f32> = (0..pipeline.window_len())
            .map(|i| (i as f32 * 0.1).sin())
            .collect();
        b.iter(|| {
            pipeline.submit_frame(black_box(&frame));
            pipeline.update();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_fft, bench_pipeline);
criterion_main!(benches);
