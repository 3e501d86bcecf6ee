//! Processor benchmarks
//!
//! Measures the full per-block path: coefficient refresh, weights, three
//! cascades per channel and accumulation.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use xfade_core::{BankId, SharedParams, StreamConfig, XFadeProcessor, NUM_BANDS};

fn benchmark_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("xfade_processor");

    // Typical buffer sizes used in real-time audio
    for block_size in [64_u32, 128, 256, 512, 1024] {
        let params = Arc::new(SharedParams::new());
        params.set_bank_gains(BankId::A, &[3.0; NUM_BANDS]);
        params.set_bank_gains(BankId::B, &[-3.0; NUM_BANDS]);
        params.set_crossfade(0.5);

        let mut processor = XFadeProcessor::new(params);
        processor
            .configure(StreamConfig::new(48000, block_size, 2))
            .unwrap();

        // Create test buffer (stereo interleaved)
        let mut buffer: Vec<f32> = (0..block_size as usize * 2)
            .map(|i| (i as f32 * 0.001).sin())
            .collect();

        group.throughput(Throughput::Elements(block_size as u64 * 2));
        group.bench_function(format!("process_{}_frames", block_size), |b| {
            b.iter(|| {
                processor.process_interleaved(black_box(&mut buffer)).unwrap();
            })
        });
    }

    group.finish();
}

fn benchmark_crossfade_automation(c: &mut Criterion) {
    let params = Arc::new(SharedParams::new());
    let mut processor = XFadeProcessor::new(Arc::clone(&params));
    processor.configure(StreamConfig::default()).unwrap();
    let mut buffer = vec![0.1_f32; 1024];
    let mut x = -1.0_f32;

    c.bench_function("process_with_moving_crossfade", |b| {
        b.iter(|| {
            params.set_crossfade(black_box(x));
            processor.process_interleaved(&mut buffer).unwrap();
            x = if x >= 1.0 { -1.0 } else { x + 0.01 };
        })
    });
}

criterion_group!(benches, benchmark_processor, benchmark_crossfade_automation);
criterion_main!(benches);
