use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use eol_rs::common::rng::Rng;
use eol_rs::eol::{self, EolConfig, ScanState};

fn generate_text(lines: usize, eol: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..lines {
        data.extend_from_slice(b"the quick brown fox\tjumps over ");
        data.extend_from_slice(i.to_string().as_bytes());
        data.extend_from_slice(eol);
    }
    data
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("eol_scan");
    for size_mb in [1, 10] {
        let lines = size_mb * 1024 * 1024 / 36;
        let data = generate_text(lines, b"\r\n");
        group.bench_with_input(
            BenchmarkId::new("full", format!("{}MB", size_mb)),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut state = ScanState::new(Some(data.len() as u64), 0);
                    state.scan(black_box(data));
                    state
                })
            },
        );
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let data = generate_text(300_000, b"\n");
    let mut group = c.benchmark_group("eol_classify");
    for (name, sample_size) in [("full", 0), ("quick", eol::QUICK_SAMPLE_SIZE)] {
        let config = EolConfig {
            sample_size,
            counts: true,
            ..Default::default()
        };
        group.bench_function(name, |b| {
            let mut rng = Rng::from_seed(42);
            b.iter(|| eol::classify_bytes(black_box(&data), &config, &mut rng))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan, bench_classify);
criterion_main!(benches);
