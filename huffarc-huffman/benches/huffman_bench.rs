//! Throughput benchmarks for HuffArc Huffman coding.
//!
//! - Tree construction from frequency tables
//! - Encoding and decoding across data patterns and sizes

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use huffarc_huffman::{CodeTree, FrequencyTable, compress, decompress};
use std::hint::black_box;

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

mod test_data {
    /// Random data - flat distribution (worst case)
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Text-like data - realistic skew
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. \
                     How vexingly quick daft zebras jump! ";
        text.iter().copied().cycle().take(size).collect()
    }

    /// Two symbols with a heavy skew
    pub fn binary_skewed(size: usize) -> Vec<u8> {
        (0..size).map(|i| if i % 10 == 0 { 1 } else { 0 }).collect()
    }
}

const PATTERNS: [(&str, PatternGenerator); 3] = [
    ("random", test_data::random),
    ("text", test_data::text_like),
    ("binary_skewed", test_data::binary_skewed),
];

const SIZES: [usize; 3] = [4 * 1024, 64 * 1024, 1024 * 1024];

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");
    for (name, generator) in PATTERNS {
        let freq = FrequencyTable::count(&generator(64 * 1024));
        group.bench_function(name, |b| {
            b.iter(|| CodeTree::build(black_box(&freq)).expect("build failed"))
        });
    }
    group.finish();
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for (name, generator) in PATTERNS {
        for size in SIZES {
            let data = generator(size);
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), &data, |b, data| {
                b.iter(|| compress(black_box(data)).expect("compression failed"))
            });
        }
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for (name, generator) in PATTERNS {
        for size in SIZES {
            let data = generator(size);
            let compressed = compress(&data).expect("compression failed");
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), &compressed, |b, packed| {
                b.iter(|| decompress(black_box(packed), size).expect("decompression failed"))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_build_tree, bench_compress, bench_decompress);
criterion_main!(benches);
