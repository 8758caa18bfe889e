// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Benchmarks the hashing primitives stage handlers call on every pipeline
//! run (spec §4.1, §5: "hashing is fast enough that a single cooperative
//! task is sufficient" — this is the measurement backing that claim).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use doc_gen_domain::value_objects::{batch_hash, canonical_json_hash};
use serde_json::json;

fn bench_canonical_json_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_json_hash");
    for section_count in [1usize, 16, 256] {
        let value = json!({
            "section_id": 7,
            "hierarchy_context": { "depth": 3, "path_segments": ["body", "block", "7"] },
            "client_data": {
                "client_id": "acme",
                "data_fields": (0..section_count).map(|i| (format!("field_{i}"), json!(i))).collect::<serde_json::Map<_, _>>(),
            },
        });
        group.bench_with_input(BenchmarkId::from_parameter(section_count), &value, |b, value| {
            b.iter(|| canonical_json_hash(black_box(value)));
        });
    }
    group.finish();
}

fn bench_batch_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_hash");
    for input_count in [10usize, 100, 1_000] {
        let hashes: Vec<String> = (0..input_count).map(|i| format!("{i:064x}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(input_count), &hashes, |b, hashes| {
            b.iter(|| batch_hash(black_box(hashes.clone())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_canonical_json_hash, bench_batch_hash);
criterion_main!(benches);
