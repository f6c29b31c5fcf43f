// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Parse and serialize throughput for the hierarchy and mapping formats
//!
//! ```bash
//! cargo bench --bench ontology_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dio_curator::document::Document;
use dio_curator::mapping::parse_mappings;
use dio_curator::obo::parse_hierarchy;

/// A balanced hierarchy of `n` terms, each with a four-way fan-out
fn synthetic_hierarchy(n: usize) -> String {
    let mut text = String::from("format-version: 1.2\nontology: dio\n\n");
    for i in 1..=n {
        text.push_str(&format!(
            "[Term]\nid: DIO:{i:07}\nname: term {i}\ndef: \"Synthetic term {i}\" []\n"
        ));
        if i > 1 {
            text.push_str(&format!("is_a: DIO:{:07} ! parent\n", (i + 2) / 4));
        }
        text.push('\n');
    }
    text
}

fn synthetic_mappings(n: usize) -> String {
    (1..=n)
        .map(|i| format!("DIO:{:07}\timage-{}", n + 1 - i, i))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_hierarchy(c: &mut Criterion) {
    let mut g = c.benchmark_group("hierarchy");
    for n in [100, 1_000, 5_000] {
        let text = synthetic_hierarchy(n);
        g.throughput(Throughput::Bytes(text.len() as u64));
        g.bench_with_input(BenchmarkId::new("parse", n), &text, |b, text| {
            b.iter(|| parse_hierarchy(black_box(text)));
        });
        let graph = parse_hierarchy(&text);
        g.bench_with_input(BenchmarkId::new("serialize", n), &graph, |b, graph| {
            b.iter(|| black_box(graph).serialize());
        });
    }
    g.finish();
}

fn bench_mappings(c: &mut Criterion) {
    let mut g = c.benchmark_group("mappings");
    for n in [1_000, 10_000] {
        let text = synthetic_mappings(n);
        g.throughput(Throughput::Elements(n as u64));
        g.bench_with_input(BenchmarkId::new("parse", n), &text, |b, text| {
            b.iter(|| parse_mappings(black_box(text)));
        });
        let table = parse_mappings(&text);
        g.bench_with_input(BenchmarkId::new("serialize", n), &table, |b, table| {
            b.iter(|| black_box(table).serialize());
        });
    }
    g.finish();
}

fn bench_cascade(c: &mut Criterion) {
    let ontology = synthetic_hierarchy(2_000);
    let mappings = synthetic_mappings(2_000);
    let (document, _) = match Document::load(&ontology, &mappings, "") {
        Ok(loaded) => loaded,
        Err(e) => panic!("synthetic document failed to load: {e}"),
    };

    c.bench_function("remove_term/subtree", |b| {
        b.iter_batched(
            || document.clone(),
            |mut doc| doc.remove_term(black_box("DIO:0000002")),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(ontology_benches, bench_hierarchy, bench_mappings, bench_cascade);
criterion_main!(ontology_benches);
