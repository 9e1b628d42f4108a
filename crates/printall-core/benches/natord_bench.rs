// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for natural-order sorting in the printall-core crate.
// The comparator backs two sort passes per run (images, then the merged
// queue), so the benchmark sorts a folder-sized batch of mixed names.

use std::path::PathBuf;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use printall_core::natord;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Build 1000 scanner-style names mixing padded and unpadded numbers.
fn sample_paths() -> Vec<PathBuf> {
    (0..1000u32)
        .rev()
        .map(|i| match i % 4 {
            0 => PathBuf::from(format!("/scans/page{i}.jpg")),
            1 => PathBuf::from(format!("/scans/Page{i:04}.png")),
            2 => PathBuf::from(format!("/docs/report-{}-v{}.docx", i / 10, i % 10)),
            _ => PathBuf::from(format!("/docs/_appendix {i}.pdf")),
        })
        .collect()
}

fn bench_sort_by_file_name(c: &mut Criterion) {
    let paths = sample_paths();

    c.bench_function("natural sort (1000 paths)", |b| {
        b.iter(|| {
            let mut batch = black_box(paths.clone());
            natord::sort_by_file_name(&mut batch, |p| p.as_path());
            black_box(batch);
        });
    });
}

fn bench_compare(c: &mut Criterion) {
    c.bench_function("natural compare (padded digits)", |b| {
        b.iter(|| natord::compare(black_box("scan-000123-final.pdf"), black_box("scan-123-final.pdf")));
    });
}

criterion_group!(benches, bench_sort_by_file_name, bench_compare);
criterion_main!(benches);
