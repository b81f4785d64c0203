use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use gridline_core::ruling::DEFAULT_MAX_DISTANCE;
use gridline_core::{ExtractionSettings, Ruling, Spreadsheet, TableExtractor, TextFragment, clean_rulings};

const CELL: f64 = 20.0;

/// An n x n lattice whose borders are drawn as two slightly offset halves.
fn split_lattice(n: usize) -> Vec<Ruling> {
    let extent = n as f64 * CELL;
    let half = extent / 2.0;
    let mut rulings = Vec::with_capacity(4 * (n + 1));
    for i in 0..=n {
        let at = i as f64 * CELL;
        rulings.extend([
            Ruling::horizontal(at, 0.0, half - 1.0),
            Ruling::horizontal(at + 0.5, half + 1.0, extent),
            Ruling::vertical(at, 0.0, half - 1.0),
            Ruling::vertical(at + 0.5, half + 1.0, extent),
        ]);
    }
    rulings.into_iter().filter_map(Result::ok).collect()
}

fn cell_glyphs(n: usize) -> Vec<TextFragment> {
    let mut glyphs = Vec::with_capacity(n * n * 3);
    for row in 0..n {
        for col in 0..n {
            let top = row as f64 * CELL + 5.0;
            let left = col as f64 * CELL + 2.0;
            for (k, c) in ["4", "2", "0"].iter().enumerate() {
                glyphs.push(TextFragment::new(
                    top,
                    left + k as f64 * 5.0,
                    4.5,
                    8.0,
                    None,
                    8.0,
                    *c,
                    2.0,
                ));
            }
        }
    }
    glyphs
}

fn bench_clean_rulings(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_rulings");
    for n in [8, 32] {
        let rulings = split_lattice(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &rulings, |b, r| {
            b.iter(|| black_box(clean_rulings(r.clone(), DEFAULT_MAX_DISTANCE)));
        });
    }
    group.finish();
}

fn bench_spreadsheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("spreadsheet_cells");
    for n in [8, 16, 32] {
        let rulings = clean_rulings(split_lattice(n), DEFAULT_MAX_DISTANCE);
        group.bench_with_input(BenchmarkId::from_parameter(n), &rulings, |b, r| {
            b.iter(|| black_box(Spreadsheet::new(r.iter().cloned())));
        });
    }
    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_spreadsheet");
    for n in [8, 16] {
        let settings = ExtractionSettings::default()
            .with_rulings(clean_rulings(split_lattice(n), DEFAULT_MAX_DISTANCE));
        let glyphs = cell_glyphs(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &glyphs, |b, g| {
            b.iter(|| {
                let extractor = TableExtractor::new(g.clone(), settings.clone());
                black_box(extractor.extract())
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = spreadsheet_benches;
    config = Criterion::default().configure_from_args();
    targets = bench_clean_rulings, bench_spreadsheet, bench_extract
);
criterion_main!(spreadsheet_benches);
