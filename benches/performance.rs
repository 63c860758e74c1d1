// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for chordchart
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Chord label formatting
//! - Temporal index queries
//! - Chart building at song scale
//! - Lyric alignment
//! - Text rendering of a whole view

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chordchart::chart::{format_chord, ChordChart};
use chordchart::loader::JobSnapshot;
use chordchart::lyrics::LyricSheet;
use chordchart::model::{ChartSettings, ChordEvent, LyricLine, LyricWord, Section, ViewMode};
use chordchart::timeline::{Interval, TemporalIndex};
use chordchart::view::{render_text, JobView};

const LABELS: [&str; 6] = ["C:maj", "A:min", "F:maj7", "G:7", "E:min7", "D:min"];

/// A song of `bars` bars at two seconds per bar, with a chord every half bar
fn song(bars: usize) -> JobSnapshot {
    let section_len = 16;
    let sections = (0..bars.div_ceil(section_len))
        .map(|i| {
            let start = (i * section_len * 2) as f64;
            Section::new(format!("Section {}", i + 1), start, start + (section_len * 2) as f64)
        })
        .collect();

    let chords = (0..bars * 2)
        .map(|i| {
            let start = i as f64;
            ChordEvent::new(start, start + 1.0)
                .at_bar((i / 2) as i64)
                .with_beat(if i % 2 == 0 { 1 } else { 3 })
                .with_all_labels(LABELS[(i / 3) % LABELS.len()])
        })
        .collect();

    let lines = (0..bars / 2)
        .map(|i| {
            let start = (i * 4) as f64;
            let words = (0..6)
                .map(|w| {
                    let t = start + w as f64 * 0.6;
                    LyricWord::new(format!("word{}", w), t, t + 0.5)
                })
                .collect();
            LyricLine::from_words(start, start + 4.0, words)
        })
        .collect();

    JobSnapshot {
        job_id: "bench".to_string(),
        title: "Bench Song".to_string(),
        sections,
        chords,
        lines,
    }
}

/// Benchmark chord label formatting
fn bench_format_chord(c: &mut Criterion) {
    c.bench_function("format_chord", |b| {
        b.iter(|| {
            for label in LABELS {
                black_box(format_chord(Some(black_box(label))));
            }
        })
    });
}

/// Benchmark temporal index window queries
fn bench_temporal_index(c: &mut Criterion) {
    let snapshot = song(128);
    let index = TemporalIndex::new(&snapshot.chords);

    c.bench_function("starting_within", |b| {
        b.iter(|| black_box(index.starting_within(Interval::new(black_box(64.0), black_box(96.0)))).len())
    });
}

/// Benchmark chart building for songs of increasing length
fn bench_chart_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_build");

    for bars in [32usize, 128, 512].iter() {
        let snapshot = song(*bars);
        group.bench_with_input(BenchmarkId::from_parameter(bars), &snapshot, |b, snapshot| {
            b.iter(|| {
                ChordChart::build(
                    black_box(&snapshot.sections),
                    black_box(&snapshot.chords),
                    &ChartSettings::default(),
                )
            })
        });
    }

    group.finish();
}

/// Benchmark lyric alignment
fn bench_lyric_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("lyric_alignment");

    for bars in [32usize, 128, 512].iter() {
        let snapshot = song(*bars);
        group.bench_with_input(BenchmarkId::from_parameter(bars), &snapshot, |b, snapshot| {
            b.iter(|| {
                LyricSheet::build(
                    black_box(&snapshot.sections),
                    black_box(&snapshot.lines),
                    black_box(&snapshot.chords),
                    &ChartSettings::default(),
                )
            })
        });
    }

    group.finish();
}

/// Benchmark rendering a full view as text
fn bench_render_text(c: &mut Criterion) {
    let view = JobView::new(song(128), ChartSettings::default());

    c.bench_function("render_text", |b| {
        b.iter(|| render_text(black_box(&view), ViewMode::Both))
    });
}

criterion_group!(
    benches,
    bench_format_chord,
    bench_temporal_index,
    bench_chart_build,
    bench_lyric_alignment,
    bench_render_text,
);

criterion_main!(benches);
