//! Benchmarks for markup rendering performance.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use wk_renderer::{WikiRenderer, extract_links, render};

/// Generate markup with the given number of sections and list entries.
fn generate_markup(sections: usize, entries_per_section: usize) -> String {
    let mut text = String::with_capacity(sections * (60 + entries_per_section * 80));

    for i in 0..sections {
        text.push_str(&format!("** Section {i}\n"));
        text.push_str(&format!(
            "Intro with &bold(){{emphasis}} and [[Page {i}]].&br()Next line\n\n"
        ));
        for j in 0..entries_per_section {
            text.push_str(&format!("- [[Entry {j}>Page {i}-{j}]]\n"));
            text.push_str(&format!("See [[Docs>https://example.com/{i}/{j}]]\n"));
        }
        text.push_str("\n\n");
    }
    text
}

fn bench_render_simple(c: &mut Criterion) {
    c.bench_function("render_simple_page", |b| {
        b.iter(|| render("** Hello\nSimple [[Home]] content."));
    });
}

fn bench_extract_links(c: &mut Criterion) {
    let text = generate_markup(20, 5);

    c.bench_function("extract_links_20_sections", |b| {
        b.iter(|| extract_links(&text));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let renderer = WikiRenderer::new();
    let mut group = c.benchmark_group("render_by_size");

    for (sections, entries) in [(5, 2), (20, 5), (100, 10)] {
        let text = generate_markup(sections, entries);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markup", format!("{sections}s_{entries}e")),
            &text,
            |b, text| b.iter(|| renderer.render(text)),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_extract_links,
    bench_render_varying_sizes
);
criterion_main!(benches);
