//! Benchmarks for the graph analysis engine.
//!
//! Measures the hot passes over synthetic dependency graphs:
//! - Condensation (Tarjan + condensed graph construction)
//! - Layering over the condensation
//! - Component geometry on one large cycle
//! - Path search across a layered graph

extern crate depscope;

use criterion::{criterion_group, criterion_main, Criterion};
use depscope::graph::{
    Digraph, LongestWalkProcessor, PathsFinder, StrongComponentProcessor, VertexId,
};
use std::hint::black_box;

/// A layered graph: `layers` tiers of `width` vertices, every vertex referencing
/// two vertices of the tier below, plus one cycle inside the middle tier.
fn layered_graph(layers: usize, width: usize) -> Digraph<()> {
    let mut graph = Digraph::new();
    let mut tiers: Vec<Vec<VertexId>> = Vec::with_capacity(layers);
    for _ in 0..layers {
        tiers.push((0..width).map(|_| graph.add_vertex(())).collect());
    }
    for tier in 1..layers {
        for position in 0..width {
            let tail = tiers[tier][position];
            graph.add_arc(tail, tiers[tier - 1][position]);
            graph.add_arc(tail, tiers[tier - 1][(position + 1) % width]);
        }
    }
    let middle = &tiers[layers / 2];
    for position in 0..width {
        graph.add_arc(middle[position], middle[(position + 1) % width]);
    }
    graph
}

/// One directed cycle of `length` vertices.
fn cycle_graph(length: usize) -> Digraph<()> {
    let mut graph = Digraph::new();
    let ids: Vec<VertexId> = (0..length).map(|_| graph.add_vertex(())).collect();
    for position in 0..length {
        graph.add_arc(ids[position], ids[(position + 1) % length]);
    }
    graph
}

fn bench_condense_layered(c: &mut Criterion) {
    let graph = layered_graph(20, 50);
    let processor = StrongComponentProcessor::new(false);

    c.bench_function("condense_layered_20x50", |b| {
        b.iter(|| {
            let condensation = processor.execute(black_box(&graph)).unwrap();
            black_box(condensation)
        });
    });
}

fn bench_condense_and_layer(c: &mut Criterion) {
    let graph = layered_graph(20, 50);
    let processor = StrongComponentProcessor::new(false);
    let walker = LongestWalkProcessor::new();

    c.bench_function("condense_and_layer_20x50", |b| {
        b.iter(|| {
            let condensation = processor.execute(black_box(&graph)).unwrap();
            let walks = walker.execute(&condensation).unwrap();
            black_box(walks)
        });
    });
}

fn bench_geometry_of_one_cycle(c: &mut Criterion) {
    let graph = cycle_graph(64);
    let processor = StrongComponentProcessor::new(true);

    c.bench_function("geometry_cycle_64", |b| {
        b.iter(|| {
            let condensation = processor.execute(black_box(&graph)).unwrap();
            black_box(condensation)
        });
    });
}

fn bench_paths_across_layers(c: &mut Criterion) {
    // Same shape as layered_graph, but with the arena index as payload so the
    // set conditions can tell the tiers apart.
    let shape = layered_graph(20, 50);
    let mut id_graph = Digraph::new();
    for vertex in shape.ids() {
        id_graph.add_vertex(vertex.index());
    }
    for vertex in shape.ids() {
        for &head in shape.outgoing(vertex) {
            id_graph.add_arc(vertex, head);
        }
    }

    let top = id_graph.vertex_count() - 50;
    let finder = PathsFinder::new(
        move |index: &usize| *index >= top,
        |index: &usize| *index < 50,
        true,
    );

    c.bench_function("shortest_paths_20x50", |b| {
        b.iter(|| {
            let paths = finder.find_paths(black_box(&id_graph));
            black_box(paths)
        });
    });
}

criterion_group!(
    benches,
    bench_condense_layered,
    bench_condense_and_layer,
    bench_geometry_of_one_cycle,
    bench_paths_across_layers
);
criterion_main!(benches);
