//! Criterion benchmarks for the three searches.
//!
//! Run with:
//!   cargo bench -p graphwalk
//!
//! Results are saved to target/criterion/

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use graphwalk::prelude::*;

/// A `side` x `side` grid with 4-neighbour edges.
fn make_grid(side: usize) -> Graph {
    let mut graph = Graph::with_capacity(side * side);
    for r in 0..side {
        for c in 0..side {
            graph
                .add_node(&format!("{r}:{c}"), Point::new(r as f64, c as f64))
                .unwrap();
        }
    }
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                graph
                    .add_edge(&format!("{r}:{c}"), &format!("{r}:{}", c + 1))
                    .unwrap();
            }
            if r + 1 < side {
                graph
                    .add_edge(&format!("{r}:{c}"), &format!("{}:{c}", r + 1))
                    .unwrap();
            }
        }
    }
    graph
}

/// Corner to corner on growing grids.
fn bench_grid_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");

    for side in [8usize, 16, 32, 64].iter() {
        let graph = Arc::new(make_grid(*side));
        let dest = format!("{}:{}", side - 1, side - 1);
        group.throughput(Throughput::Elements((side * side) as u64));

        for algorithm in Algorithm::ALL {
            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), side),
                side,
                |b, _| {
                    b.iter(|| {
                        let mut search =
                            Graph::search_shared(Arc::clone(&graph), algorithm, "0:0", &dest)
                                .unwrap();
                        black_box(search.run())
                    });
                },
            );
        }
    }

    group.finish();
}

/// The built-in map, coast to coast.
fn bench_city_map(c: &mut Criterion) {
    let graph = Arc::new(graphwalk::cities::us_cities());
    let mut group = c.benchmark_group("cities");

    for algorithm in Algorithm::ALL {
        group.bench_function(algorithm.name(), |b| {
            b.iter(|| {
                let mut search =
                    Graph::search_shared(Arc::clone(&graph), algorithm, "Miami, FL", "Seattle, WA")
                        .unwrap();
                search.run();
                black_box(search.route())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_sizes, bench_city_map);
criterion_main!(benches);
