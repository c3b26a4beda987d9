use shared::*;

use boxwalk::find_peer_lists;
use criterion::{black_box, criterion_group, Criterion};
use tracing::info;

/// A generic helper function for peer-list benchmarks.
fn bench_build_peer_lists(name: &str, depth: u32, cc: &mut Criterion) {
    let tree = generate_uniform_quadtree(depth);
    cc.bench_function(name, |b| {
        b.iter(|| {
            info!("Running peer-list benchmark: {}", name);
            let lookup = find_peer_lists(black_box(&tree)).unwrap();
            info!("Completed peer-list benchmark: {}", name);
            black_box(lookup)
        })
    });
}

fn benchmark_peers_shallow(_c: &mut Criterion) {
    info!("Setting up benchmark_peers_shallow");
    let mut cc = configure_criterion();
    bench_build_peer_lists("peers_depth_3", 3, &mut cc);
}

fn benchmark_peers_medium(_c: &mut Criterion) {
    info!("Setting up benchmark_peers_medium");
    let mut cc = configure_criterion();
    bench_build_peer_lists("peers_depth_5", 5, &mut cc);
}

fn benchmark_peers_deep(_c: &mut Criterion) {
    info!("Setting up benchmark_peers_deep");
    let mut cc = configure_criterion();
    bench_build_peer_lists("peers_depth_6", BENCH_TREE_DEPTH, &mut cc);
}

criterion_group!(
    benches,
    benchmark_peers_shallow,
    benchmark_peers_medium,
    benchmark_peers_deep,
);
