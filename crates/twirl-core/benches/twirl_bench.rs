//! Benchmarks for twirling set generation and substitution
//!
//! Run with: cargo bench -p twirl-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use twirl_core::{
    GateCatalogue, TwirlConfig, TwirlingGenerator, TwirlingRegistry, Twirler,
};
use twirl_ir::Circuit;

/// Benchmark generation of a single gate's twirling set
fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    let catalogue = GateCatalogue::standard();

    for parallel in [false, true] {
        let generator = TwirlingGenerator::default().with_parallel(parallel);
        for name in ["cx", "ecr", "cs"] {
            let Some(spec) = catalogue.get(name) else {
                continue;
            };
            let id = format!("{name}/{}", if parallel { "parallel" } else { "sequential" });
            group.bench_with_input(BenchmarkId::new("gate", id), spec, |b, spec| {
                b.iter(|| generator.generate_spec(black_box(spec)).unwrap());
            });
        }
    }

    group.finish();
}

/// Benchmark building the full standard registry
fn bench_registry(c: &mut Criterion) {
    let catalogue = GateCatalogue::standard();
    let config = TwirlConfig::default();

    c.bench_function("registry_build_standard", |b| {
        b.iter(|| TwirlingRegistry::build(black_box(&catalogue), &config).unwrap());
    });
}

/// Benchmark substitution on GHZ circuits of growing size
fn bench_substitution(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitution");
    let catalogue = GateCatalogue::standard().select(&["cx"]).unwrap();
    let registry = TwirlingRegistry::build(&catalogue, &TwirlConfig::default()).unwrap();
    let set = registry.get("cx").unwrap();

    for num_qubits in &[10, 100, 1000] {
        let circuit = Circuit::ghz(*num_qubits).unwrap();
        group.bench_with_input(BenchmarkId::new("ghz", num_qubits), &circuit, |b, circuit| {
            b.iter_batched(
                || circuit.clone(),
                |mut circuit| {
                    Twirler::seeded(7)
                        .substitute(circuit.dag_mut(), "cx", set)
                        .unwrap();
                    circuit
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation, bench_registry, bench_substitution);
criterion_main!(benches);
