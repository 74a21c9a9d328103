use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use stgnet_runtime::{LifParams, PoissonGenerator, Simulator, SynapseSpec};

fn build_circuit(neurons: usize, ctype: &str) -> Simulator {
    let mut sim = Simulator::default();
    let drive = sim.add_input(
        PoissonGenerator::new(100.0)
            .expect("bench rate")
            .with_seed(1234),
    );
    let pop = sim
        .add_population(neurons, &LifParams::default())
        .expect("bench population");

    let feed = SynapseSpec::fixed(5.0, 1.0);
    sim.connect(&[drive], &pop, &vec![vec![feed]; neurons])
        .expect("bench input wiring");

    // Chain with one synapse per neighbour pair
    let spec = SynapseSpec::from_pairs(ctype, &[("weight", 2.0)]).expect("bench spec");
    for pair in pop.windows(2) {
        sim.connect_one(pair[0], pair[1], spec.clone())
            .expect("bench chain wiring");
    }
    sim
}

fn bench_run(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut group = c.benchmark_group("stgnet_run");
    // Short duration to keep benches fast in CI
    let duration_ms = 20.0;

    for &n in &[8usize, 32, 128] {
        group.throughput(Throughput::Elements(n as u64));
        for ctype in ["Static", "Depr", "STDP"] {
            group.bench_with_input(BenchmarkId::new(ctype, n), &n, |b, &n| {
                b.iter_batched(
                    || build_circuit(n, ctype),
                    |mut sim| {
                        let _res = sim.run(duration_ms).unwrap();
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_run);
criterion_main!(benches);
