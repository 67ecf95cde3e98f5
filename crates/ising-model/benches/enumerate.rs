use criterion::{criterion_group, criterion_main, Criterion};
use ising_model::{ExactEnumerator, Hamiltonian, Neighbor};

fn ring(n: usize) -> Hamiltonian {
    let adjacency = (0..n)
        .map(|site| {
            vec![
                Neighbor::new((site + 1) % n, 1.0),
                Neighbor::new((site + n - 1) % n, 1.0),
            ]
        })
        .collect();
    Hamiltonian::build(adjacency, vec![0.1; n]).unwrap()
}

fn bench_enumerate(c: &mut Criterion) {
    let ham = ring(14);
    let sequential = ExactEnumerator::new();
    let parallel = ExactEnumerator::with_workers(4);

    c.bench_function("exact_ring14_sequential", |b| {
        b.iter(|| sequential.averages(&ham, 14, 2.0).unwrap())
    });
    c.bench_function("exact_ring14_4_workers", |b| {
        b.iter(|| parallel.averages(&ham, 14, 2.0).unwrap())
    });
}

criterion_group!(benches, bench_enumerate);
criterion_main!(benches);
