use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grovercrack_core::{
    Alphabet, AmplitudeOracle, ClassicalEnumerator, SequentialCracker, SimulatorConfig,
    StateVector, SymmetricModel,
};

/// Register widths we benchmark: 16 to 4096 patterns.
const WIDTHS: &[u32] = &[4, 7, 10, 12];

fn run_rounds<O: AmplitudeOracle>(oracle: &mut O, width: u32) {
    let rounds = grovercrack_core::optimal_rounds(width);
    oracle.reset(width);
    for _ in 0..rounds {
        oracle.mark(3);
        oracle.amplify();
    }
}

fn bench_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("Amplification rounds");

    for &width in WIDTHS {
        group.throughput(Throughput::Elements(1u64 << width));
        group.bench_with_input(BenchmarkId::new("state_vector", width), &width, |b, &w| {
            let mut sv = StateVector::new();
            b.iter(|| run_rounds(black_box(&mut sv), w))
        });
        group.bench_with_input(BenchmarkId::new("symmetric", width), &width, |b, &w| {
            let mut sym = SymmetricModel::new();
            b.iter(|| run_rounds(black_box(&mut sym), w))
        });
    }

    group.finish();
}

fn bench_crack(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sequential crack");
    let cracker = SequentialCracker::new(Alphabet::printable(), SimulatorConfig::default()).unwrap();

    for target in ["ab", "Pass@123", "LongPass123#"] {
        group.bench_with_input(BenchmarkId::new("printable", target.len()), &target, |b, &t| {
            b.iter(|| cracker.crack_with_seed(black_box(t), 42).unwrap())
        });
    }

    group.finish();
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classical enumerate");
    let enumerator = ClassicalEnumerator::new(Alphabet::printable());

    for target in ["~", "~~", "~~~"] {
        group.bench_with_input(BenchmarkId::new("worst_case", target.len()), &target, |b, &t| {
            b.iter(|| enumerator.enumerate_and_match(black_box(t)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rounds, bench_crack, bench_enumerate);
criterion_main!(benches);
