// Benchmarks for the tempo search: divisor-pruned search against the
// unpruned parallel reference, on the classic third-stop strip and on a
// wide tempo range where pruning has more to skip.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use teststrip_core::loss::LpLoss;
use teststrip_core::schedule::{Schedule, StripParams};
use teststrip_core::search::{search, search_exhaustive};

fn classic_schedule() -> Schedule {
    Schedule::build(&StripParams {
        base: 10.0,
        stepsize: 3,
        numsteps: 7,
        baseplace: None,
    })
    .expect("valid schedule")
}

fn bench_search(c: &mut Criterion) {
    let schedule = classic_schedule();
    let metronome: Vec<u32> = (40..=208).collect();
    let wide: Vec<u32> = (20..=2000).collect();

    c.bench_function("pruned_40_208", |b| {
        b.iter(|| search(black_box(&metronome), &schedule, &LpLoss::L2))
    });
    c.bench_function("exhaustive_40_208", |b| {
        b.iter(|| search_exhaustive(black_box(&metronome), &schedule, &LpLoss::L2))
    });
    c.bench_function("pruned_20_2000", |b| {
        b.iter(|| search(black_box(&wide), &schedule, &LpLoss::L2))
    });
    c.bench_function("exhaustive_20_2000", |b| {
        b.iter(|| search_exhaustive(black_box(&wide), &schedule, &LpLoss::L2))
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
