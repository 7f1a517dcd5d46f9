use core::hint::black_box;
use crackserver_core::{CrackJob, CrackOutcome, Dictionary, Statistics, crypt};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::sync::Arc;
use tokio::runtime::Builder;

const WORDS: usize = 2048;

fn dictionary() -> Arc<Dictionary> {
    Arc::new(Dictionary::from_words(
        (0..WORDS).map(|i| format!("w{i:07}")),
    ))
}

fn bench_crypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("crypt");
    group.throughput(Throughput::Elements(1));
    group.bench_function("hash", |b| {
        b.iter(|| crypt::hash(black_box("password"), black_box("ab1")));
    });
    group.finish();
}

fn bench_crack_exhaustive(c: &mut Criterion) {
    let rt = Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");
    let dict = dictionary();
    // Not in the dictionary, so every run hashes all words.
    let target = crypt::hash("absent", "zz").expect("failed to hash target");

    let mut group = c.benchmark_group("crack/exhaustive");
    group.throughput(Throughput::Elements(WORDS as u64));
    group.sample_size(10);

    for threads in [1, 2, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.to_async(&rt).iter(|| {
                let job = CrackJob::new(
                    target.as_str(),
                    threads,
                    Arc::clone(&dict),
                    Arc::new(Statistics::new()),
                )
                .expect("valid target");
                async move {
                    let outcome = job.run().await.expect("workers should not fail");
                    assert_eq!(outcome, CrackOutcome::Exhausted);
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_crypt, bench_crack_exhaustive);
criterion_main!(benches);
