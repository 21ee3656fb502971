use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mailring::{Config, Inbox};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

const MESSAGES: u64 = 1_000_000;

fn bench_spsc_spin(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc_spin");
    group.throughput(Throughput::Elements(MESSAGES));

    for capacity in [4usize, 64, 4096] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let inbox = Arc::new(Inbox::<u64>::new("bench", capacity).unwrap());
                    let producer_inbox = Arc::clone(&inbox);

                    let producer = thread::spawn(move || {
                        for k in 0..MESSAGES {
                            producer_inbox.write_spin(k);
                        }
                    });

                    for _ in 0..MESSAGES {
                        black_box(inbox.read_spin());
                    }

                    producer.join().unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_mpmc_shared(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpmc_shared");

    for (producers, consumers) in [(2usize, 2usize), (4, 4)] {
        let total = MESSAGES;
        let per_producer = total / producers as u64;
        group.throughput(Throughput::Elements(per_producer * producers as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}P_{}C", producers, consumers)),
            &(producers, consumers),
            |b, &(producers, consumers)| {
                b.iter(|| {
                    let inbox = Arc::new(Inbox::<u64>::new("bench", 4096).unwrap());
                    let drained = Arc::new(AtomicU64::new(0));
                    let target = per_producer * producers as u64;

                    let producer_handles: Vec<_> = (0..producers)
                        .map(|_| {
                            let inbox = Arc::clone(&inbox);
                            thread::spawn(move || {
                                for k in 0..per_producer {
                                    inbox.write_spin(k);
                                }
                            })
                        })
                        .collect();

                    let consumer_handles: Vec<_> = (0..consumers)
                        .map(|_| {
                            let inbox = Arc::clone(&inbox);
                            let drained = Arc::clone(&drained);
                            thread::spawn(move || {
                                while drained.load(Ordering::Relaxed) < target {
                                    if let Some(value) = inbox.try_read_shared() {
                                        black_box(value);
                                        drained.fetch_add(1, Ordering::Relaxed);
                                    }
                                }
                            })
                        })
                        .collect();

                    for handle in producer_handles {
                        handle.join().unwrap();
                    }
                    for handle in consumer_handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_try_write_hit_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonblocking");
    group.throughput(Throughput::Elements(MESSAGES));

    group.bench_function("try_write_try_read_pingpong", |b| {
        b.iter(|| {
            let inbox =
                Arc::new(Inbox::<u64>::with_config("bench", Config::new(64).with_metrics()).unwrap());
            let producer_inbox = Arc::clone(&inbox);

            let producer = thread::spawn(move || {
                let mut sent = 0u64;
                while sent < MESSAGES {
                    if producer_inbox.try_write(sent) {
                        sent += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });

            let mut received = 0u64;
            while received < MESSAGES {
                if let Some(value) = inbox.try_read() {
                    black_box(value);
                    received += 1;
                } else {
                    std::hint::spin_loop();
                }
            }

            producer.join().unwrap();
            black_box(inbox.metrics().write_hit_ratio());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_spsc_spin,
    bench_mpmc_shared,
    bench_try_write_hit_ratio
);
criterion_main!(benches);
