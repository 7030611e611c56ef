use bank_manager::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn quick_bank(customers: usize) -> Bank {
    let config = BankConfig::new()
        .with_initial_customers(customers)
        .with_processing_time(Duration::ZERO);
    Bank::with_config(config).expect("Failed to create bank")
}

fn benchmark_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue");

    group.bench_function("enqueue_dequeue_1000", |b| {
        let queue = ThreadSafeQueue::new();
        b.iter(|| {
            for i in 0..1000u64 {
                queue.enqueue(black_box(i));
            }
            while let Some(v) = queue.dequeue() {
                black_box(v);
            }
        });
    });

    group.bench_function("peek_then_dequeue_1000", |b| {
        let queue = ThreadSafeQueue::new();
        b.iter(|| {
            queue.extend(0..1000u64);
            while let Some(head) = queue.peek() {
                black_box(head);
                queue.dequeue();
            }
        });
    });

    group.bench_function("contended_4_consumers", |b| {
        b.iter_batched(
            || {
                let queue = Arc::new(ThreadSafeQueue::new());
                queue.extend(0..4000u64);
                queue
            },
            |queue| {
                let handles: Vec<_> = (0..4)
                    .map(|_| {
                        let queue = Arc::clone(&queue);
                        thread::spawn(move || while queue.dequeue().is_some() {})
                    })
                    .collect();
                for handle in handles {
                    handle.join().expect("consumer panicked");
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");
    group.sample_size(20);

    for customers in [0usize, 10, 100] {
        group.bench_function(format!("customers_{}", customers), |b| {
            b.iter_batched(
                || quick_bank(customers),
                |bank| {
                    let summary = bank.open().expect("Failed to open bank");
                    black_box(summary.total_customers);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_lane(c: &mut Criterion) {
    c.bench_function("deposit_lane_100_jobs", |b| {
        b.iter(|| {
            let mut lane = Lane::start(Task::Deposit, 4, "bench").expect("Failed to start lane");
            for _ in 0..100 {
                lane.execute(|| {
                    black_box(1 + 1);
                    Ok(())
                })
                .expect("Failed to submit job");
            }
            lane.shutdown().expect("Failed to shut down lane");
        });
    });
}

criterion_group!(benches, benchmark_queue, benchmark_open, benchmark_lane);
criterion_main!(benches);
