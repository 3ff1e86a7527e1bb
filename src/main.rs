use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use string_queue::{ArenaQueue, LinkedQueue, StringQueue};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = BenchConfig::parse();
    match config.queue {
        QueueKind::Linked => benchmark_mixed(LinkedQueue::new(), &config),
        QueueKind::Arena => benchmark_mixed(ArenaQueue::new(), &config),
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QueueKind {
    Linked,
    Arena,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct BenchConfig {
    /// queue implementation to run against.
    #[arg(long, value_enum, default_value_t = QueueKind::Linked)]
    queue: QueueKind,
    /// number of elements to add to the queue before starting the timed
    /// phase.
    #[arg(long, default_value_t = 0)]
    prefill: usize,
    /// number of random operations in the timed phase.
    #[arg(long, default_value_t = 1_000_000)]
    operations: usize,
    /// length of every inserted string.
    #[arg(long, default_value_t = 16)]
    payload_len: usize,
    /// capacity of the buffer removed strings are copied into.
    #[arg(long, default_value_t = 32)]
    buffer_len: usize,
    /// seed for the operation mix, random if not given.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Default, Debug)]
struct OpCounts {
    inserts: usize,
    removes: usize,
    empty_removes: usize,
    reverses: usize,
    failed_inserts: usize,
}

fn benchmark_mixed<Q: StringQueue>(mut queue: Q, config: &BenchConfig) {
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        queue = ?config.queue,
        seed,
        prefill = config.prefill,
        operations = config.operations,
        "starting benchmark"
    );
    let mut rng = StdRng::seed_from_u64(seed);
    let payload = "x".repeat(config.payload_len);
    let mut buffer = vec![0u8; config.buffer_len];
    let mut counts = OpCounts::default();

    for _ in 0..config.prefill {
        if queue.insert_tail(&payload).is_err() {
            counts.failed_inserts += 1;
        }
    }

    let start = Instant::now();
    for _ in 0..config.operations {
        match rng.gen_range(0..1000) {
            0 => {
                queue.reverse();
                counts.reverses += 1;
            }
            1..=333 => match queue.insert_head(&payload) {
                Ok(()) => counts.inserts += 1,
                Err(_) => counts.failed_inserts += 1,
            },
            334..=666 => match queue.insert_tail(&payload) {
                Ok(()) => counts.inserts += 1,
                Err(_) => counts.failed_inserts += 1,
            },
            _ => match queue.remove_head(Some(buffer.as_mut_slice())) {
                Ok(()) => counts.removes += 1,
                Err(_) => counts.empty_removes += 1,
            },
        }
    }
    let elapsed = start.elapsed();

    tracing::info!(?counts, size = queue.size(), ?elapsed, "benchmark finished");
    println!(
        "throughput: {}",
        config.operations as f64 / elapsed.as_secs_f64()
    );
    println!("final size: {}", queue.size());
    println!("number of inserts: {}", counts.inserts);
    println!("number of removes: {}", counts.removes);
    println!("number of empty removes: {}", counts.empty_removes);
    println!("number of reverses: {}", counts.reverses);
    if counts.failed_inserts > 0 {
        tracing::warn!(failed = counts.failed_inserts, "inserts failed to allocate");
    }
}
