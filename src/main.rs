/*!
 * Handoff Demo - Main Entry Point
 *
 * Wires producers and consumers around both queue flavours:
 * - a job queue of boxed closures drained by one consumer
 * - a keyed queue shared by two consumers, each bound to its own key
 */

use anyhow::{anyhow, Context};
use handoff_queue::monitoring::{generate_trace_id, span_worker};
use handoff_queue::{init_tracing, BlockingQueue, KeyedBlockingQueue, PopOutcome, ShutdownFlag};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

type Job = Box<dyn FnOnce() + Send>;

const KEYS: [&str; 2] = ["A", "B"];

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let items: usize = env_or("HANDOFF_ITEMS", 1000);
    let pop_timeout = Duration::from_millis(env_or("HANDOFF_POP_TIMEOUT_MS", 1000));
    let trace_id = generate_trace_id();

    info!(items, timeout_ms = pop_timeout.as_millis() as u64, trace_id = %trace_id, "Handoff demo starting");

    let shutdown = ShutdownFlag::new();

    run_jobs(&shutdown, items, pop_timeout, &trace_id)?;
    run_keyed(&shutdown, items, pop_timeout, &trace_id)?;

    shutdown.trigger();
    info!("Handoff demo finished");
    Ok(())
}

fn run_jobs(
    shutdown: &ShutdownFlag,
    items: usize,
    pop_timeout: Duration,
    trace_id: &str,
) -> anyhow::Result<()> {
    let queue: Arc<BlockingQueue<Job>> = Arc::new(BlockingQueue::new(shutdown.clone()));
    let executed = Arc::new(AtomicUsize::new(0));

    let consumer = {
        let queue = queue.clone();
        let shutdown = shutdown.clone();
        let trace_id = trace_id.to_string();
        thread::Builder::new()
            .name("job-consumer".into())
            .spawn(move || {
                let span = span_worker("consumer", None, &trace_id);
                let _entered = span.enter();

                // A quiet queue means the producer is done
                while !shutdown.is_triggered() {
                    match queue.try_pop(pop_timeout) {
                        PopOutcome::Delivered(job) => job(),
                        PopOutcome::TimedOut | PopOutcome::ShuttingDown => break,
                    }
                }
            })
            .context("spawning job consumer")?
    };

    let producer = {
        let queue = queue.clone();
        let executed = executed.clone();
        let trace_id = trace_id.to_string();
        thread::Builder::new()
            .name("job-producer".into())
            .spawn(move || {
                let span = span_worker("producer", None, &trace_id);
                let _entered = span.enter();

                for i in 0..items {
                    let executed = executed.clone();
                    queue.push(Box::new(move || {
                        debug!(job = i, "Running job");
                        executed.fetch_add(1, Ordering::Relaxed);
                    }));
                }
            })
            .context("spawning job producer")?
    };

    producer.join().map_err(|_| anyhow!("job producer panicked"))?;
    consumer.join().map_err(|_| anyhow!("job consumer panicked"))?;

    let executed = executed.load(Ordering::Relaxed);
    info!(
        executed,
        stats = %serde_json::to_string(&queue.stats())?,
        "Job queue drained"
    );
    if executed != items {
        return Err(anyhow!("executed {} of {} jobs", executed, items));
    }
    Ok(())
}

fn run_keyed(
    shutdown: &ShutdownFlag,
    items: usize,
    pop_timeout: Duration,
    trace_id: &str,
) -> anyhow::Result<()> {
    let queue: Arc<KeyedBlockingQueue<&'static str, usize>> =
        Arc::new(KeyedBlockingQueue::new(shutdown.clone()));

    let consumers = KEYS
        .iter()
        .map(|&key| {
            let queue = queue.clone();
            let shutdown = shutdown.clone();
            let trace_id = trace_id.to_string();
            thread::Builder::new()
                .name(format!("consumer-{}", key))
                .spawn(move || {
                    let span = span_worker("consumer", Some(key), &trace_id);
                    let _entered = span.enter();

                    let mut received = Vec::new();
                    while !shutdown.is_triggered() {
                        match queue.try_pop(pop_timeout, key) {
                            PopOutcome::Delivered(value) => received.push(value),
                            PopOutcome::TimedOut | PopOutcome::ShuttingDown => break,
                        }
                    }
                    received
                })
                .with_context(|| format!("spawning consumer for key {}", key))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    for i in 0..items {
        queue.push(KEYS[i % KEYS.len()], i);
    }

    for (key, consumer) in KEYS.iter().zip(consumers) {
        let received = consumer
            .join()
            .map_err(|_| anyhow!("consumer for key {} panicked", key))?;

        let in_order = received.windows(2).all(|w| w[0] < w[1]);
        if !in_order {
            warn!(key, "Per-key order violated");
        }
        info!(key, received = received.len(), in_order, "Keyed consumer finished");
    }

    info!(stats = %serde_json::to_string(&queue.stats())?, "Keyed queue drained");
    if !queue.is_empty() {
        return Err(anyhow!("{} keyed items left undelivered", queue.len()));
    }
    Ok(())
}
