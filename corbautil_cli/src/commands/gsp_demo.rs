//! `corbautil gsp-demo`: producers and consumers sharing a bounded buffer

use clap::ValueEnum;
use corbautil_gsp::backend::dummy::DummyBoundedProdCons;
use corbautil_gsp::backend::native::NativeBoundedProdCons;
use corbautil_gsp::backend::semaphore::SemaphoreBoundedProdCons;
use corbautil_gsp::backend::BoundedProdConsBackend;
use corbautil_gsp::BoundedProdCons;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoBackend {
    Native,
    Semaphore,
    /// Runs on the calling thread only
    Dummy,
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub backend: DemoBackend,
    pub capacity: usize,
    pub items: usize,
    pub threads: usize,
}

#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub backend: DemoBackend,
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub produced: usize,
    pub consumed: usize,
    /// Largest buffer length seen inside a put
    pub max_buffered: usize,
    pub elapsed_ms: u128,
}

pub fn run_gsp_demo(config: &DemoConfig) -> Result<DemoReport, Box<dyn Error>> {
    match config.backend {
        DemoBackend::Native => run_threaded::<NativeBoundedProdCons>(config),
        DemoBackend::Semaphore => run_threaded::<SemaphoreBoundedProdCons>(config),
        DemoBackend::Dummy => run_single_threaded(config),
    }
}

struct Shared<B: BoundedProdConsBackend> {
    queue: BoundedProdCons<B>,
    buffer: Mutex<VecDeque<usize>>,
    max_buffered: AtomicUsize,
    consumed: AtomicUsize,
}

impl<B: BoundedProdConsBackend> Shared<B> {
    fn produce(&self, item: usize) {
        let _put = self.queue.put();
        let mut buffer = self.buffer.lock();
        buffer.push_back(item);
        self.max_buffered.fetch_max(buffer.len(), Ordering::Relaxed);
    }

    fn consume(&self) {
        let _get = self.queue.get();
        if self.buffer.lock().pop_front().is_some() {
            self.consumed.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Split `total` into `parts` shares that differ by at most one
fn shares(total: usize, parts: usize) -> Vec<usize> {
    (0..parts)
        .map(|i| total / parts + usize::from(i < total % parts))
        .collect()
}

fn run_threaded<B>(config: &DemoConfig) -> Result<DemoReport, Box<dyn Error>>
where
    B: BoundedProdConsBackend + Send + Sync + 'static,
{
    let threads = config.threads.max(2);
    let producers = threads / 2;
    let consumers = threads - producers;

    let shared = Arc::new(Shared {
        queue: BoundedProdCons::<B>::new(config.capacity)?,
        buffer: Mutex::new(VecDeque::with_capacity(config.capacity)),
        max_buffered: AtomicUsize::new(0),
        consumed: AtomicUsize::new(0),
    });

    log::info!(
        "gsp demo: {} producers, {} consumers, capacity {}",
        producers,
        consumers,
        config.capacity
    );
    let start = Instant::now();

    let mut handles = Vec::with_capacity(threads);
    for count in shares(config.items, producers) {
        let shared = Arc::clone(&shared);
        handles.push(thread::spawn(move || {
            for item in 0..count {
                shared.produce(item);
            }
        }));
    }
    for count in shares(config.items, consumers) {
        let shared = Arc::clone(&shared);
        handles.push(thread::spawn(move || {
            for _ in 0..count {
                shared.consume();
            }
        }));
    }

    for handle in handles {
        handle
            .join()
            .map_err(|_| "gsp demo worker thread panicked")?;
    }

    Ok(DemoReport {
        backend: config.backend,
        capacity: config.capacity,
        producers,
        consumers,
        produced: config.items,
        consumed: shared.consumed.load(Ordering::Relaxed),
        max_buffered: shared.max_buffered.load(Ordering::Relaxed),
        elapsed_ms: start.elapsed().as_millis(),
    })
}

fn run_single_threaded(config: &DemoConfig) -> Result<DemoReport, Box<dyn Error>> {
    let shared = Shared {
        queue: BoundedProdCons::<DummyBoundedProdCons>::new(config.capacity)?,
        buffer: Mutex::new(VecDeque::with_capacity(config.capacity)),
        max_buffered: AtomicUsize::new(0),
        consumed: AtomicUsize::new(0),
    };

    let start = Instant::now();
    let mut produced = 0;
    while produced < config.items {
        let batch = config.capacity.min(config.items - produced);
        for item in 0..batch {
            shared.produce(produced + item);
        }
        for _ in 0..batch {
            shared.consume();
        }
        produced += batch;
    }

    Ok(DemoReport {
        backend: config.backend,
        capacity: config.capacity,
        producers: 1,
        consumers: 1,
        produced,
        consumed: shared.consumed.load(Ordering::Relaxed),
        max_buffered: shared.max_buffered.load(Ordering::Relaxed),
        elapsed_ms: start.elapsed().as_millis(),
    })
}
