//! Counting-semaphore backend for the bounded producer-consumer policy
//!
//! Two semaphores track free slots and queued items; a plain mutex gives the
//! operations mutual exclusion. Waiting happens on the semaphores before the
//! mutex is taken, so a blocked producer never holds the lock.

use super::BoundedProdConsBackend;
use parking_lot::{Condvar, Mutex, MutexGuard};

/// Counting semaphore built on a mutex-protected counter
#[derive(Debug, Default)]
pub struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Blocks until a permit is available, then takes it
    pub fn wait(&self) {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            trace_wait!("semaphore waiting for a permit");
            self.available.wait(&mut permits);
        }
        *permits -= 1;
    }

    pub fn try_wait(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    pub fn post(&self) {
        let mut permits = self.permits.lock();
        *permits += 1;
        drop(permits);
        self.available.notify_one();
    }

    pub fn available(&self) -> usize {
        *self.permits.lock()
    }
}

#[derive(Debug)]
pub struct SemaphoreBoundedProdCons {
    lock: Mutex<()>,
    items: Semaphore,
    free: Semaphore,
    capacity: usize,
}

impl SemaphoreBoundedProdCons {
    /// Items currently queued
    pub fn queued(&self) -> usize {
        self.items.available()
    }
}

impl BoundedProdConsBackend for SemaphoreBoundedProdCons {
    type Token<'a> = MutexGuard<'a, ()>
    where
        Self: 'a;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            lock: Mutex::new(()),
            items: Semaphore::new(0),
            free: Semaphore::new(capacity),
            capacity,
        }
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn acquire_put(&self) -> MutexGuard<'_, ()> {
        self.free.wait();
        self.lock.lock()
    }

    fn release_put<'a>(&'a self, token: MutexGuard<'a, ()>) {
        drop(token);
        self.items.post();
    }

    fn acquire_get(&self) -> MutexGuard<'_, ()> {
        self.items.wait();
        self.lock.lock()
    }

    fn release_get<'a>(&'a self, token: MutexGuard<'a, ()>) {
        drop(token);
        self.free.post();
    }

    fn acquire_other(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    fn release_other<'a>(&'a self, token: MutexGuard<'a, ()>) {
        drop(token);
    }
}
