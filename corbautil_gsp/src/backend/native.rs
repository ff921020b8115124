//! Native backends: `parking_lot` mutexes and condition variables
//!
//! The mutex guard is the token, so the lock is held for the whole scoped
//! operation. Counts change on release, after the caller's work is done,
//! and waiters are woken once the lock has been dropped.

use super::{BoundedProdConsBackend, MutexBackend, ProdConsBackend, RwBackend};
use parking_lot::{Condvar, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct NativeMutex {
    lock: Mutex<()>,
}

impl MutexBackend for NativeMutex {
    type Token<'a> = MutexGuard<'a, ()>
    where
        Self: 'a;

    fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    fn release<'a>(&'a self, token: MutexGuard<'a, ()>) {
        drop(token);
    }
}

#[derive(Debug, Default)]
pub struct NativeProdCons {
    items: Mutex<usize>,
    not_empty: Condvar,
}

impl ProdConsBackend for NativeProdCons {
    type Token<'a> = MutexGuard<'a, usize>
    where
        Self: 'a;

    fn acquire_put(&self) -> MutexGuard<'_, usize> {
        self.items.lock()
    }

    fn release_put<'a>(&'a self, mut items: MutexGuard<'a, usize>) {
        *items += 1;
        drop(items);
        self.not_empty.notify_one();
    }

    fn acquire_get(&self) -> MutexGuard<'_, usize> {
        let mut items = self.items.lock();
        while *items == 0 {
            trace_wait!("prodcons get waiting for an item");
            self.not_empty.wait(&mut items);
        }
        items
    }

    fn release_get<'a>(&'a self, mut items: MutexGuard<'a, usize>) {
        *items -= 1;
    }

    fn acquire_other(&self) -> MutexGuard<'_, usize> {
        self.items.lock()
    }

    fn release_other<'a>(&'a self, items: MutexGuard<'a, usize>) {
        drop(items);
    }
}

#[derive(Debug)]
pub struct NativeBoundedProdCons {
    items: Mutex<usize>,
    capacity: usize,
    not_empty: Condvar,
    not_full: Condvar,
}

impl BoundedProdConsBackend for NativeBoundedProdCons {
    type Token<'a> = MutexGuard<'a, usize>
    where
        Self: 'a;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Mutex::new(0),
            capacity,
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn acquire_put(&self) -> MutexGuard<'_, usize> {
        let mut items = self.items.lock();
        while *items == self.capacity {
            trace_wait!("bounded put waiting for a free slot");
            self.not_full.wait(&mut items);
        }
        items
    }

    fn release_put<'a>(&'a self, mut items: MutexGuard<'a, usize>) {
        *items += 1;
        drop(items);
        self.not_empty.notify_one();
    }

    fn acquire_get(&self) -> MutexGuard<'_, usize> {
        let mut items = self.items.lock();
        while *items == 0 {
            trace_wait!("bounded get waiting for an item");
            self.not_empty.wait(&mut items);
        }
        items
    }

    fn release_get<'a>(&'a self, mut items: MutexGuard<'a, usize>) {
        *items -= 1;
        drop(items);
        self.not_full.notify_one();
    }

    fn acquire_other(&self) -> MutexGuard<'_, usize> {
        self.items.lock()
    }

    fn release_other<'a>(&'a self, items: MutexGuard<'a, usize>) {
        drop(items);
    }
}

#[derive(Debug, Default)]
struct RwState {
    readers: usize,
    writer: bool,
    readers_waiting: usize,
    writers_waiting: usize,
}

/// Logical readers-writer lock; the inner mutex is held only while the
/// counters change
#[derive(Debug, Default)]
pub struct NativeRw {
    state: Mutex<RwState>,
    read_cond: Condvar,
    write_cond: Condvar,
}

impl NativeRw {
    /// Threads currently blocked, as (readers, writers)
    pub fn waiters(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.readers_waiting, state.writers_waiting)
    }
}

impl RwBackend for NativeRw {
    type Token<'a> = ()
    where
        Self: 'a;

    fn acquire_read(&self) {
        let mut state = self.state.lock();
        if state.writer {
            state.readers_waiting += 1;
            while state.writer {
                trace_wait!("rw reader waiting for writer to leave");
                self.read_cond.wait(&mut state);
            }
            state.readers_waiting -= 1;
        }
        state.readers += 1;
    }

    fn release_read<'a>(&'a self, _token: ()) {
        let mut state = self.state.lock();
        state.readers -= 1;
        if state.readers == 0 && state.writers_waiting > 0 {
            self.write_cond.notify_one();
        }
    }

    fn acquire_write(&self) {
        let mut state = self.state.lock();
        if state.writer || state.readers > 0 {
            state.writers_waiting += 1;
            while state.writer || state.readers > 0 {
                trace_wait!("rw writer waiting for exclusive access");
                self.write_cond.wait(&mut state);
            }
            state.writers_waiting -= 1;
        }
        state.writer = true;
    }

    fn release_write<'a>(&'a self, _token: ()) {
        let mut state = self.state.lock();
        debug_assert!(state.writer);
        state.writer = false;
        if state.readers_waiting > 0 {
            self.read_cond.notify_all();
        } else if state.writers_waiting > 0 {
            self.write_cond.notify_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_counts_change_on_release() {
        let backend = NativeBoundedProdCons::with_capacity(2);

        let token = backend.acquire_put();
        assert_eq!(*token, 0);
        backend.release_put(token);

        let token = backend.acquire_other();
        assert_eq!(*token, 1);
        backend.release_other(token);

        let token = backend.acquire_get();
        backend.release_get(token);
        assert_eq!(*backend.acquire_other(), 0);
    }

    #[test]
    fn test_rw_counters() {
        let backend = NativeRw::default();
        backend.acquire_read();
        backend.acquire_read();
        assert_eq!(backend.state.lock().readers, 2);
        backend.release_read(());
        backend.release_read(());

        backend.acquire_write();
        assert!(backend.state.lock().writer);
        backend.release_write(());
        assert!(!backend.state.lock().writer);
    }
}
