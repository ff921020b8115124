//! Dummy backends for single-threaded builds
//!
//! Nothing blocks. Each backend tracks just enough state to detect a caller
//! that would have deadlocked or over-run the buffer, and panics when it
//! sees one. The types hold `Cell`s, so they are neither `Sync` nor usable
//! across threads.

use super::{BoundedProdConsBackend, MutexBackend, ProdConsBackend, RwBackend};
use std::cell::Cell;

#[derive(Debug, Default)]
pub struct DummyMutex {
    in_critical_section: Cell<bool>,
}

impl MutexBackend for DummyMutex {
    type Token<'a> = ()
    where
        Self: 'a;

    fn acquire(&self) {
        assert!(
            !self.in_critical_section.get(),
            "mutex re-entered while already held"
        );
        self.in_critical_section.set(true);
    }

    fn release<'a>(&'a self, _token: ()) {
        self.in_critical_section.set(false);
    }
}

#[derive(Debug, Default)]
pub struct DummyProdCons {
    in_critical_section: Cell<bool>,
    items: Cell<usize>,
}

impl DummyProdCons {
    fn enter(&self) {
        assert!(
            !self.in_critical_section.get(),
            "producer-consumer operation re-entered while already held"
        );
        self.in_critical_section.set(true);
    }

    pub fn items(&self) -> usize {
        self.items.get()
    }
}

impl ProdConsBackend for DummyProdCons {
    type Token<'a> = ()
    where
        Self: 'a;

    fn acquire_put(&self) {
        self.enter();
        self.items.set(self.items.get() + 1);
    }

    fn release_put<'a>(&'a self, _token: ()) {
        self.in_critical_section.set(false);
    }

    fn acquire_get(&self) {
        self.enter();
        let items = self.items.get();
        assert!(items > 0, "get on an empty buffer would block forever");
        self.items.set(items - 1);
    }

    fn release_get<'a>(&'a self, _token: ()) {
        self.in_critical_section.set(false);
    }

    fn acquire_other(&self) {
        self.enter();
    }

    fn release_other<'a>(&'a self, _token: ()) {
        self.in_critical_section.set(false);
    }
}

#[derive(Debug)]
pub struct DummyBoundedProdCons {
    inner: DummyProdCons,
    capacity: usize,
}

impl DummyBoundedProdCons {
    pub fn items(&self) -> usize {
        self.inner.items()
    }
}

impl BoundedProdConsBackend for DummyBoundedProdCons {
    type Token<'a> = ()
    where
        Self: 'a;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: DummyProdCons::default(),
            capacity,
        }
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn acquire_put(&self) {
        assert!(
            self.inner.items() < self.capacity,
            "put on a full buffer would block forever"
        );
        self.inner.acquire_put();
    }

    fn release_put<'a>(&'a self, _token: ()) {
        self.inner.release_put(());
    }

    fn acquire_get(&self) {
        self.inner.acquire_get();
    }

    fn release_get<'a>(&'a self, _token: ()) {
        self.inner.release_get(());
    }

    fn acquire_other(&self) {
        self.inner.acquire_other();
    }

    fn release_other<'a>(&'a self, _token: ()) {
        self.inner.release_other(());
    }
}

#[derive(Debug, Default)]
pub struct DummyRw {
    readers: Cell<usize>,
    writer: Cell<bool>,
}

impl RwBackend for DummyRw {
    type Token<'a> = ()
    where
        Self: 'a;

    fn acquire_read(&self) {
        assert!(!self.writer.get(), "read requested while writing");
        self.readers.set(self.readers.get() + 1);
    }

    fn release_read<'a>(&'a self, _token: ()) {
        self.readers.set(self.readers.get() - 1);
    }

    fn acquire_write(&self) {
        assert!(
            !self.writer.get() && self.readers.get() == 0,
            "write requested while the lock is held"
        );
        self.writer.set(true);
    }

    fn release_write<'a>(&'a self, _token: ()) {
        self.writer.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_prodcons_counts_on_entry() {
        let backend = DummyProdCons::default();
        backend.acquire_put();
        assert_eq!(backend.items(), 1);
        backend.release_put(());

        backend.acquire_get();
        assert_eq!(backend.items(), 0);
        backend.release_get(());
    }

    #[test]
    #[should_panic(expected = "re-entered")]
    fn test_dummy_mutex_reentry_panics() {
        let backend = DummyMutex::default();
        backend.acquire();
        backend.acquire();
    }

    #[test]
    #[should_panic(expected = "empty buffer")]
    fn test_dummy_get_on_empty_panics() {
        DummyProdCons::default().acquire_get();
    }

    #[test]
    #[should_panic(expected = "full buffer")]
    fn test_dummy_bounded_overrun_panics() {
        let backend = DummyBoundedProdCons::with_capacity(1);
        backend.acquire_put();
        backend.release_put(());
        backend.acquire_put();
    }

    #[test]
    fn test_dummy_rw_allows_many_readers() {
        let backend = DummyRw::default();
        backend.acquire_read();
        backend.acquire_read();
        backend.release_read(());
        backend.release_read(());
        backend.acquire_write();
        backend.release_write(());
    }

    #[test]
    #[should_panic(expected = "while writing")]
    fn test_dummy_read_during_write_panics() {
        let backend = DummyRw::default();
        backend.acquire_write();
        backend.acquire_read();
    }
}
