//! Readers-writer policy

use crate::backend::RwBackend;
use crate::DefaultRw;

#[derive(Debug, Default)]
pub struct Rw<B: RwBackend = DefaultRw> {
    backend: B,
}

impl<B: RwBackend + Default> Rw<B> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: RwBackend> Rw<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Shared access; waits while a writer is active
    pub fn read(&self) -> ReadOp<'_, B> {
        ReadOp {
            backend: &self.backend,
            token: Some(self.backend.acquire_read()),
        }
    }

    /// Exclusive access; waits while anyone holds the lock
    pub fn write(&self) -> WriteOp<'_, B> {
        WriteOp {
            backend: &self.backend,
            token: Some(self.backend.acquire_write()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

scoped_op!(ReadOp, RwBackend, release_read);
scoped_op!(WriteOp, RwBackend, release_write);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyRw;
    use crate::backend::native::NativeRw;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_writer_waits_for_readers() {
        let rw = Arc::new(Rw::<NativeRw>::new());
        let read = rw.read();
        let (tx, rx) = mpsc::channel();

        let writer = {
            let rw = Arc::clone(&rw);
            thread::spawn(move || {
                let _write = rw.write();
                tx.send(()).unwrap();
            })
        };

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        drop(read);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        writer.join().unwrap();
    }

    #[test]
    fn test_readers_share_access() {
        let rw = Rw::<NativeRw>::new();
        let first = rw.read();
        let second = rw.read();
        drop(first);
        drop(second);
        let _write = rw.write();
    }

    #[test]
    fn test_readers_and_writer_never_overlap() {
        let rw = Arc::new(Rw::<NativeRw>::new());
        let readers = Arc::new(AtomicUsize::new(0));
        let writing = Arc::new(AtomicBool::new(false));

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let rw = Arc::clone(&rw);
                let readers = Arc::clone(&readers);
                let writing = Arc::clone(&writing);
                thread::spawn(move || {
                    for _ in 0..100 {
                        if i % 3 == 0 {
                            let _write = rw.write();
                            assert_eq!(readers.load(Ordering::SeqCst), 0);
                            assert!(!writing.swap(true, Ordering::SeqCst));
                            writing.store(false, Ordering::SeqCst);
                        } else {
                            let _read = rw.read();
                            readers.fetch_add(1, Ordering::SeqCst);
                            assert!(!writing.load(Ordering::SeqCst));
                            readers.fetch_sub(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    fn wait_for_waiters(rw: &Rw<NativeRw>, expected: (usize, usize)) {
        for _ in 0..5_000 {
            if rw.backend().waiters() == expected {
                return;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("waiters never reached {:?}", expected);
    }

    #[test]
    fn test_writer_exit_prefers_waiting_readers() {
        let rw = Arc::new(Rw::<NativeRw>::new());
        let order = Arc::new(Mutex::new(Vec::new()));
        let write = rw.write();

        let reader = {
            let rw = Arc::clone(&rw);
            let order = Arc::clone(&order);
            thread::spawn(move || {
                let _read = rw.read();
                order.lock().unwrap().push("reader");
            })
        };
        wait_for_waiters(&rw, (1, 0));

        let writer = {
            let rw = Arc::clone(&rw);
            let order = Arc::clone(&order);
            thread::spawn(move || {
                let _write = rw.write();
                order.lock().unwrap().push("writer");
            })
        };
        wait_for_waiters(&rw, (1, 1));

        drop(write);
        reader.join().unwrap();
        writer.join().unwrap();

        assert_eq!(*order.lock().unwrap(), vec!["reader", "writer"]);
    }

    #[test]
    fn test_last_reader_out_wakes_writer() {
        let rw = Arc::new(Rw::<NativeRw>::new());
        let first = rw.read();
        let second = rw.read();
        let (tx, rx) = mpsc::channel();

        let writer = {
            let rw = Arc::clone(&rw);
            thread::spawn(move || {
                let _write = rw.write();
                tx.send(()).unwrap();
            })
        };
        wait_for_waiters(&rw, (0, 1));

        drop(first);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(rw.backend().waiters(), (0, 1));

        drop(second);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        writer.join().unwrap();
    }

    #[test]
    #[should_panic(expected = "while the lock is held")]
    fn test_dummy_write_during_read_panics() {
        let rw = Rw::<DummyRw>::new();
        let _read = rw.read();
        let _write = rw.write();
    }
}
