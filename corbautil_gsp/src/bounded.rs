//! Bounded producer-consumer policy

use crate::backend::BoundedProdConsBackend;
use crate::error::GspError;
use crate::DefaultBoundedProdCons;

#[derive(Debug)]
pub struct BoundedProdCons<B: BoundedProdConsBackend = DefaultBoundedProdCons> {
    backend: B,
}

impl<B: BoundedProdConsBackend> BoundedProdCons<B> {
    /// Creates a policy for a buffer holding at most `capacity` items
    pub fn new(capacity: usize) -> Result<Self, GspError> {
        if capacity == 0 {
            return Err(GspError::ZeroCapacity);
        }
        Ok(Self {
            backend: B::with_capacity(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.backend.capacity()
    }

    /// Waits for a free slot; the item counts once the guard drops
    pub fn put(&self) -> PutOp<'_, B> {
        PutOp {
            backend: &self.backend,
            token: Some(self.backend.acquire_put()),
        }
    }

    /// Waits for an item; the slot frees once the guard drops
    pub fn get(&self) -> GetOp<'_, B> {
        GetOp {
            backend: &self.backend,
            token: Some(self.backend.acquire_get()),
        }
    }

    pub fn other(&self) -> OtherOp<'_, B> {
        OtherOp {
            backend: &self.backend,
            token: Some(self.backend.acquire_other()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

scoped_op!(PutOp, BoundedProdConsBackend, release_put);
scoped_op!(GetOp, BoundedProdConsBackend, release_get);
scoped_op!(OtherOp, BoundedProdConsBackend, release_other);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyBoundedProdCons;
    use crate::backend::native::NativeBoundedProdCons;
    use crate::backend::semaphore::SemaphoreBoundedProdCons;
    use std::collections::VecDeque;
    use std::sync::{mpsc, Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    /// Thread A puts twice into a one-slot buffer; the second put completes
    /// only after thread B takes the first item.
    fn second_put_waits_for_get<B>()
    where
        B: BoundedProdConsBackend + Send + Sync + 'static,
    {
        let queue = Arc::new(BoundedProdCons::<B>::new(1).unwrap());
        let buffer = Arc::new(Mutex::new(VecDeque::new()));
        let (put_tx, put_rx) = mpsc::channel();

        let producer = {
            let queue = Arc::clone(&queue);
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for item in 1..=2 {
                    let put = queue.put();
                    buffer.lock().unwrap().push_back(item);
                    drop(put);
                    put_tx.send(item).unwrap();
                }
            })
        };

        assert_eq!(put_rx.recv_timeout(Duration::from_secs(5)).unwrap(), 1);
        assert!(put_rx.recv_timeout(Duration::from_millis(100)).is_err());

        let taken = {
            let _get = queue.get();
            buffer.lock().unwrap().pop_front()
        };
        assert_eq!(taken, Some(1));

        assert_eq!(put_rx.recv_timeout(Duration::from_secs(5)).unwrap(), 2);
        producer.join().unwrap();
        assert_eq!(buffer.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_native_second_put_waits_for_get() {
        second_put_waits_for_get::<NativeBoundedProdCons>();
    }

    #[test]
    fn test_semaphore_second_put_waits_for_get() {
        second_put_waits_for_get::<SemaphoreBoundedProdCons>();
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = BoundedProdCons::<NativeBoundedProdCons>::new(0);
        assert_eq!(result.unwrap_err(), GspError::ZeroCapacity);
    }

    #[test]
    fn test_count_stays_within_capacity() {
        let queue = Arc::new(BoundedProdCons::<NativeBoundedProdCons>::new(3).unwrap());
        let buffer = Arc::new(Mutex::new(VecDeque::new()));

        let producers: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for item in 0..50 {
                        let _put = queue.put();
                        let mut buffer = buffer.lock().unwrap();
                        buffer.push_back(item);
                        assert!(buffer.len() <= 3);
                    }
                })
            })
            .collect();

        let consumer = {
            let queue = Arc::clone(&queue);
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for _ in 0..150 {
                    let _get = queue.get();
                    assert!(buffer.lock().unwrap().pop_front().is_some());
                }
            })
        };

        for producer in producers {
            producer.join().unwrap();
        }
        consumer.join().unwrap();
        assert!(buffer.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dummy_capacity_and_count() {
        let queue = BoundedProdCons::<DummyBoundedProdCons>::new(2).unwrap();
        assert_eq!(queue.capacity(), 2);
        drop(queue.put());
        drop(queue.put());
        assert_eq!(queue.backend().items(), 2);
        drop(queue.get());
        assert_eq!(queue.backend().items(), 1);
    }

    #[test]
    #[should_panic(expected = "full buffer")]
    fn test_dummy_put_on_full_panics() {
        let queue = BoundedProdCons::<DummyBoundedProdCons>::new(1).unwrap();
        drop(queue.put());
        let _put = queue.put();
    }
}
