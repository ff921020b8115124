//! Backend traits
//!
//! A backend owns the synchronization state of one policy. Acquiring returns
//! a token that is handed back on release; the front types in this crate wrap
//! the token in a guard so release happens on drop, including during
//! unwinding.
//!
//! Three families are provided:
//!
//! - [`native`]: `parking_lot` mutexes and condition variables
//! - [`semaphore`]: counting semaphores, bounded producer-consumer only
//! - [`dummy`]: single-threaded, never blocks, panics on misuse

pub mod dummy;
pub mod native;
pub mod semaphore;

/// Non-recursive mutual exclusion
pub trait MutexBackend {
    type Token<'a>
    where
        Self: 'a;

    fn acquire(&self) -> Self::Token<'_>;

    fn release<'a>(&'a self, token: Self::Token<'a>);
}

/// Unbounded producer-consumer
///
/// `put` is exclusive and counts one item on release. `get` waits for an
/// item and consumes it on release. `other` is plain exclusion.
pub trait ProdConsBackend {
    type Token<'a>
    where
        Self: 'a;

    fn acquire_put(&self) -> Self::Token<'_>;

    fn release_put<'a>(&'a self, token: Self::Token<'a>);

    fn acquire_get(&self) -> Self::Token<'_>;

    fn release_get<'a>(&'a self, token: Self::Token<'a>);

    fn acquire_other(&self) -> Self::Token<'_>;

    fn release_other<'a>(&'a self, token: Self::Token<'a>);
}

/// Producer-consumer over a buffer of fixed capacity
///
/// `put` additionally waits while the buffer is full. The item count stays
/// within `0..=capacity` at every acquire and release.
pub trait BoundedProdConsBackend {
    type Token<'a>
    where
        Self: 'a;

    /// `capacity` is non-zero; the front type checks it
    fn with_capacity(capacity: usize) -> Self;

    fn capacity(&self) -> usize;

    fn acquire_put(&self) -> Self::Token<'_>;

    fn release_put<'a>(&'a self, token: Self::Token<'a>);

    fn acquire_get(&self) -> Self::Token<'_>;

    fn release_get<'a>(&'a self, token: Self::Token<'a>);

    fn acquire_other(&self) -> Self::Token<'_>;

    fn release_other<'a>(&'a self, token: Self::Token<'a>);
}

/// Readers-writer lock
///
/// Readers wait while a writer holds the lock; a writer waits while anyone
/// holds it. A departing writer wakes every waiting reader, or one waiting
/// writer if no reader waits.
pub trait RwBackend {
    type Token<'a>
    where
        Self: 'a;

    fn acquire_read(&self) -> Self::Token<'_>;

    fn release_read<'a>(&'a self, token: Self::Token<'a>);

    fn acquire_write(&self) -> Self::Token<'_>;

    fn release_write<'a>(&'a self, token: Self::Token<'a>);
}
