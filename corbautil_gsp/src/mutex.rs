//! Mutual exclusion policy

use crate::backend::MutexBackend;
use crate::DefaultMutex;

/// Non-recursive mutex whose critical sections are [`Op`] guards
#[derive(Debug, Default)]
pub struct GspMutex<B: MutexBackend = DefaultMutex> {
    backend: B,
}

impl<B: MutexBackend + Default> GspMutex<B> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: MutexBackend> GspMutex<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Enters the critical section; it ends when the guard drops
    pub fn op(&self) -> Op<'_, B> {
        Op {
            backend: &self.backend,
            token: Some(self.backend.acquire()),
        }
    }

    /// Runs `f` inside the critical section
    pub fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        let _op = self.op();
        f()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

scoped_op!(Op, MutexBackend, release);
