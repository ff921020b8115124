//! Unbounded producer-consumer policy

use crate::backend::ProdConsBackend;
use crate::DefaultProdCons;

#[derive(Debug, Default)]
pub struct ProdCons<B: ProdConsBackend = DefaultProdCons> {
    backend: B,
}

impl<B: ProdConsBackend + Default> ProdCons<B> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: ProdConsBackend> ProdCons<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Adds one item when the guard drops
    pub fn put(&self) -> PutOp<'_, B> {
        PutOp {
            backend: &self.backend,
            token: Some(self.backend.acquire_put()),
        }
    }

    /// Waits for an item; it is consumed when the guard drops
    pub fn get(&self) -> GetOp<'_, B> {
        GetOp {
            backend: &self.backend,
            token: Some(self.backend.acquire_get()),
        }
    }

    /// Exclusive access without touching the count
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

scoped_op!(PutOp, ProdConsBackend, release_put);
scoped_op!(GetOp, ProdConsBackend, release_get);
scoped_op!(OtherOp, ProdConsBackend, release_other);
