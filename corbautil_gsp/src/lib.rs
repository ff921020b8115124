//! # GSP - Generic Synchronization Policies
//!
//! Scoped synchronization for mutex, producer-consumer, bounded
//! producer-consumer and readers-writer patterns. Each policy is generic over
//! a backend; entering an operation returns a guard and dropping the guard
//! leaves it, on every exit path.
//!
//! ```
//! use corbautil_gsp::BoundedProdCons;
//!
//! let queue: BoundedProdCons = BoundedProdCons::new(4).unwrap();
//! {
//!     let _put = queue.put();
//!     // push the item into the caller's buffer here
//! }
//! let _get = queue.get();
//! ```
//!
//! The `single-threaded` feature swaps the default backends for the
//! assertion-checked dummies.

macro_rules! trace_wait {
    ($($arg:tt)+) => {
        #[cfg(feature = "logging")]
        log::trace!($($arg)+);
    };
}

macro_rules! scoped_op {
    ($name:ident, $backend:ident, $release:ident) => {
        #[must_use = "the operation ends as soon as the guard is dropped"]
        pub struct $name<'a, B: $backend + 'a> {
            backend: &'a B,
            token: Option<B::Token<'a>>,
        }

        impl<B: $backend> Drop for $name<'_, B> {
            fn drop(&mut self) {
                if let Some(token) = self.token.take() {
                    self.backend.$release(token);
                }
            }
        }

        impl<B: $backend> std::fmt::Debug for $name<'_, B> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name)).finish_non_exhaustive()
            }
        }
    };
}

pub mod backend;
pub mod bounded;
pub mod error;
pub mod mutex;
pub mod prodcons;
pub mod rw;

#[cfg(not(feature = "single-threaded"))]
mod defaults {
    pub type DefaultMutex = crate::backend::native::NativeMutex;
    pub type DefaultProdCons = crate::backend::native::NativeProdCons;
    pub type DefaultBoundedProdCons = crate::backend::native::NativeBoundedProdCons;
    pub type DefaultRw = crate::backend::native::NativeRw;
}

#[cfg(feature = "single-threaded")]
mod defaults {
    pub type DefaultMutex = crate::backend::dummy::DummyMutex;
    pub type DefaultProdCons = crate::backend::dummy::DummyProdCons;
    pub type DefaultBoundedProdCons = crate::backend::dummy::DummyBoundedProdCons;
    pub type DefaultRw = crate::backend::dummy::DummyRw;
}

pub use defaults::{DefaultBoundedProdCons, DefaultMutex, DefaultProdCons, DefaultRw};

pub use bounded::BoundedProdCons;
pub use error::GspError;
pub use mutex::GspMutex;
pub use prodcons::ProdCons;
pub use rw::Rw;

pub mod prelude {
    pub use crate::backend::{BoundedProdConsBackend, MutexBackend, ProdConsBackend, RwBackend};
    pub use crate::{BoundedProdCons, GspError, GspMutex, ProdCons, Rw};
}
