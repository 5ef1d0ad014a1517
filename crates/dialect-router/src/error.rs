//! Routing errors.
//!
//! The router adds no failure modes of its own; everything it can
//! report is already in the adapter or core taxonomies. A routing dead
//! end (no registered adapter can take the job) surfaces as the
//! adapters' own `BackendUnavailable`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] dialect_backend::Error),

    #[error(transparent)]
    Core(#[from] dialect_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
