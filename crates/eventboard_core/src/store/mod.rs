//! Record store contracts and flat-file implementation.
//!
//! # Responsibility
//! - Define the load/append/remove contract over the external record
//!   store.
//! - Keep line format and file locking details inside this boundary.
//!
//! # Invariants
//! - `load` materializes the full record set or fails; a single bad
//!   line aborts the whole load.
//! - Write paths validate records before touching the file and fsync
//!   before releasing the exclusive lock.

use crate::model::event::{EventRecord, EventValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod file_store;

pub use file_store::FlatFileStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure modes of the record store boundary.
#[derive(Debug)]
pub enum StoreError {
    /// The store could not be opened or read; retry next cycle.
    Unavailable(std::io::Error),
    /// A line failed to parse; the whole load is aborted.
    Malformed { line: usize, reason: String },
    /// Write-path rejection before any file mutation.
    Validation(EventValidationError),
    /// Removal target outside the stored record range (1-based).
    NotFound(usize),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "record store unavailable: {err}"),
            Self::Malformed { line, reason } => {
                write!(f, "malformed record at line {line}: {reason}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(position) => write!(f, "no record at position {position}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Malformed { .. } | Self::NotFound(_) => None,
        }
    }
}

impl From<EventValidationError> for StoreError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Store interface for event record persistence.
pub trait EventStore {
    /// Loads every stored record, in file order.
    fn load(&self) -> StoreResult<Vec<EventRecord>>;
    /// Appends one record to the end of the store.
    fn append(&self, record: &EventRecord) -> StoreResult<()>;
    /// Removes the record at a 1-based position, compacting the rest.
    fn remove(&self, position: usize) -> StoreResult<()>;
}
