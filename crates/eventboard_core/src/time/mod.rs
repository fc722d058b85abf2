//! Temporal arithmetic for event breakdowns.
//!
//! # Responsibility
//! - Provide the pure decomposition/classification functions used by
//!   every table projection.
//! - Own the single clock read helper so callers stay testable.
//!
//! # Invariants
//! - Nothing in this module performs I/O or can fail.

use chrono::{Local, NaiveDateTime};

pub mod decompose;

/// Reads the local wall clock as a naive datetime.
///
/// All derived fields are recomputed against one `now` per refresh
/// cycle; callers capture this once and pass it down.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
