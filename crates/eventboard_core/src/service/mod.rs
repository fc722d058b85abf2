//! Background services around the shared table.
//!
//! # Responsibility
//! - Drive the producer refresh loop (store → reconciler → table).
//! - Drive the consumer polling loop (table → filtered view).
//!
//! # Invariants
//! - Each loop sleeps on its own cancellable timer; cycles never
//!   overlap within a loop.
//! - A failed cycle is logged and skipped; it never corrupts the
//!   table or the view.

pub mod poller;
pub mod refresh;
