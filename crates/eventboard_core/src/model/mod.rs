//! Domain model for reminder events.
//!
//! # Responsibility
//! - Define the canonical event record materialized from the store.
//! - Keep derived temporal fields out of the stored shape; they are
//!   recomputed on every read.
//!
//! # Invariants
//! - Records are created fresh on every load pass; only the table key
//!   carries identity across refreshes.

pub mod event;
