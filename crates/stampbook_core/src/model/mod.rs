//! Domain model for the single persisted record shape.
//!
//! # Responsibility
//! - Define the canonical record structure used by the store and
//!   repository layers.
//! - Keep timestamp capture and validation in one place.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - A record never changes after creation; deletion is the only
//!   lifecycle transition.

pub mod record;
