//! Repository layer: the persistence contract and its backends.
//!
//! # Responsibility
//! - Define the backend-agnostic persistence interface consumed by the
//!   store.
//! - Keep SQL details behind the repository boundary.
//!
//! # Invariants
//! - Write paths enforce `Record::validate()` before persistence.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod record_repo;
