//! Store layer: the observable projection over the repository.
//!
//! # Responsibility
//! - Orchestrate repository calls into the create/list/delete lifecycle.
//! - Publish `items` and `error` for the presentation layer to observe.
//!
//! # Invariants
//! - After any successful mutation, `items` equals a full re-fetch of the
//!   backend, never an incremental patch.
//! - Operation failures never tear down a connected store.

pub mod record_store;
