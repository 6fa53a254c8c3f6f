//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stampbook_core` linkage.
//! - Exercise the full record lifecycle against an ephemeral container.

use std::collections::BTreeSet;

use stampbook_core::{RecordStore, StorageMode};

fn main() {
    println!("stampbook_core ping={}", stampbook_core::ping());
    println!("stampbook_core version={}", stampbook_core::core_version());

    let mut store = RecordStore::open(StorageMode::Ephemeral);
    store.create_record();
    store.create_record();
    println!("records_after_create={}", store.items().len());

    store.delete_records(&BTreeSet::from([0]));
    println!("records_after_delete={}", store.items().len());

    if let Some(err) = store.last_error() {
        println!("last_error={err}");
    }
}
