//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the minimal record-store contract per entity: create, get by id,
//!   list with filter.
//! - Isolate SQL details from the directory, log and engine services.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Repository APIs return semantic errors (`ContactNotFound`,
//!   `EntryNotFound`) in addition to store transport errors.

pub mod contact_repo;
pub mod entry_repo;
pub mod error;
