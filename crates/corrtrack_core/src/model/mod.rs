//! Domain model for contacts and the correspondence logged with them.
//!
//! # Responsibility
//! - Define canonical data structures used by the directory, log, reminder
//!   and insight layers.
//! - Own input validation and timestamp parsing for those structures.
//!
//! # Invariants
//! - Ids are assigned by the record store and never reused.
//! - Contacts are never hard-deleted.
//! - A correspondence entry always references an existing contact.

pub mod contact;
pub mod entry;
pub mod timestamp;
pub mod validation;
