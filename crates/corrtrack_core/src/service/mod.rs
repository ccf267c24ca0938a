//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the directory, log, reminder and
//!   insight operations.
//! - Keep the command surface decoupled from storage details.
//!
//! # Invariants
//! - Services receive their repositories through constructors; there is no
//!   process-wide store handle.
//! - Reminder and insight views are recomputed from stored data and the
//!   caller's reference time on every call.

pub mod contact_service;
pub mod insight_service;
pub mod log_service;
pub mod reminder_service;
pub mod tone;
