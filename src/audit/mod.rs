//! Audit logging
//!
//! Every mutation of transactions, categories, preferences and users, and
//! every bulk import, is appended to `audit.log` as one JSON line.
//!
//! - `AuditEntry`: timestamp, operation, entity and optional before/after
//!   values.
//! - `AuditLogger`: appends entries and reads them back.
//! - `generate_diff`: one-line summary of the top-level fields that changed.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
