//! Export module for the budget tracker
//!
//! - CSV: transactions in the import format
//! - JSON: machine-readable full state export
//! - YAML: human-readable full state export
//!
//! Report CSVs live with their reports in [`crate::reports`].

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_transactions_csv;
pub use json::{export_full_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
