//! YAML Export functionality
//!
//! Exports the complete budget state to YAML for a human-readable backup.

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::FullExport;
use crate::storage::Storage;
use std::io::Write;

/// Export the full state to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> BudgetResult<()> {
    let export = FullExport::from_storage(storage)?;
    let export_err = |e: std::io::Error| BudgetError::Export(e.to_string());

    writeln!(writer, "# Budget Tracker Export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}
