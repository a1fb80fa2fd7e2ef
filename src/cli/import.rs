//! CLI command handlers for CSV import and the import template
//!
//! Imports are all-or-nothing: the first bad row rejects the whole file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::Local;

use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(storage: &Storage, settings: &Settings, file: &Path) -> BudgetResult<()> {
    if !file.exists() {
        return Err(BudgetError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let service = ImportService::new(storage).with_date_format(&settings.import_date_format);
    let count = service.import_file(file)?;

    if count == 0 {
        println!("No transactions found in {}.", file.display());
    } else {
        println!("Imported {} transaction(s) from {}", count, file.display());
    }

    Ok(())
}

/// Handle the template command
pub fn handle_template_command(storage: &Storage, output: &Path) -> BudgetResult<()> {
    let file = File::create(output)?;
    let service = ImportService::new(storage);
    service.write_template(BufWriter::new(file), Local::now().date_naive())?;

    println!("Import template written to: {}", output.display());
    println!("Fill in one row per transaction, then run 'budget import {}'.", output.display());
    Ok(())
}
