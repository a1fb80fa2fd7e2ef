//! Storage initialization
//!
//! First-run setup: seeded categories and the initial snapshot.

use chrono::NaiveDate;
use tracing::info;

use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::error::BudgetError;
use crate::models::Category;

use super::file_io::write_json_atomic;
use super::snapshot::Snapshot;

/// The categories a new budget starts with
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::income("Salary", 5000.0),
        Category::income("Freelance", 1000.0),
        Category::income("Investments", 500.0),
        Category::income("Other Income", 200.0),
        Category::expense("Housing", 1200.0),
        Category::expense("Transportation", 400.0),
        Category::expense("Food", 600.0),
        Category::expense("Utilities", 300.0),
        Category::expense("Entertainment", 200.0),
        Category::expense("Healthcare", 150.0),
        Category::expense("Shopping", 300.0),
        Category::expense("Other Expenses", 250.0),
    ]
}

/// Initialize storage for a fresh installation
///
/// Writes the default snapshot and settings unless they already exist.
/// Returns true if anything was created.
pub fn initialize_storage(paths: &BudgetPaths, today: NaiveDate) -> Result<bool, BudgetError> {
    paths.ensure_directories()?;
    let mut created = false;

    if !paths.snapshot_file().exists() {
        write_json_atomic(paths.snapshot_file(), &Snapshot::fresh(today))?;
        info!("Created {}", paths.snapshot_file().display());
        created = true;
    }

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
        created = true;
    }

    Ok(created)
}
