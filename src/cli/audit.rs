//! CLI command for viewing the audit log

use crate::error::BudgetResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, count: usize) -> BudgetResult<()> {
    let audit = storage.audit();
    if !audit.is_enabled() {
        println!("Audit logging is disabled in the settings.");
    }

    let entries = audit.read_recent(count)?;
    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
