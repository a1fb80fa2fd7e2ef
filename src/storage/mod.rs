//! Storage layer for the budget tracker
//!
//! In-memory repositories backed by a single JSON snapshot written with an
//! atomic rename. Mutations go through [`Storage::commit`], which persists
//! every slice together and puts memory back if the write fails, so memory
//! and disk never disagree.

pub mod categories;
pub mod file_io;
pub mod init;
pub mod preferences;
pub mod snapshot;
pub mod transactions;

pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::{default_categories, initialize_storage};
pub use preferences::{PreferenceRepository, Preferences, DEFAULT_ALERT_THRESHOLD};
pub use snapshot::{Snapshot, SCHEMA_VERSION};
pub use transactions::TransactionRepository;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::current_financial_year;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BudgetPaths,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub preferences: PreferenceRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance with empty repositories
    pub fn new(paths: BudgetPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        let today = Local::now().date_naive();
        Ok(Self {
            transactions: TransactionRepository::new(),
            categories: CategoryRepository::new(),
            preferences: PreferenceRepository::new(Preferences::new(current_financial_year(
                today,
            ))),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Turn audit logging on or off
    pub fn set_audit_enabled(&mut self, enabled: bool) {
        self.audit = if enabled {
            AuditLogger::new(self.paths.audit_log())
        } else {
            AuditLogger::disabled(self.paths.audit_log())
        };
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BudgetError> {
        self.load_all_as_of(Local::now().date_naive())
    }

    /// Load all data from disk, using `today` to resolve a missing financial year
    pub fn load_all_as_of(&self, today: NaiveDate) -> Result<(), BudgetError> {
        let path = self.paths.snapshot_file();
        let snapshot = if path.exists() {
            read_json::<Snapshot, _>(&path)?
        } else {
            debug!("No snapshot at {}, starting from defaults", path.display());
            Snapshot::fresh(today)
        };

        if snapshot.schema_version > SCHEMA_VERSION {
            warn!(
                "Snapshot schema version {} is newer than supported version {}",
                snapshot.schema_version, SCHEMA_VERSION
            );
        }

        let preferences = snapshot.preferences(today);
        debug!(
            transactions = snapshot.transactions.len(),
            categories = snapshot.categories.len(),
            financial_year = %preferences.financial_year,
            "Loaded snapshot"
        );

        self.transactions.replace_all(snapshot.transactions)?;
        self.categories.replace_all(snapshot.categories)?;
        self.preferences.set(preferences)?;
        Ok(())
    }

    /// Build a snapshot of the current in-memory state
    pub fn snapshot(&self) -> BudgetResult<Snapshot> {
        let preferences = self.preferences.get()?;
        Ok(Snapshot {
            schema_version: SCHEMA_VERSION,
            transactions: self.transactions.get_all()?,
            categories: self.categories.get_all()?,
            alert_threshold: preferences.alert_threshold,
            financial_year: Some(preferences.financial_year),
        })
    }

    /// Save all data to disk as one atomic snapshot
    pub fn save_all(&self) -> Result<(), BudgetError> {
        let snapshot = self.snapshot()?;
        write_json_atomic(self.paths.snapshot_file(), &snapshot)?;
        debug!(
            transactions = snapshot.transactions.len(),
            categories = snapshot.categories.len(),
            "Saved snapshot"
        );
        Ok(())
    }

    /// Apply an in-memory change and persist it
    ///
    /// If the change or the save fails, every repository is reset to the
    /// state it had before the change.
    pub fn commit<T>(&self, change: impl FnOnce() -> BudgetResult<T>) -> BudgetResult<T> {
        let before = self.snapshot()?;

        let result = change().and_then(|value| {
            self.save_all()?;
            Ok(value)
        });

        if let Err(err) = &result {
            warn!("Change not saved, restoring previous state: {}", err);
            self.restore(before)?;
        }
        result
    }

    fn restore(&self, snapshot: Snapshot) -> BudgetResult<()> {
        let preferences = snapshot.preferences(Local::now().date_naive());
        self.transactions.replace_all(snapshot.transactions)?;
        self.categories.replace_all(snapshot.categories)?;
        self.preferences.set(preferences)
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a created entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an updated entity in the audit log, with a field diff
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> BudgetResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a deleted entity in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Record a bulk import in the audit log
    pub fn log_import(&self, source: impl Into<String>, count: usize) -> BudgetResult<()> {
        let source = source.into();
        info!(source = %source, count, "Imported transactions");
        self.audit.log(&AuditEntry::import(source, count))
    }
}
