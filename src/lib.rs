//! Budget Tracker - personal budgeting by financial year
//!
//! This library provides the core functionality for the `budget` command line
//! tool: recording income and expense transactions against budgeted
//! categories, and reporting on them per July-to-June financial year.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, financial years)
//! - `storage`: JSON snapshot storage layer
//! - `services`: Business logic and aggregation
//! - `reports`: Summary, monthly and detailed reports
//! - `export`: CSV, JSON and YAML export
//! - `identity`: Pluggable user identity
//! - `audit`: Audit logging system
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_tracker::config::{paths::BudgetPaths, settings::Settings};
//! use budget_tracker::storage::Storage;
//!
//! let paths = BudgetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod identity;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
