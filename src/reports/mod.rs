//! Reports for the budget tracker
//!
//! Financial year summary, month-by-month totals and the filtered detailed
//! report. Reports only read from storage; every figure is recomputed by the
//! aggregation functions when a report is generated.

pub mod detailed;
pub mod monthly;
pub mod summary;

pub use detailed::{CategorySummaryRow, DetailedReport, DetailedRow, PivotMonth, ReportFilter};
pub use monthly::{MonthRow, MonthlyReport};
pub use summary::SummaryReport;
