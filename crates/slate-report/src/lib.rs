//! slate-report
//!
//! Assembles the final budget report from the dataset stores and renders it
//! as a PDF. Content assembly is pure and separately testable; only the
//! renderer touches printpdf and the filesystem.

pub mod content;
pub mod format;
pub mod pdf;

pub use content::{DailyRow, ReportContent};
pub use pdf::{ReportError, ReportGenerator};
