//! slate-domain
//!
//! Pure domain models for production budget tracking (daily estimates,
//! incurred costs, purchased items, shooting schedules, period summaries).
//! No I/O, no HTTP, no storage. Only data types and the variation rule.

pub mod estimate;
pub mod incurred;
pub mod schedule;
pub mod summary;

pub use estimate::*;
pub use incurred::*;
pub use schedule::*;
pub use summary::*;
