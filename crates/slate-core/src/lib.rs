//! slate-core
//!
//! Business logic for the Slate budget tracker: period aggregation, the
//! incurred-cost recorder, and the dataset storage contract. Depends on
//! slate-domain. No HTTP, no filesystem layout, no PDF rendering.

pub mod aggregation;
pub mod error;
pub mod incurred;
pub mod storage;

pub use aggregation::*;
pub use error::{CoreError, CoreResult};
pub use incurred::*;
pub use storage::*;
