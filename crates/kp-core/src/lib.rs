//! kp-core: shared data model for kittyplot.
//!
//! Contains:
//! - table (per-run metric name -> samples, plus its builder)
//! - dataset (runs keyed by label + the union of metric names)
//! - numeric (sample type + reduced-precision helpers)
//! - timing (opt-in stage timers)
//! - error (shared error types)

pub mod dataset;
pub mod error;
pub mod numeric;
pub mod table;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use dataset::{Dataset, Run};
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use table::{MetricTable, MetricTableBuilder};
