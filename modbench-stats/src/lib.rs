#![warn(missing_docs)]
//! modbench Statistics
//!
//! Reduces raw iteration timings to report statistics:
//! - Count, total, mean, min, max, median and standard deviation
//! - Cycle-counter summaries
//! - Warmup / steady-state phase split

mod percentiles;
mod phases;
mod summary;

pub use percentiles::compute_percentile;
pub use phases::{PhaseSplit, split_phases};
pub use summary::{CyclesSummary, Summary, summarize, summarize_cycles};
