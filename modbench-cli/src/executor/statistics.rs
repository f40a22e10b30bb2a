//! Statistics Computation
//!
//! Reduces each module's iteration timings to its report statistics.
//! Modules are independent, so the work is spread over Rayon's pool once
//! all measurements are finished.

use modbench_core::ModuleOutcome;
use modbench_stats::{CyclesSummary, Summary, split_phases, summarize, summarize_cycles};
use rayon::prelude::*;

/// Statistics for a single module
#[derive(Debug, Clone, Default)]
pub struct ModuleStatistics {
    /// Every collected iteration (`None` if nothing was collected)
    pub metrics: Option<Summary>,
    /// Leading iterations when a warmup split is configured
    pub warmup: Option<Summary>,
    /// Iterations after the warmup phase
    pub steady: Option<Summary>,
    /// Cycle counter summary, when the platform has one
    pub cycles: Option<CyclesSummary>,
}

/// Compute statistics for every outcome, in the same order
pub fn compute_statistics(outcomes: &[ModuleOutcome], warmup_iterations: u64) -> Vec<ModuleStatistics> {
    let warmup = usize::try_from(warmup_iterations).unwrap_or(usize::MAX);

    outcomes
        .par_iter()
        .map(|outcome| {
            if outcome.results.is_empty() {
                return ModuleStatistics::default();
            }

            let samples = outcome.durations_ns();
            let cycles: Vec<u64> = outcome.results.iter().map(|r| r.cycles).collect();
            let phases = split_phases(&samples, warmup);

            ModuleStatistics {
                metrics: Some(summarize(&samples)),
                cycles: summarize_cycles(&cycles, &samples),
                warmup: phases.as_ref().map(|p| p.warmup.clone()),
                steady: phases.map(|p| p.steady),
            }
        })
        .collect()
}
