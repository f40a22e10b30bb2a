//! Report Building
//!
//! Merges runner outcomes, their statistics and the loader's rejections
//! into a single [`Report`], listed in discovery order.
//!
//! ```text
//! ModuleOutcome + ModuleStatistics      LoadError
//!              │                            │
//!              └──────────┬─────────────────┘
//!                         ▼
//!                ModuleReport (by position)
//!                         │
//!                         ▼
//!                       Report
//! ```

use super::metadata::build_report_meta;
use super::statistics::ModuleStatistics;
use modbench_core::{BenchError, LoadError, ModuleOutcome, RunConfig};
use modbench_report::{FailureInfo, ModuleReport, ModuleStatus, Report, ReportSummary};

fn failure_info(error: &BenchError) -> FailureInfo {
    FailureInfo {
        kind: error.kind().to_string(),
        message: error.to_string(),
        iteration: error.iteration(),
    }
}

fn outcome_report(outcome: &ModuleOutcome, stats: ModuleStatistics) -> ModuleReport {
    ModuleReport {
        name: outcome.name.clone(),
        position: outcome.position,
        status: if outcome.is_ok() {
            ModuleStatus::Ok
        } else {
            ModuleStatus::Failed
        },
        iterations_planned: outcome.iterations,
        metrics: stats.metrics,
        warmup: stats.warmup,
        steady: stats.steady,
        cycles: stats.cycles,
        labels: outcome.labels(),
        rss_growth_kb: outcome.rss_growth_kb,
        wall_time_ms: outcome.wall_time.as_secs_f64() * 1000.0,
        failure: outcome.error.as_ref().map(failure_info),
    }
}

fn rejected_report(error: &LoadError) -> ModuleReport {
    ModuleReport {
        name: error.module.clone(),
        position: error.position,
        status: ModuleStatus::Failed,
        iterations_planned: 0,
        metrics: None,
        warmup: None,
        steady: None,
        cycles: None,
        labels: Vec::new(),
        rss_growth_kb: None,
        wall_time_ms: 0.0,
        failure: Some(failure_info(&BenchError::Load(error.clone()))),
    }
}

/// Build a complete Report.
///
/// `stats` must be parallel to `outcomes` (as returned by
/// [`compute_statistics`](super::compute_statistics)).
pub fn build_report(
    outcomes: &[ModuleOutcome],
    stats: Vec<ModuleStatistics>,
    load_errors: &[LoadError],
    config: &RunConfig,
    total_duration_ms: f64,
) -> Report {
    let mut results: Vec<ModuleReport> = outcomes
        .iter()
        .zip(stats)
        .map(|(outcome, stats)| outcome_report(outcome, stats))
        .chain(load_errors.iter().map(rejected_report))
        .collect();
    results.sort_by_key(|r| r.position);

    let summary = ReportSummary::from_results(&results, total_duration_ms);

    Report {
        meta: build_report_meta(config),
        results,
        summary,
    }
}
