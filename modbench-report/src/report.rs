//! Report Data Structures

use chrono::{DateTime, Utc};
use modbench_stats::{CyclesSummary, Summary};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the serialized report layout
pub const SCHEMA_VERSION: u32 = 1;

/// Complete suite report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    /// One entry per source, in discovery order
    pub results: Vec<ModuleReport>,
    pub summary: ReportSummary,
}

impl Report {
    /// Whether any module (including rejected ones) failed
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system: SystemInfo,
    pub config: ReportConfig,
}

/// Run settings captured in report metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub multiplier: u32,
    pub fixture: String,
    pub warmup_iterations: u64,
    pub timeout_ms: Option<u64>,
    pub overrides: Vec<String>,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cpu_cores: u32,
}

/// Outcome of a single module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Ok,
    Failed,
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleStatus::Ok => f.write_str("ok"),
            ModuleStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Individual module entry in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleReport {
    pub name: String,
    pub position: usize,
    pub status: ModuleStatus,
    /// Iteration count fixed before execution (0 if never reached)
    pub iterations_planned: u64,
    /// Present whenever at least one iteration was measured
    pub metrics: Option<Summary>,
    /// Leading iterations, when a warmup split was requested
    pub warmup: Option<Summary>,
    /// Iterations after the warmup phase
    pub steady: Option<Summary>,
    pub cycles: Option<CyclesSummary>,
    pub labels: Vec<String>,
    pub rss_growth_kb: Option<u64>,
    pub wall_time_ms: f64,
    pub failure: Option<FailureInfo>,
}

/// Failure information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInfo {
    /// `LoadError`, `ConfigurationError`, `SetupError`, `RuntimeError` or `TimeoutError`
    pub kind: String,
    pub message: String,
    /// Failing iteration for runtime errors (1-based)
    pub iteration: Option<u64>,
}

/// Report summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
    pub duration_ms: f64,
}

impl ReportSummary {
    /// Tally module statuses
    pub fn from_results(results: &[ModuleReport], duration_ms: f64) -> Self {
        let ok = results
            .iter()
            .filter(|r| r.status == ModuleStatus::Ok)
            .count();
        Self {
            total: results.len(),
            ok,
            failed: results.len() - ok,
            duration_ms,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use modbench_stats::summarize;

    pub(crate) fn sample_report() -> Report {
        let ok = ModuleReport {
            name: "fibonacci".to_string(),
            position: 0,
            status: ModuleStatus::Ok,
            iterations_planned: 3,
            metrics: Some(summarize(&[100.0, 200.0, 300.0])),
            warmup: None,
            steady: None,
            cycles: None,
            labels: vec!["fib()".to_string()],
            rss_growth_kb: Some(0),
            wall_time_ms: 0.01,
            failure: None,
        };
        let failed = ModuleReport {
            name: "sorter".to_string(),
            position: 1,
            status: ModuleStatus::Failed,
            iterations_planned: 5,
            metrics: Some(summarize(&[50.0])),
            warmup: None,
            steady: None,
            cycles: None,
            labels: Vec::new(),
            rss_growth_kb: None,
            wall_time_ms: 0.02,
            failure: Some(FailureInfo {
                kind: "RuntimeError".to_string(),
                message: "iteration 2: bad input, giving up".to_string(),
                iteration: Some(2),
            }),
        };
        let results = vec![ok, failed];
        let summary = ReportSummary::from_results(&results, 1.5);

        Report {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                system: SystemInfo {
                    os: "linux".to_string(),
                    arch: "x86_64".to_string(),
                    cpu: "test cpu".to_string(),
                    cpu_cores: 4,
                },
                config: ReportConfig {
                    multiplier: 1,
                    fixture: "shared".to_string(),
                    ..ReportConfig::default()
                },
            },
            results,
            summary,
        }
    }

    #[test]
    fn test_summary_counts_statuses() {
        let report = sample_report();
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.ok, 1);
        assert_eq!(report.summary.failed, 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ModuleStatus::Failed).unwrap(), "\"failed\"");
        assert_eq!(ModuleStatus::Ok.to_string(), "ok");
    }
}
