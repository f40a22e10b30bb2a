//! Suite Executor
//!
//! Runs a discovered suite and turns the outcomes into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Suite (from the loader)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Run modules in order, collect iterations
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Summaries, phases, cycles (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Merge with load errors, build Report
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```

mod execution;
mod formatting;
mod metadata;
mod report;
mod statistics;

pub use execution::{ExecutionConfig, Executor};
pub use formatting::format_human_output;
pub use report::build_report;
pub use statistics::{ModuleStatistics, compute_statistics};

#[cfg(test)]
mod tests {
    use super::*;
    use modbench_core::{
        BenchModule, EntryTable, ModuleError, ModuleSource, RunConfig, TypedSource, discover,
    };
    use modbench_report::ModuleStatus;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Spin {
        iterations: i64,
        fail_at: u64,
    }

    struct Spinner;

    impl BenchModule for Spinner {
        type Config = Spin;
        type Fixture = u64;

        fn init() -> Result<Spin, ModuleError> {
            Ok(Spin {
                iterations: 4,
                fail_at: 0,
            })
        }

        fn get_iterations(spin: &Spin) -> Result<i64, ModuleError> {
            Ok(spin.iterations)
        }

        fn setup(_spin: &Spin) -> Result<u64, ModuleError> {
            Ok(0)
        }

        fn run(spin: &Spin, calls: &mut u64) -> Result<Option<String>, ModuleError> {
            *calls += 1;
            if *calls == spin.fail_at {
                return Err(ModuleError::new("spun out"));
            }
            Ok(Some("spin()".to_string()))
        }
    }

    fn iterations(_config: &()) -> Result<i64, ModuleError> {
        Ok(1)
    }

    fn noop(_config: &(), _fixture: &mut ()) -> Result<Option<String>, ModuleError> {
        Ok(None)
    }

    fn run_report(run: RunConfig, sources: Vec<Box<dyn ModuleSource>>) -> modbench_report::Report {
        let discovery = discover(sources);
        let executor = Executor::new(ExecutionConfig {
            run,
            ..ExecutionConfig::default()
        });
        let outcomes = executor.execute(discovery.suite);
        let stats = compute_statistics(&outcomes, executor.run_config().warmup_iterations);
        build_report(&outcomes, stats, &discovery.errors, executor.run_config(), 1.0)
    }

    #[test]
    fn test_report_lists_modules_in_discovery_order() {
        let broken: Box<dyn ModuleSource> = Box::new(
            EntryTable::<(), ()>::new("broken")
                .with_get_iterations(iterations)
                .with_run(noop),
        );
        let sources: Vec<Box<dyn ModuleSource>> = vec![
            Box::new(TypedSource::<Spinner>::new("first")),
            broken,
            Box::new(TypedSource::<Spinner>::new("last")),
        ];
        let report = run_report(RunConfig::default(), sources);

        let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "broken", "last"]);
        assert_eq!(report.summary.ok, 2);
        assert_eq!(report.summary.failed, 1);

        let broken = &report.results[1];
        assert_eq!(broken.status, ModuleStatus::Failed);
        assert!(broken.metrics.is_none());
        let failure = broken.failure.as_ref().unwrap();
        assert_eq!(failure.kind, "LoadError");
        assert!(failure.message.contains("init"));

        let first = &report.results[0];
        assert_eq!(first.metrics.as_ref().unwrap().count, 4);
        assert_eq!(first.labels, vec!["spin()".to_string()]);
    }

    #[test]
    fn test_partial_results_survive_runtime_error() {
        let run = RunConfig {
            overrides: ["fail_at=3".parse().unwrap()].into_iter().collect(),
            warmup_iterations: 1,
            ..RunConfig::default()
        };
        let report = run_report(run, vec![Box::new(TypedSource::<Spinner>::new("spinner"))]);
        let result = &report.results[0];

        assert_eq!(result.status, ModuleStatus::Failed);
        assert_eq!(result.iterations_planned, 4);
        assert_eq!(result.metrics.as_ref().unwrap().count, 2);
        assert_eq!(result.warmup.as_ref().unwrap().count, 1);
        assert_eq!(result.steady.as_ref().unwrap().count, 1);
        let failure = result.failure.as_ref().unwrap();
        assert_eq!(failure.kind, "RuntimeError");
        assert_eq!(failure.iteration, Some(3));

        let text = format_human_output(&report);
        assert!(text.contains("✗ spinner  failed"));
        assert!(text.contains("RuntimeError: iteration 3: spun out"));
        assert!(text.contains("partial count: 2"));
    }

    #[test]
    fn test_human_output_for_successful_module() {
        let report = run_report(
            RunConfig::default(),
            vec![Box::new(TypedSource::<Spinner>::new("spinner"))],
        );
        let text = format_human_output(&report);

        assert!(text.contains("✓ spinner  ok"));
        assert!(text.contains("count: 4  total: "));
        assert!(text.contains("ran: spin()"));
        assert!(text.contains("1 modules: 1 ok, 0 failed"));
    }
}
