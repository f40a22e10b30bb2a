//! Runner
//!
//! Drives one module at a time through its lifecycle:
//!
//! ```text
//! Loaded ──init──▶ Initialized ──get_iterations + setup──▶ ReadySetup
//!                                                              │
//!                                           run × N (timed)    ▼
//!                                       Completed ◀──────── Running
//!
//! any non-terminal state ──error──▶ Failed
//! ```
//!
//! Execution is sequential and single-threaded. Errors never escape a
//! module: they end that module in `Failed` and the suite moves on.

use crate::error::BenchError;
use crate::loader::{Suite, SuiteEntry};
use crate::measure::{measure, peak_rss_kb};
use crate::module::Module;
use crate::overrides::Overrides;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// What happens to the fixture between iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixturePolicy {
    /// Build once, reuse across all iterations (in-place mutation carries over)
    #[default]
    Shared,
    /// Rebuild before every iteration after the first, outside the timed region
    Fresh,
}

impl FromStr for FixturePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shared" => Ok(FixturePolicy::Shared),
            "fresh" => Ok(FixturePolicy::Fresh),
            other => Err(format!("Unknown fixture policy: {}", other)),
        }
    }
}

impl fmt::Display for FixturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixturePolicy::Shared => f.write_str("shared"),
            FixturePolicy::Fresh => f.write_str("fresh"),
        }
    }
}

/// Settings shared by every module in a run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Global factor applied to each module's declared iteration count
    pub multiplier: u32,
    /// Fixture handling between iterations
    pub fixture: FixturePolicy,
    /// Leading iterations reported as a separate warmup phase
    pub warmup_iterations: u64,
    /// Wall-clock budget per module, checked between iterations
    pub timeout: Option<Duration>,
    /// Parameter overrides applied after `init`
    pub overrides: Overrides,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            multiplier: 1,
            fixture: FixturePolicy::Shared,
            warmup_iterations: 0,
            timeout: None,
            overrides: Overrides::new(),
        }
    }
}

/// Lifecycle state of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleState {
    /// Accepted by the loader
    Loaded,
    /// `init` succeeded
    Initialized,
    /// Iteration count fixed and fixture built
    ReadySetup,
    /// Iterations in progress
    Running,
    /// All iterations ran
    Completed,
    /// Stopped by an error
    Failed,
}

impl ModuleState {
    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, ModuleState::Completed | ModuleState::Failed)
    }
}

/// One measured `run` invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationResult {
    /// 1-based iteration index
    pub index: u64,
    /// Wall-clock duration of the call
    pub duration: Duration,
    /// Cycle-counter ticks (0 without a hardware counter)
    pub cycles: u64,
    /// Label returned by the module
    pub label: Option<String>,
}

/// Everything the runner learned about one module
#[derive(Debug, Clone)]
pub struct ModuleOutcome {
    /// Module name
    pub name: String,
    /// Position in the source list
    pub position: usize,
    /// Terminal state
    pub state: ModuleState,
    /// Iteration count fixed before execution (0 if never reached)
    pub iterations: u64,
    /// Collected measurements, in order
    pub results: Vec<IterationResult>,
    /// Failure record, if the module failed
    pub error: Option<BenchError>,
    /// Peak RSS growth across setup and iterations, in KiB
    pub rss_growth_kb: Option<u64>,
    /// Wall-clock time spent on the whole lifecycle
    pub wall_time: Duration,
}

impl ModuleOutcome {
    /// Whether every iteration ran
    pub fn is_ok(&self) -> bool {
        self.state == ModuleState::Completed
    }

    /// Iteration durations in nanoseconds, in order
    pub fn durations_ns(&self) -> Vec<f64> {
        self.results
            .iter()
            .map(|r| r.duration.as_nanos() as f64)
            .collect()
    }

    /// Distinct labels in first-seen order
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for label in self.results.iter().filter_map(|r| r.label.as_ref()) {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        labels
    }
}

/// Bookkeeping for one module while it runs
struct ModuleRun {
    name: String,
    position: usize,
    state: ModuleState,
    iterations: u64,
    results: Vec<IterationResult>,
    error: Option<BenchError>,
    rss_before: Option<u64>,
}

impl ModuleRun {
    fn new(name: &str, position: usize) -> Self {
        Self {
            name: name.to_string(),
            position,
            state: ModuleState::Loaded,
            iterations: 0,
            results: Vec::new(),
            error: None,
            rss_before: None,
        }
    }

    fn transition(&mut self, to: ModuleState) {
        debug_assert!(!self.state.is_terminal(), "{} already {:?}", self.name, self.state);
        tracing::debug!(module = %self.name, from = ?self.state, to = ?to, "state transition");
        self.state = to;
    }

    fn fail(&mut self, error: BenchError) {
        tracing::warn!(
            module = %self.name,
            kind = %error.kind(),
            collected = self.results.len(),
            "module failed: {}",
            error
        );
        self.transition(ModuleState::Failed);
        self.error = Some(error);
    }

    /// Peak RSS growth since setup started, whatever the terminal state
    fn finish(self, wall_time: Duration) -> ModuleOutcome {
        let rss_growth_kb = self
            .rss_before
            .zip(peak_rss_kb())
            .map(|(before, after)| after.saturating_sub(before));
        ModuleOutcome {
            name: self.name,
            position: self.position,
            state: self.state,
            iterations: self.iterations,
            results: self.results,
            error: self.error,
            rss_growth_kb,
            wall_time,
        }
    }
}

/// Executes suites sequentially
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    /// Runner with the given settings
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Active settings
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every module of the suite in order
    pub fn run_suite(&self, suite: Suite) -> Vec<ModuleOutcome> {
        suite.into_iter().map(|entry| self.run_module(entry)).collect()
    }

    /// Run a single module through its whole lifecycle.
    ///
    /// The module (and with it the fixture) is dropped before returning.
    pub fn run_module(&self, entry: SuiteEntry) -> ModuleOutcome {
        let SuiteEntry {
            position,
            mut module,
        } = entry;
        let started = Instant::now();
        let mut run = ModuleRun::new(module.name(), position);

        if let Err(error) = self.drive(module.as_mut(), &mut run) {
            run.fail(error);
        }
        drop(module);

        let outcome = run.finish(started.elapsed());
        tracing::info!(
            module = %outcome.name,
            state = ?outcome.state,
            iterations = outcome.results.len(),
            "module finished"
        );
        outcome
    }

    fn drive(&self, module: &mut dyn Module, run: &mut ModuleRun) -> Result<(), BenchError> {
        module.init(&self.config.overrides)?;
        run.transition(ModuleState::Initialized);

        let declared = module.get_iterations()?;
        run.iterations = self.iteration_count(declared)?;
        run.rss_before = peak_rss_kb();
        module.setup()?;
        run.transition(ModuleState::ReadySetup);

        run.transition(ModuleState::Running);
        let started = Instant::now();
        for index in 1..=run.iterations {
            if index > 1 {
                if let Some(budget) = self.config.timeout {
                    if started.elapsed() >= budget {
                        return Err(BenchError::Timeout {
                            budget,
                            completed: index - 1,
                        });
                    }
                }
                if self.config.fixture == FixturePolicy::Fresh {
                    module.setup()?;
                }
            }

            let measurement = measure(|| module.run());
            match measurement.value {
                Ok(label) => run.results.push(IterationResult {
                    index,
                    duration: measurement.duration,
                    cycles: measurement.cycles,
                    label,
                }),
                Err(e) => {
                    return Err(BenchError::Runtime {
                        iteration: index,
                        message: e.to_string(),
                    });
                }
            }
        }

        run.transition(ModuleState::Completed);
        Ok(())
    }

    /// Declared count × multiplier; both must be positive
    fn iteration_count(&self, declared: i64) -> Result<u64, BenchError> {
        if declared <= 0 {
            return Err(BenchError::Configuration(format!(
                "get_iterations returned {declared}; at least one iteration is required"
            )));
        }
        if self.config.multiplier == 0 {
            return Err(BenchError::Configuration(
                "iteration multiplier must be at least 1".to_string(),
            ));
        }
        (declared as u64)
            .checked_mul(u64::from(self.config.multiplier))
            .ok_or_else(|| {
                BenchError::Configuration(format!(
                    "{declared} iterations × multiplier {} overflows",
                    self.config.multiplier
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModuleError;
    use crate::loader::discover;
    use crate::module::{BenchModule, EntryTable, ModuleSource, TypedSource};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Plan {
        iterations: i64,
        fail_at: u64,
    }

    /// Counts calls in its fixture and fails on call `fail_at` (0 = never)
    struct Counter;

    impl BenchModule for Counter {
        type Config = Plan;
        type Fixture = u64;

        fn init() -> Result<Plan, ModuleError> {
            Ok(Plan {
                iterations: 3,
                fail_at: 0,
            })
        }

        fn get_iterations(plan: &Plan) -> Result<i64, ModuleError> {
            Ok(plan.iterations)
        }

        fn setup(_plan: &Plan) -> Result<u64, ModuleError> {
            Ok(0)
        }

        fn run(plan: &Plan, calls: &mut u64) -> Result<Option<String>, ModuleError> {
            *calls += 1;
            if *calls == plan.fail_at {
                return Err(ModuleError::new("exploded"));
            }
            Ok(Some(format!("call {}", calls)))
        }
    }

    fn counter(overrides: &[&str]) -> (Runner, Suite) {
        let config = RunConfig {
            overrides: overrides.iter().map(|s| s.parse().unwrap()).collect(),
            ..RunConfig::default()
        };
        let source: Box<dyn ModuleSource> = Box::new(TypedSource::<Counter>::new("counter"));
        (Runner::new(config), discover(vec![source]).suite)
    }

    fn run_one(runner: &Runner, suite: Suite) -> ModuleOutcome {
        runner.run_suite(suite).pop().unwrap()
    }

    #[test]
    fn test_three_iterations_complete() {
        let (runner, suite) = counter(&[]);
        let outcome = run_one(&runner, suite);

        assert_eq!(outcome.state, ModuleState::Completed);
        assert!(outcome.is_ok());
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.results.len(), 3);
        let indices: Vec<u64> = outcome.results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(outcome.results[2].label.as_deref(), Some("call 3"));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_failure_on_second_call_halts_module() {
        let (runner, suite) = counter(&["fail_at=2", "iterations=5"]);
        let outcome = run_one(&runner, suite);

        assert_eq!(outcome.state, ModuleState::Failed);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(
            outcome.error,
            Some(BenchError::Runtime {
                iteration: 2,
                message: "exploded".to_string()
            })
        );
    }

    #[test]
    fn test_non_positive_iterations_is_configuration_error() {
        for bad in ["iterations=0", "iterations=-4"] {
            let (runner, suite) = counter(&[bad]);
            let outcome = run_one(&runner, suite);
            assert_eq!(outcome.state, ModuleState::Failed);
            assert_eq!(outcome.iterations, 0);
            assert!(outcome.results.is_empty());
            assert!(matches!(outcome.error, Some(BenchError::Configuration(_))));
        }
    }

    #[test]
    fn test_multiplier_scales_iterations() {
        let (_, suite) = counter(&[]);
        let runner = Runner::new(RunConfig {
            multiplier: 4,
            ..RunConfig::default()
        });
        let outcome = run_one(&runner, suite);
        assert_eq!(outcome.iterations, 12);
        assert_eq!(outcome.results.len(), 12);
    }

    #[test]
    fn test_shared_fixture_carries_state() {
        let (runner, suite) = counter(&[]);
        let outcome = run_one(&runner, suite);
        assert_eq!(outcome.labels(), vec!["call 1", "call 2", "call 3"]);
    }

    #[test]
    fn test_fresh_fixture_is_rebuilt_each_iteration() {
        let (_, suite) = counter(&[]);
        let runner = Runner::new(RunConfig {
            fixture: FixturePolicy::Fresh,
            ..RunConfig::default()
        });
        let outcome = run_one(&runner, suite);
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.labels(), vec!["call 1"]);
    }

    #[test]
    fn test_zero_timeout_stops_after_first_iteration() {
        let (_, suite) = counter(&[]);
        let runner = Runner::new(RunConfig {
            timeout: Some(Duration::ZERO),
            ..RunConfig::default()
        });
        let outcome = run_one(&runner, suite);
        assert_eq!(outcome.state, ModuleState::Failed);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(
            outcome.error,
            Some(BenchError::Timeout {
                budget: Duration::ZERO,
                completed: 1
            })
        );
    }

    #[test]
    fn test_panicking_run_is_runtime_error() {
        fn init() -> Result<i64, ModuleError> {
            Ok(2)
        }
        fn iterations(n: &i64) -> Result<i64, ModuleError> {
            Ok(*n)
        }
        fn run(_n: &i64, _f: &mut ()) -> Result<Option<String>, ModuleError> {
            panic!("index out of range")
        }

        let source: Box<dyn ModuleSource> = Box::new(
            EntryTable::<i64, ()>::new("panicky")
                .with_init(init)
                .with_get_iterations(iterations)
                .with_run(run),
        );
        let outcome = run_one(&Runner::default(), discover(vec![source]).suite);
        assert_eq!(
            outcome.error,
            Some(BenchError::Runtime {
                iteration: 1,
                message: "panicked: index out of range".to_string()
            })
        );
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_suite_runs_in_order_and_continues_after_failure() {
        fn init() -> Result<i64, ModuleError> {
            Err(ModuleError::missing_parameter("iterations"))
        }
        fn iterations(n: &i64) -> Result<i64, ModuleError> {
            Ok(*n)
        }
        fn run(_n: &i64, _f: &mut ()) -> Result<Option<String>, ModuleError> {
            Ok(None)
        }

        let sources: Vec<Box<dyn ModuleSource>> = vec![
            Box::new(
                EntryTable::<i64, ()>::new("broken")
                    .with_init(init)
                    .with_get_iterations(iterations)
                    .with_run(run),
            ),
            Box::new(TypedSource::<Counter>::new("counter")),
        ];
        let outcomes = Runner::default().run_suite(discover(sources).suite);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].name, "broken");
        assert_eq!(outcomes[0].state, ModuleState::Failed);
        assert_eq!(
            outcomes[0].error,
            Some(BenchError::Configuration(
                "init failed: required parameter `iterations` is not set".to_string()
            ))
        );
        assert_eq!(outcomes[1].name, "counter");
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn test_durations_sum() {
        let (runner, suite) = counter(&[]);
        let outcome = run_one(&runner, suite);
        let total: f64 = outcome.durations_ns().iter().sum();
        let expected: u128 = outcome.results.iter().map(|r| r.duration.as_nanos()).sum();
        assert_eq!(total as u128, expected);
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Build {
        iterations: i64,
        fail_setup_at: u64,
    }

    thread_local! {
        static SETUP_CALLS: std::cell::Cell<u64> = const { std::cell::Cell::new(0) };
    }

    /// Fixture build number `fail_setup_at` fails (0 = never)
    struct Brittle;

    impl BenchModule for Brittle {
        type Config = Build;
        type Fixture = ();

        fn init() -> Result<Build, ModuleError> {
            SETUP_CALLS.with(|calls| calls.set(0));
            Ok(Build {
                iterations: 5,
                fail_setup_at: 1,
            })
        }

        fn get_iterations(build: &Build) -> Result<i64, ModuleError> {
            Ok(build.iterations)
        }

        fn setup(build: &Build) -> Result<(), ModuleError> {
            let call = SETUP_CALLS.with(|calls| {
                calls.set(calls.get() + 1);
                calls.get()
            });
            if call == build.fail_setup_at {
                return Err(ModuleError::new("fixture build failed"));
            }
            Ok(())
        }

        fn run(_build: &Build, _fixture: &mut ()) -> Result<Option<String>, ModuleError> {
            Ok(None)
        }
    }

    #[test]
    fn test_setup_failure_fails_module_and_suite_continues() {
        let sources: Vec<Box<dyn ModuleSource>> = vec![
            Box::new(TypedSource::<Brittle>::new("brittle")),
            Box::new(TypedSource::<Counter>::new("counter")),
        ];
        let outcomes = Runner::default().run_suite(discover(sources).suite);

        let brittle = &outcomes[0];
        assert_eq!(brittle.state, ModuleState::Failed);
        assert_eq!(brittle.iterations, 5);
        assert!(brittle.results.is_empty());
        assert_eq!(
            brittle.error,
            Some(BenchError::Setup("fixture build failed".to_string()))
        );
        assert_eq!(brittle.error.as_ref().map(|e| e.kind().as_str()), Some("SetupError"));

        assert_eq!(outcomes[1].name, "counter");
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn test_fresh_rebuild_failure_keeps_earlier_iterations() {
        let overrides: Overrides = ["fail_setup_at=3"].iter().map(|s| s.parse().unwrap()).collect();
        let runner = Runner::new(RunConfig {
            fixture: FixturePolicy::Fresh,
            overrides,
            ..RunConfig::default()
        });
        let source: Box<dyn ModuleSource> = Box::new(TypedSource::<Brittle>::new("brittle"));
        let outcome = run_one(&runner, discover(vec![source]).suite);

        // Build 3 precedes iteration 3
        assert_eq!(outcome.state, ModuleState::Failed);
        assert_eq!(outcome.results.len(), 2);
        let indices: Vec<u64> = outcome.results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(matches!(outcome.error, Some(BenchError::Setup(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_rss_growth_reported_for_failed_module() {
        let (runner, suite) = counter(&["fail_at=2"]);
        let outcome = run_one(&runner, suite);
        assert_eq!(outcome.state, ModuleState::Failed);
        assert!(outcome.rss_growth_kb.is_some());

        let (runner, suite) = counter(&["iterations=0"]);
        let outcome = run_one(&runner, suite);
        assert_eq!(outcome.rss_growth_kb, None);
    }
}
