#![warn(missing_docs)]
//! # modbench
//!
//! Sequential micro-benchmark harness with a typed module contract.
//!
//! A benchmark is a module with four entry points:
//! - **`init`**: builds the module's configuration (iteration count, problem size)
//! - **`get_iterations`**: reports how many times `run` is measured
//! - **`setup`**: builds the input fixture, outside the timed region
//! - **`run`**: the measured unit, returning an optional label
//!
//! Modules run one at a time, in discovery order. A failing module is
//! recorded with its error kind (`LoadError`, `ConfigurationError`,
//! `SetupError`, `RuntimeError`, `TimeoutError`) and never stops the suite.
//!
//! ## Quick Start
//!
//! ```ignore
//! use modbench::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct FibConfig { iterations: i64, n: u64 }
//!
//! struct Fibonacci;
//!
//! impl BenchModule for Fibonacci {
//!     type Config = FibConfig;
//!     type Fixture = ();
//!
//!     fn init() -> Result<FibConfig, ModuleError> {
//!         Ok(FibConfig { iterations: 50, n: 1000 })
//!     }
//!     fn get_iterations(config: &FibConfig) -> Result<i64, ModuleError> {
//!         Ok(config.iterations)
//!     }
//!     fn setup(_config: &FibConfig) -> Result<(), ModuleError> {
//!         Ok(())
//!     }
//!     fn run(config: &FibConfig, _fixture: &mut ()) -> Result<Option<String>, ModuleError> {
//!         std::hint::black_box(fib(config.n));
//!         Ok(Some("fib()".into()))
//!     }
//! }
//!
//! register_module!(Fibonacci, "fibonacci");
//!
//! fn main() -> anyhow::Result<()> {
//!     modbench::run()
//! }
//! ```

// Re-export core types
pub use modbench_core::{
    BenchError, BenchModule, Discovery, EntryPoint, EntryTable, ErrorKind, FixturePolicy,
    IterationResult, LoadError, LoadFailure, Measurement, Module, ModuleDef, ModuleError,
    ModuleOutcome, ModuleSource, ModuleState, Override, Overrides, RunConfig, Runner, Suite,
    SuiteEntry, Timer, TypedSource, discover, find_module, measure, register_module,
    registered_modules, resolve_sources,
};

// Re-export stats
pub use modbench_stats::{PhaseSplit, Summary, split_phases, summarize};

// Re-export report model
pub use modbench_report::{ModuleReport, ModuleStatus, OutputFormat, Report};

// Re-export CLI entry points
pub use modbench_cli::{ExecutionConfig, render, run_suite};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{BenchModule, EntryTable, ModuleError, register_module};
}

/// Run the modbench CLI harness.
///
/// Call this from your benchmark binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     modbench::run()
/// }
/// ```
pub use modbench_cli::run;
