#![warn(missing_docs)]
//! modbench Core - Module Contract and Runtime
//!
//! This crate provides everything needed to execute benchmark modules:
//! - `BenchModule` trait and `EntryTable` for defining modules
//! - Loader that validates candidates and builds the suite
//! - Monotonic timer with cycle counting
//! - Runner state machine with per-module failure isolation
//! - Link-time module registry (`register_module!`)

mod error;
mod loader;
mod measure;
mod module;
mod overrides;
mod registry;
mod runner;

pub use error::{BenchError, EntryPoint, ErrorKind, LoadError, LoadFailure, ModuleError};
pub use loader::{Discovery, Suite, SuiteEntry, discover};
/// Whether this platform provides hardware cycle counters (x86_64 RDTSCP or AArch64 CNTVCT_EL0).
/// When `false`, cycle counts are reported as 0 and only wall-clock durations are available.
pub use measure::HAS_CYCLE_COUNTER;
pub use measure::{Measurement, Timer, measure, peak_rss_kb, pin_to_cpu};
pub use module::{
    BenchModule, EntryTable, InitFn, IterationsFn, Module, ModuleSource, RunFn, SetupFn,
    TypedSource, panic_message,
};
pub use overrides::{Override, OverrideError, Overrides, parse_value};
pub use registry::{ModuleDef, find_module, registered_modules, resolve_sources};
pub use runner::{
    FixturePolicy, IterationResult, ModuleOutcome, ModuleState, RunConfig, Runner,
};

/// Internal re-exports for macro use
#[doc(hidden)]
pub mod internal {
    pub use inventory;
}
