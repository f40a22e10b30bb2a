//! Error taxonomy
//!
//! Module code reports failures with [`ModuleError`]. The harness turns those
//! into a [`BenchError`] whose kind depends on the lifecycle stage that failed.
//! Every variant is caught at the module boundary and never aborts a suite.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failure raised by benchmark module code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ModuleError {
    message: String,
}

impl ModuleError {
    /// Create an error carrying a human-readable message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error for a configuration value the module cannot work without
    pub fn missing_parameter(name: &str) -> Self {
        Self::new(format!("required parameter `{name}` is not set"))
    }

    /// The message text
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ModuleError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ModuleError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// The four lifecycle entry points of a benchmark module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryPoint {
    /// Establishes the module configuration
    Init,
    /// Reports the iteration count fixed by `init`
    GetIterations,
    /// Builds the fixture used by `run`
    Setup,
    /// The measured unit
    Run,
}

impl EntryPoint {
    /// Entry points a module cannot be loaded without. `setup` defaults to a no-op.
    pub const REQUIRED: [EntryPoint; 3] = [EntryPoint::Init, EntryPoint::GetIterations, EntryPoint::Run];

    /// Name of the entry point as module authors spell it
    pub fn as_str(self) -> &'static str {
        match self {
            EntryPoint::Init => "init",
            EntryPoint::GetIterations => "get_iterations",
            EntryPoint::Setup => "setup",
            EntryPoint::Run => "run",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join_entry_points(points: &[EntryPoint]) -> String {
    points
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a candidate module was rejected by the loader
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    /// One or more required entry points are absent
    #[error("missing required entry point(s): {}", join_entry_points(.0))]
    MissingEntryPoints(Vec<EntryPoint>),

    /// The source names a module nobody registered
    #[error("no module registered under this name")]
    NotRegistered,
}

/// A candidate module that could not be loaded, tagged with its source identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{module}: {reason}")]
pub struct LoadError {
    /// Source identity (module name)
    pub module: String,
    /// Position of the source in the discovery order
    pub position: usize,
    /// What was wrong with it
    pub reason: LoadFailure,
}

/// Per-module failure record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenchError {
    /// Module rejected before it joined the suite
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Bad or missing output from `init` / `get_iterations`
    #[error("{0}")]
    Configuration(String),

    /// Fixture construction failed
    #[error("{0}")]
    Setup(String),

    /// A `run` invocation failed; `iteration` is 1-based
    #[error("iteration {iteration}: {message}")]
    Runtime {
        /// Index of the failing iteration
        iteration: u64,
        /// Message reported by the module
        message: String,
    },

    /// Wall-clock budget exhausted between iterations
    #[error("time budget of {budget:?} exhausted after {completed} iteration(s)")]
    Timeout {
        /// Configured budget
        budget: Duration,
        /// Iterations finished before the budget ran out
        completed: u64,
    },
}

impl BenchError {
    /// Kind of the error, used when rendering failure records
    pub fn kind(&self) -> ErrorKind {
        match self {
            BenchError::Load(_) => ErrorKind::Load,
            BenchError::Configuration(_) => ErrorKind::Configuration,
            BenchError::Setup(_) => ErrorKind::Setup,
            BenchError::Runtime { .. } => ErrorKind::Runtime,
            BenchError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Iteration the error is tied to, if any
    pub fn iteration(&self) -> Option<u64> {
        match self {
            BenchError::Runtime { iteration, .. } => Some(*iteration),
            _ => None,
        }
    }
}

/// Error kinds as they appear in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `LoadError`
    Load,
    /// `ConfigurationError`
    Configuration,
    /// `SetupError`
    Setup,
    /// `RuntimeError`
    Runtime,
    /// `TimeoutError`
    Timeout,
}

impl ErrorKind {
    /// Report spelling of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Load => "LoadError",
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Setup => "SetupError",
            ErrorKind::Runtime => "RuntimeError",
            ErrorKind::Timeout => "TimeoutError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_points_message() {
        let err = LoadError {
            module: "sorter".to_string(),
            position: 2,
            reason: LoadFailure::MissingEntryPoints(vec![EntryPoint::Init, EntryPoint::Run]),
        };
        assert_eq!(
            err.to_string(),
            "sorter: missing required entry point(s): init, run"
        );
    }

    #[test]
    fn test_kinds() {
        let runtime = BenchError::Runtime {
            iteration: 2,
            message: "boom".to_string(),
        };
        assert_eq!(runtime.kind(), ErrorKind::Runtime);
        assert_eq!(runtime.iteration(), Some(2));
        assert_eq!(runtime.to_string(), "iteration 2: boom");

        let config = BenchError::Configuration("no iterations".to_string());
        assert_eq!(config.kind().as_str(), "ConfigurationError");
        assert_eq!(config.iteration(), None);
    }

    #[test]
    fn test_load_error_converts() {
        let err: BenchError = LoadError {
            module: "ghost".to_string(),
            position: 0,
            reason: LoadFailure::NotRegistered,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Load);
        assert_eq!(err.to_string(), "ghost: no module registered under this name");
    }
}
