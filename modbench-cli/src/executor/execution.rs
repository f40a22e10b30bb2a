//! Suite Execution
//!
//! Hands the suite to the core [`Runner`] one module at a time and keeps a
//! progress bar on stderr. Everything here is sequential: the runner owns
//! the thread while a module is being measured.

use indicatif::{ProgressBar, ProgressStyle};
use modbench_core::{ModuleOutcome, RunConfig, Runner, Suite, pin_to_cpu};

/// Configuration for suite execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Settings forwarded to the runner
    pub run: RunConfig,
    /// Core to pin the harness thread to
    pub pin_cpu: Option<usize>,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

/// Executes suites and collects per-module outcomes
pub struct Executor {
    runner: Runner,
    pin_cpu: Option<usize>,
    show_progress: bool,
}

impl Executor {
    /// Create an executor from the resolved configuration
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            runner: Runner::new(config.run),
            pin_cpu: config.pin_cpu,
            show_progress: config.show_progress,
        }
    }

    /// Runner settings in effect
    pub fn run_config(&self) -> &RunConfig {
        self.runner.config()
    }

    /// Execute every module of the suite in discovery order
    pub fn execute(&self, suite: Suite) -> Vec<ModuleOutcome> {
        if let Some(cpu) = self.pin_cpu {
            match pin_to_cpu(cpu) {
                Ok(()) => tracing::debug!(cpu, "pinned harness thread"),
                Err(e) => tracing::warn!(cpu, "failed to pin harness thread: {}", e),
            }
        }

        let pb = if self.show_progress {
            let pb = ProgressBar::new(suite.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut outcomes = Vec::with_capacity(suite.len());
        for entry in suite {
            pb.set_message(entry.module.name().to_string());
            outcomes.push(self.runner.run_module(entry));
            pb.inc(1);
        }

        pb.finish_and_clear();
        outcomes
    }
}
