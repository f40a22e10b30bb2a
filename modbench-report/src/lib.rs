#![warn(missing_docs)]
//! modbench Report - Report Model and Emitters
//!
//! Holds the serializable report produced after a suite run and the
//! machine-readable output formats:
//! - JSON (full schema)
//! - CSV (one row per module)
//!
//! The human-readable listing is rendered by the CLI.

mod csv;
mod json;
#[allow(missing_docs)]
mod report;

pub use self::csv::generate_csv_report;
pub use json::generate_json_report;
pub use report::{
    FailureInfo, ModuleReport, ModuleStatus, Report, ReportConfig, ReportMeta, ReportSummary,
    SCHEMA_VERSION, SystemInfo,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Format a nanosecond duration with a readable unit
pub fn format_duration(nanos: f64) -> String {
    if nanos < 1_000.0 {
        format!("{:.2} ns", nanos)
    } else if nanos < 1_000_000.0 {
        format!("{:.2} µs", nanos / 1_000.0)
    } else if nanos < 1_000_000_000.0 {
        format!("{:.2} ms", nanos / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos / 1_000_000_000.0)
    }
}
