//! System Metadata Collection
//!
//! Collects the run settings and basic host information stored in the
//! report header. Linux-specific data (CPU model) degrades to "Unknown"
//! on other platforms.

use chrono::Utc;
use modbench_core::RunConfig;
use modbench_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};

/// Build report metadata from the run settings
pub fn build_report_meta(config: &RunConfig) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
    };

    let overrides = config
        .overrides
        .iter()
        .map(|o| match &o.module {
            Some(module) => format!("{}.{}={}", module, o.key, o.value),
            None => format!("{}={}", o.key, o.value),
        })
        .collect();

    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
        config: ReportConfig {
            multiplier: config.multiplier,
            fixture: config.fixture.to_string(),
            warmup_iterations: config.warmup_iterations,
            timeout_ms: config.timeout.map(|t| t.as_millis() as u64),
            overrides,
        },
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
