//! Output Formatting
//!
//! Human-readable rendering of a [`Report`]: one block per module in
//! discovery order. Successful modules show their statistics; failed ones
//! show the error kind and message, followed by whatever iterations were
//! collected before the failure.

use modbench_report::{ModuleReport, ModuleStatus, Report, format_duration};
use modbench_stats::Summary;

fn undefined_or(value: Option<f64>) -> String {
    value.map(format_duration).unwrap_or_else(|| "-".to_string())
}

fn summary_line(summary: &Summary) -> String {
    format!(
        "count: {}  total: {}  mean: {}  min: {}  max: {}",
        summary.count,
        format_duration(summary.total_ns),
        undefined_or(summary.mean_ns),
        undefined_or(summary.min_ns),
        undefined_or(summary.max_ns),
    )
}

fn push_module(output: &mut String, result: &ModuleReport) {
    let status_icon = match result.status {
        ModuleStatus::Ok => "✓",
        ModuleStatus::Failed => "✗",
    };
    output.push_str(&format!("  {} {}  {}\n", status_icon, result.name, result.status));

    if let Some(failure) = &result.failure {
        output.push_str(&format!("      {}: {}\n", failure.kind, failure.message));
    }

    if let Some(metrics) = &result.metrics {
        let prefix = match result.status {
            ModuleStatus::Ok => "",
            ModuleStatus::Failed => "partial ",
        };
        output.push_str(&format!("      {}{}\n", prefix, summary_line(metrics)));
        if metrics.count > 1 {
            output.push_str(&format!(
                "      median: {}  stddev: {}\n",
                undefined_or(metrics.median_ns),
                undefined_or(metrics.std_dev_ns),
            ));
        }
    }

    if let (Some(warmup), Some(steady)) = (&result.warmup, &result.steady) {
        output.push_str(&format!(
            "      warmup ({}): mean {}  steady ({}): mean {}\n",
            warmup.count,
            undefined_or(warmup.mean_ns),
            steady.count,
            undefined_or(steady.mean_ns),
        ));
    }

    if let Some(cycles) = &result.cycles {
        output.push_str(&format!(
            "      cycles: mean {:.0}  min {}  max {}  ({:.2} GHz)\n",
            cycles.mean_cycles, cycles.min_cycles, cycles.max_cycles, cycles.cycles_per_ns
        ));
    }

    if let Some(kb) = result.rss_growth_kb.filter(|kb| *kb > 0) {
        output.push_str(&format!("      peak rss growth: {} KiB\n", kb));
    }

    if !result.labels.is_empty() {
        output.push_str(&format!("      ran: {}\n", result.labels.join(", ")));
    }
}

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("modbench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for result in &report.results {
        push_module(&mut output, result);
        output.push('\n');
    }

    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  {} modules: {} ok, {} failed ({:.1} ms)\n",
        report.summary.total, report.summary.ok, report.summary.failed, report.summary.duration_ms
    ));

    output
}
