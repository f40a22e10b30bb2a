//! CSV Output
//!
//! One row per module. Undefined statistics are left empty.

use crate::report::Report;

const HEADER: [&str; 12] = [
    "name",
    "status",
    "iterations",
    "count",
    "total_ns",
    "mean_ns",
    "min_ns",
    "max_ns",
    "median_ns",
    "std_dev_ns",
    "error_kind",
    "error_message",
];

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{:.0}", v)).unwrap_or_default()
}

/// Generate a CSV report with a header row.
pub fn generate_csv_report(report: &Report) -> Result<String, ::csv::Error> {
    let mut wtr = ::csv::WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(HEADER)?;

    for result in &report.results {
        let (count, total, mean, min, max, median, std_dev) = match &result.metrics {
            Some(m) => (
                m.count.to_string(),
                format!("{:.0}", m.total_ns),
                number(m.mean_ns),
                number(m.min_ns),
                number(m.max_ns),
                number(m.median_ns),
                number(m.std_dev_ns),
            ),
            None => Default::default(),
        };
        let (kind, message) = result
            .failure
            .as_ref()
            .map(|f| (f.kind.as_str(), f.message.as_str()))
            .unwrap_or_default();

        wtr.write_record([
            result.name.as_str(),
            &result.status.to_string(),
            &result.iterations_planned.to_string(),
            &count,
            &total,
            &mean,
            &min,
            &max,
            &median,
            &std_dev,
            kind,
            message,
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ::csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
