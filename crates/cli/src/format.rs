//! Output formatting for search results and errors.

use promrag::MetricMetadata;

/// Output mode selected by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Numbered, human-readable listing
    Human,
    /// JSON array of metadata objects
    Json,
}

/// Format ranked search results.
pub fn format_results(results: &[MetricMetadata], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            serde_json::to_string_pretty(results).unwrap_or_else(|_| "[]".to_string())
        }
        OutputMode::Human => {
            if results.is_empty() {
                return "(no results)".to_string();
            }
            let mut out = Vec::with_capacity(results.len());
            for (i, metric) in results.iter().enumerate() {
                let mut entry = format!("{}) {}", i + 1, metric.name);
                if !metric.metric_type.is_empty() {
                    entry.push_str(&format!(" [{}]", metric.metric_type));
                }
                if !metric.help.is_empty() {
                    entry.push_str(&format!("\n   {}", metric.help));
                }
                if !metric.labels.is_empty() {
                    entry.push_str(&format!("\n   labels: {}", metric.joined_labels()));
                }
                out.push(entry);
            }
            out.join("\n")
        }
    }
}

/// Format an error message.
pub fn format_error(err: &dyn std::fmt::Display, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::json!({ "error": err.to_string() }).to_string(),
        OutputMode::Human => format!("(error) {}", err),
    }
}
