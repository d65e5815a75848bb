//! JSON output formatter

use super::Formatter;
use crate::core::{AnalysisResult, Diagnostic};
use serde::Serialize;

/// JSON formatter
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    diagnostics: &'a [Diagnostic],
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    errors: usize,
    warnings: usize,
    info: usize,
}

impl Formatter for JsonFormatter {
    fn format(&self, result: &AnalysisResult) -> String {
        let output = JsonOutput {
            diagnostics: &result.diagnostics,
            summary: JsonSummary {
                total: result.len(),
                errors: result.error_count(),
                warnings: result.warning_count(),
                info: result.info_count(),
            },
        };

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        serde_json::to_string(diag).unwrap_or_else(|_| "{}".to_string())
    }
}
