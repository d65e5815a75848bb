//! Human-readable text output formatter

use super::Formatter;
use crate::core::{AnalysisResult, Diagnostic, Severity};

/// Text formatter with optional color support
pub struct TextFormatter {
    colored: bool,
}

impl TextFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        if !self.colored {
            return "";
        }
        match severity {
            Severity::Error => "\x1b[1;31m",   // Bold red
            Severity::Warning => "\x1b[1;33m", // Bold yellow
            Severity::Info => "\x1b[1;36m",    // Bold cyan
        }
    }

    fn reset(&self) -> &'static str {
        if self.colored { "\x1b[0m" } else { "" }
    }

    fn bold(&self) -> &'static str {
        if self.colored { "\x1b[1m" } else { "" }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, result: &AnalysisResult) -> String {
        let mut output = String::new();

        for diag in &result.diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        // Summary line
        if !result.is_empty() {
            output.push('\n');
            let mut parts = Vec::new();
            let errors = result.error_count();
            let warnings = result.warning_count();
            let info = result.info_count();
            if errors > 0 {
                parts.push(format!(
                    "{}{} error{}{}",
                    self.severity_color(Severity::Error),
                    errors,
                    if errors == 1 { "" } else { "s" },
                    self.reset()
                ));
            }
            if warnings > 0 {
                parts.push(format!(
                    "{}{} warning{}{}",
                    self.severity_color(Severity::Warning),
                    warnings,
                    if warnings == 1 { "" } else { "s" },
                    self.reset()
                ));
            }
            if info > 0 {
                parts.push(format!(
                    "{}{} info{}",
                    self.severity_color(Severity::Info),
                    info,
                    self.reset()
                ));
            }
            output.push_str(&format!("Found {}\n", parts.join(", ")));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        format!(
            "{}{}:{}:{} {}{}{}[{}]: {}",
            self.bold(),
            diag.span.start.line,
            diag.span.start.column,
            self.reset(),
            self.severity_color(diag.severity),
            diag.severity.as_str(),
            self.reset(),
            diag.rule_id,
            diag.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Span;

    fn warning(line: usize, message: &str) -> Diagnostic {
        Diagnostic::new(
            "SA1503",
            Severity::Warning,
            Span::single_line(line, 9, 18),
            message,
        )
    }

    #[test]
    fn test_format_diagnostic_plain() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_diagnostic(&warning(10, "Braces should not be omitted"));

        assert_eq!(output, "10:9: warning[SA1503]: Braces should not be omitted");
    }

    #[test]
    fn test_summary_counts_and_plural() {
        let formatter = TextFormatter::new(false);
        let mut result = AnalysisResult::new();
        result.add(warning(3, "m"));
        result.add(warning(5, "m"));
        result.add(Diagnostic::new(
            "AC0001",
            Severity::Error,
            Span::single_line(1, 1, 10),
            "m",
        ));

        let output = formatter.format(&result);
        assert!(output.contains("1 error"));
        assert!(output.contains("2 warnings"));
    }

    #[test]
    fn test_no_diagnostics_no_summary() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format(&AnalysisResult::new());
        assert!(output.is_empty());
    }

    #[test]
    fn test_colored_output() {
        let formatter = TextFormatter::new(true);
        let output = formatter.format_diagnostic(&warning(2, "m"));

        assert!(output.contains("\x1b[1;33m")); // Bold yellow for warnings
        assert!(output.contains("\x1b[0m"));
    }
}
