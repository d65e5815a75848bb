//! Output formatters for analysis results

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::core::{AnalysisResult, Diagnostic};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Trait for output formatters
pub trait Formatter {
    /// Format a full analysis result
    fn format(&self, result: &AnalysisResult) -> String;

    /// Format a single diagnostic (for streaming output)
    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String;
}

/// Get a formatter for the specified format
pub fn get_formatter(format: OutputFormat, colored: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(colored)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}
