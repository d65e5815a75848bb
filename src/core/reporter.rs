//! Diagnostic sink shared by concurrent rule invocations

use std::sync::Mutex;

use super::types::{AnalysisResult, Diagnostic};

/// Append-only diagnostic collector.
///
/// Rules run concurrently over the same immutable tree generation, so the
/// sink must accept appends from multiple threads without lost updates.
#[derive(Debug, Default)]
pub struct Reporter {
    sink: Mutex<Vec<Diagnostic>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        match self.sink.lock() {
            Ok(mut sink) => sink.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }

    pub fn extend(&self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        match self.sink.lock() {
            Ok(mut sink) => sink.extend(diagnostics),
            Err(poisoned) => poisoned.into_inner().extend(diagnostics),
        }
    }

    pub fn len(&self) -> usize {
        match self.sink.lock() {
            Ok(sink) => sink.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_result(self) -> AnalysisResult {
        let diagnostics = match self.sink.into_inner() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        AnalysisResult { diagnostics }
    }
}
