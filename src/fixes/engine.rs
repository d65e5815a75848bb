//! Automated rewrites for fixable diagnostics

use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

use crate::config::Config;
use crate::core::{Annotation, AnnotationArg, Diagnostic, Span, SyntaxTree};
use crate::rules::required_attribute;

use super::format::CanonicalFormatter;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixError {
    #[error("no registered fix for rule '{0}'")]
    NotFixable(String),

    /// The diagnostic was computed against an older tree generation and
    /// its location no longer names a declaration
    #[error("diagnosed declaration no longer exists at line {line}, column {column}")]
    StaleLocation { line: usize, column: usize },
}

/// Applies the annotation fix for missing-name diagnostics.
///
/// Every application produces a new tree generation; the input tree is
/// never modified.
pub struct RewriteEngine {
    attribute_class: String,
    formatter: CanonicalFormatter,
}

impl RewriteEngine {
    pub fn new(attribute_class: impl Into<String>) -> Self {
        Self {
            attribute_class: attribute_class.into(),
            formatter: CanonicalFormatter::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.required_attribute.attribute_class.clone())
    }

    pub fn can_fix(&self, rule_id: &str) -> bool {
        rule_id == required_attribute::RULE_ID
    }

    /// Apply the fix for one diagnostic, returning the next tree
    /// generation. The annotation value is the declaration name rendered
    /// in SCREAMING_CASE; existing annotations keep their order and the
    /// new one is appended last.
    pub fn apply(&self, tree: &SyntaxTree, diagnostic: &Diagnostic) -> Result<SyntaxTree, FixError> {
        if !self.can_fix(&diagnostic.rule_id) {
            return Err(FixError::NotFixable(diagnostic.rule_id.clone()));
        }

        let stale = || FixError::StaleLocation {
            line: diagnostic.span.start.line,
            column: diagnostic.span.start.column,
        };

        let target = tree
            .find_declaration_at(diagnostic.span.start)
            .ok_or_else(stale)?;

        let value = screaming_case(&target.name);
        debug!("annotating {} with value {}", target.name, value);

        let mut draft = (**target).clone();
        draft.annotations.push(Annotation {
            span: Span::default(),
            class_name: self.attribute_class.clone(),
            arguments: vec![AnnotationArg::Str(value)],
        });

        let rebuilt = self.formatter.reformat(&draft, target.span.start);
        let target = Arc::clone(target);
        tree.replace_declaration(&target, Arc::new(rebuilt))
            .ok_or_else(stale)
    }

    /// Apply fixes for a batch of diagnostics, skipping any that are not
    /// fixable or went stale along the way. Returns the final generation
    /// and the number of fixes applied.
    pub fn apply_all(&self, tree: &SyntaxTree, diagnostics: &[Diagnostic]) -> (SyntaxTree, usize) {
        let mut current = tree.clone();
        let mut applied = 0;
        for diagnostic in diagnostics {
            match self.apply(&current, diagnostic) {
                Ok(next) => {
                    current = next;
                    applied += 1;
                }
                Err(e) => warn!("skipping {}: {}", diagnostic.rule_id, e),
            }
        }
        (current, applied)
    }
}

/// Render a CamelCase identifier in SCREAMING_CASE. Acronym runs stay
/// together: `HTTPServer` becomes `HTTP_SERVER`.
pub fn screaming_case(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut out = String::with_capacity(identifier.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            continue;
        }
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase()
                    && chars.get(i + 1).is_some_and(|n| n.is_lowercase()));
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }

    out
}
