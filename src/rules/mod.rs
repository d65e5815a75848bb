//! Analysis rules
//!
//! Each rule declares a descriptor (stable id, severity, message template,
//! and the node/symbol kinds it observes) and is evaluated over one
//! immutable tree generation. The registry is an explicitly constructed
//! value handed to the entry points at startup; there is no process-wide
//! rule state.

pub mod brace_omission;
pub mod required_attribute;

pub use brace_omission::BraceOmissionRule;
pub use required_attribute::RequiredAttributeRule;

use log::debug;
use rayon::prelude::*;
use regex::Regex;
use std::sync::LazyLock;

use crate::config::Config;
use crate::core::{AnalysisResult, CancelToken, Reporter, Severity, SymbolTable, SyntaxTree};

/// Node/symbol kinds a rule wants to observe, so a hosting dispatcher can
/// invoke it only where relevant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeInterest {
    Conditional,
    Loop,
    ResourceScope,
    TypeSymbol,
}

/// Static description of a rule
#[derive(Debug, Clone)]
pub struct RuleDescriptor {
    /// Stable rule identifier (e.g., "SA1503")
    pub id: &'static str,
    /// Short machine-friendly name
    pub name: &'static str,
    pub severity: Severity,
    /// Message template with positional `{0}`-style arguments
    pub message_template: &'static str,
    pub interests: &'static [NodeInterest],
}

static TEMPLATE_ARG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\d+)\}").unwrap());

/// Render a message template against positional arguments; unknown
/// placeholders render as empty
pub fn render_message(template: &str, args: &[String]) -> String {
    TEMPLATE_ARG
        .replace_all(template, |caps: &regex::Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i).cloned())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Trait for analysis rules
pub trait Rule: Send + Sync {
    fn descriptor(&self) -> &RuleDescriptor;

    /// Evaluate the rule over one tree generation, appending findings to
    /// the reporter. Never fails: malformed-but-parseable input at worst
    /// produces no diagnostic for that node.
    fn analyze(
        &self,
        tree: &SyntaxTree,
        symbols: &SymbolTable,
        reporter: &Reporter,
        cancel: &CancelToken,
    );
}

/// Immutable set of rules for one analysis configuration
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both built-in rules, configured from `config`
    pub fn with_default_rules(config: &Config) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(BraceOmissionRule::new()));
        registry.register(Box::new(RequiredAttributeRule::new(
            config.required_attribute.marker_interface.clone(),
            config.required_attribute.attribute_class.clone(),
        )));
        registry
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &RuleDescriptor> {
        self.rules.iter().map(|r| r.descriptor())
    }

    /// Run every rule sequentially, in registration order
    pub fn run(
        &self,
        tree: &SyntaxTree,
        symbols: &SymbolTable,
        cancel: &CancelToken,
    ) -> AnalysisResult {
        let reporter = Reporter::new();
        for rule in &self.rules {
            if cancel.is_cancelled() {
                break;
            }
            debug!("running rule {}", rule.descriptor().id);
            rule.analyze(tree, symbols, &reporter, cancel);
        }
        reporter.into_result()
    }

    /// Run every rule in parallel; analysis is read-only over immutable
    /// nodes/symbols, so rules need no coordination beyond the reporter
    pub fn run_parallel(
        &self,
        tree: &SyntaxTree,
        symbols: &SymbolTable,
        cancel: &CancelToken,
    ) -> AnalysisResult {
        let reporter = Reporter::new();
        self.rules.par_iter().for_each(|rule| {
            if cancel.is_cancelled() {
                return;
            }
            debug!("running rule {}", rule.descriptor().id);
            rule.analyze(tree, symbols, &reporter, cancel);
        });
        reporter.into_result()
    }
}
