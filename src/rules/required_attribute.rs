//! AC0001: types implementing the marker interface must carry the
//! designated annotation

use crate::core::{CancelToken, Diagnostic, Reporter, Severity, SymbolTable, SyntaxTree};

use super::{render_message, NodeInterest, Rule, RuleDescriptor};

pub const RULE_ID: &str = "AC0001";

const INTERESTS: &[NodeInterest] = &[NodeInterest::TypeSymbol];

/// Flags every type that implements the configured marker interface
/// (directly or through any interface chain) without the configured
/// annotation class.
pub struct RequiredAttributeRule {
    descriptor: RuleDescriptor,
    marker_interface: String,
    attribute_class: String,
}

impl RequiredAttributeRule {
    pub fn new(marker_interface: impl Into<String>, attribute_class: impl Into<String>) -> Self {
        Self {
            descriptor: RuleDescriptor {
                id: RULE_ID,
                name: "ComponentsMustDeclareName",
                severity: Severity::Warning,
                message_template: "Type '{0}' implements '{1}' and should be annotated with [{2}]",
                interests: INTERESTS,
            },
            marker_interface: marker_interface.into(),
            attribute_class: attribute_class.into(),
        }
    }
}

impl Rule for RequiredAttributeRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn analyze(
        &self,
        _tree: &SyntaxTree,
        symbols: &SymbolTable,
        reporter: &Reporter,
        cancel: &CancelToken,
    ) {
        for symbol in symbols.types() {
            if cancel.is_cancelled() {
                return;
            }
            if !symbols.implements(symbol, &self.marker_interface) {
                continue;
            }

            // an annotation whose class did not resolve never matches
            let annotated = symbol
                .annotations
                .iter()
                .any(|a| a.class_name.as_deref() == Some(self.attribute_class.as_str()));
            if annotated {
                continue;
            }

            let args = vec![
                symbol.name.clone(),
                self.marker_interface.clone(),
                self.attribute_class.clone(),
            ];
            reporter.report(
                Diagnostic::new(
                    self.descriptor.id,
                    self.descriptor.severity,
                    symbol.location,
                    render_message(self.descriptor.message_template, &args),
                )
                .with_args(args),
            );
        }
    }
}
