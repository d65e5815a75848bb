//! SA1503: braces should not be omitted from single-line child statements

use std::sync::Arc;

use log::trace;

use crate::core::{
    CancelToken, Diagnostic, IfStmt, Reporter, Severity, Stmt, SymbolTable, SyntaxTree,
};

use super::{NodeInterest, Rule, RuleDescriptor};

pub const RULE_ID: &str = "SA1503";

const INTERESTS: &[NodeInterest] = &[
    NodeInterest::Conditional,
    NodeInterest::Loop,
    NodeInterest::ResourceScope,
];

/// Flags control-flow constructs whose single-line body is not wrapped in
/// a block.
///
/// Multi-line unbraced bodies are a different rule's concern and are
/// suppressed here, as are conditional chains where any branch is already
/// a block (an inconsistent mix belongs to a separate consistency rule).
pub struct BraceOmissionRule {
    descriptor: RuleDescriptor,
}

impl BraceOmissionRule {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor {
                id: RULE_ID,
                name: "BracesShouldNotBeOmitted",
                severity: Severity::Warning,
                message_template: "Braces should not be omitted",
                interests: INTERESTS,
            },
        }
    }

    fn walk(&self, stmt: &Stmt, reached_via_else: bool, reporter: &Reporter, cancel: &CancelToken) {
        match stmt {
            Stmt::If(node) => {
                // a conditional reached through an outer `else` link was
                // already covered by the chain walk from its root
                if !reached_via_else {
                    self.check_chain(node, reporter, cancel);
                }
                self.walk(&node.then_branch, false, reporter, cancel);
                if let Some(else_branch) = &node.else_branch {
                    self.walk(else_branch, true, reporter, cancel);
                }
            }
            Stmt::While(node) | Stmt::DoWhile(node) | Stmt::For(node) | Stmt::ForEach(node) => {
                self.check_child_statement(&node.body, reporter);
                self.walk(&node.body, false, reporter, cancel);
            }
            Stmt::Using(node) => {
                // chained resource scopes form one syntactic unit; only the
                // innermost body is checked
                if !matches!(&*node.body, Stmt::Using(_)) {
                    self.check_child_statement(&node.body, reporter);
                }
                self.walk(&node.body, false, reporter, cancel);
            }
            Stmt::Lock(node) => {
                self.check_child_statement(&node.body, reporter);
                self.walk(&node.body, false, reporter, cancel);
            }
            Stmt::Block(node) => {
                for child in &node.statements {
                    if cancel.is_cancelled() {
                        return;
                    }
                    self.walk(child, false, reporter, cancel);
                }
            }
            Stmt::Expr(_) => {}
        }
    }

    /// Reconstruct the full if/else-if/else chain from its root and check
    /// each collected branch
    fn check_chain(&self, root: &IfStmt, reporter: &Reporter, cancel: &CancelToken) {
        let mut clauses: Vec<Arc<Stmt>> = Vec::new();
        let mut current = root;
        loop {
            if cancel.is_cancelled() {
                return;
            }
            clauses.push(Arc::clone(&current.then_branch));
            match &current.else_branch {
                Some(else_branch) => match &**else_branch {
                    Stmt::If(next) => current = next,
                    _ => {
                        clauses.push(Arc::clone(else_branch));
                        break;
                    }
                },
                None => break,
            }
        }
        trace!("conditional chain with {} clauses", clauses.len());

        // any braced branch suppresses the whole chain
        if clauses.iter().any(|clause| clause.is_block()) {
            return;
        }

        for clause in &clauses {
            self.check_child_statement(clause, reporter);
        }
    }

    fn check_child_statement(&self, child: &Stmt, reporter: &Reporter) {
        if child.is_block() {
            return;
        }

        // multi-line unbraced statements are reported by a separate rule
        let span = child.span();
        if span.is_multi_line() {
            return;
        }

        reporter.report(Diagnostic::new(
            self.descriptor.id,
            self.descriptor.severity,
            span,
            self.descriptor.message_template,
        ));
    }
}

impl Default for BraceOmissionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for BraceOmissionRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn analyze(
        &self,
        tree: &SyntaxTree,
        _symbols: &SymbolTable,
        reporter: &Reporter,
        cancel: &CancelToken,
    ) {
        for decl in tree.declarations() {
            for method in &decl.methods {
                if cancel.is_cancelled() {
                    return;
                }
                self.walk(&method.body, false, reporter, cancel);
            }
        }
    }
}
