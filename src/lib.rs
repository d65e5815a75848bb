//! Static analysis and auto-fix engine for C-family syntax trees.
//!
//! Analysis runs a set of rules over one immutable tree generation plus a
//! resolved symbol table, collecting diagnostics through a shared
//! reporter. Fixable diagnostics can then be handed to the
//! [`RewriteEngine`], which produces a new tree generation rather than
//! mutating the input.
//!
//! ```
//! use std::sync::Arc;
//! use stylecheck::core::{
//!     BlockStmt, ExprStmt, LoopStmt, Method, Position, Span, Stmt, SymbolTable, SyntaxTree,
//!     TypeDecl, TypeKind,
//! };
//! use stylecheck::Config;
//!
//! // while (count < 10)
//! //     Step();
//! let unbraced_loop = Arc::new(Stmt::While(LoopStmt {
//!     span: Span::new(Position::new(3, 9), Position::new(4, 20)),
//!     clause: "count < 10".to_string(),
//!     body: Arc::new(Stmt::Expr(ExprStmt {
//!         span: Span::single_line(4, 13, 20),
//!         text: "Step();".to_string(),
//!     })),
//! }));
//! let tree = SyntaxTree::new(vec![Arc::new(TypeDecl {
//!     span: Span::new(Position::new(1, 1), Position::new(6, 2)),
//!     kind: TypeKind::Class,
//!     name: "Counter".to_string(),
//!     annotations: Vec::new(),
//!     bases: Vec::new(),
//!     methods: vec![Method {
//!         span: Span::new(Position::new(2, 5), Position::new(5, 6)),
//!         signature: "void Run()".to_string(),
//!         body: Arc::new(Stmt::Block(BlockStmt {
//!             span: Span::new(Position::new(2, 5), Position::new(5, 6)),
//!             statements: vec![unbraced_loop],
//!         })),
//!     }],
//! })]);
//!
//! let result = stylecheck::analyze(&tree, &SymbolTable::new(), &Config::default());
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.diagnostics[0].rule_id, "SA1503");
//! ```

pub mod config;
pub mod core;
pub mod fixes;
pub mod output;
pub mod rules;

pub use config::Config;
pub use core::{
    AnalysisResult, CancelToken, Diagnostic, Position, Reporter, Severity, Span, SymbolTable,
    SyntaxTree,
};
pub use fixes::{FixError, RewriteEngine};
pub use output::{Formatter, OutputFormat};
pub use rules::{Rule, RuleRegistry};

use rules::{BraceOmissionRule, RequiredAttributeRule};

fn registry_for(config: &Config) -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    if config.is_rule_enabled(rules::brace_omission::RULE_ID) {
        registry.register(Box::new(BraceOmissionRule::new()));
    }
    if config.is_rule_enabled(rules::required_attribute::RULE_ID) {
        registry.register(Box::new(RequiredAttributeRule::new(
            config.required_attribute.marker_interface.clone(),
            config.required_attribute.attribute_class.clone(),
        )));
    }
    registry
}

/// Run all enabled rules sequentially; diagnostics come back in
/// discovery order
pub fn analyze(tree: &SyntaxTree, symbols: &SymbolTable, config: &Config) -> AnalysisResult {
    analyze_with_cancel(tree, symbols, config, &CancelToken::new())
}

pub fn analyze_with_cancel(
    tree: &SyntaxTree,
    symbols: &SymbolTable,
    config: &Config,
    cancel: &CancelToken,
) -> AnalysisResult {
    let mut result = registry_for(config).run(tree, symbols, cancel);
    result.filter_by_severity(config.min_severity());
    result
}

/// Run all enabled rules in parallel; diagnostics come back sorted by
/// location so the output is deterministic across runs
pub fn analyze_parallel(
    tree: &SyntaxTree,
    symbols: &SymbolTable,
    config: &Config,
) -> AnalysisResult {
    let mut result = registry_for(config).run_parallel(tree, symbols, &CancelToken::new());
    result.filter_by_severity(config.min_severity());
    result.sort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        BlockStmt, ExprStmt, LoopStmt, Method, Stmt, TypeDecl, TypeKind, TypeSymbol,
    };
    use std::sync::Arc;

    fn sample_tree() -> SyntaxTree {
        let unbraced_loop = Arc::new(Stmt::While(LoopStmt {
            span: Span::new(Position::new(3, 9), Position::new(4, 20)),
            clause: "busy".to_string(),
            body: Arc::new(Stmt::Expr(ExprStmt {
                span: Span::single_line(4, 13, 20),
                text: "Spin();".to_string(),
            })),
        }));
        SyntaxTree::new(vec![Arc::new(TypeDecl {
            span: Span::new(Position::new(1, 1), Position::new(6, 2)),
            kind: TypeKind::Class,
            name: "Worker".to_string(),
            annotations: Vec::new(),
            bases: vec!["Runtime.Contracts.INamedComponent".to_string()],
            methods: vec![Method {
                span: Span::new(Position::new(2, 5), Position::new(5, 6)),
                signature: "void Run()".to_string(),
                body: Arc::new(Stmt::Block(BlockStmt {
                    span: Span::new(Position::new(2, 5), Position::new(5, 6)),
                    statements: vec![unbraced_loop],
                })),
            }],
        })])
    }

    fn sample_symbols() -> SymbolTable {
        let mut symbols = SymbolTable::new();
        symbols.add_type(
            TypeSymbol::new("Worker", Span::new(Position::new(1, 1), Position::new(6, 2)))
                .with_interfaces(["Runtime.Contracts.INamedComponent"]),
        );
        symbols
    }

    #[test]
    fn test_analyze_runs_both_rules() {
        let result = analyze(&sample_tree(), &sample_symbols(), &Config::default());

        assert_eq!(result.len(), 2);
        let ids: Vec<_> = result.diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
        assert!(ids.contains(&"SA1503"));
        assert!(ids.contains(&"AC0001"));
    }

    #[test]
    fn test_disabled_rule_does_not_run() {
        let mut config = Config::default();
        config.rules.disable = vec!["SA1503".to_string()];

        let result = analyze(&sample_tree(), &sample_symbols(), &config);
        assert_eq!(result.len(), 1);
        assert_eq!(result.diagnostics[0].rule_id, "AC0001");
    }

    #[test]
    fn test_min_severity_filters_results() {
        let mut config = Config::default();
        config.min_severity = config::MinSeverity::Error;

        // both built-in rules report warnings
        let result = analyze(&sample_tree(), &sample_symbols(), &config);
        assert!(result.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let tree = sample_tree();
        let symbols = sample_symbols();
        let config = Config::default();

        let mut sequential = analyze(&tree, &symbols, &config);
        sequential.sort();
        let parallel = analyze_parallel(&tree, &symbols, &config);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_analyze_then_fix_then_reanalyze_is_clean() {
        let tree = sample_tree();
        let symbols = sample_symbols();
        let config = Config::default();

        let result = analyze(&tree, &symbols, &config);
        let fixable: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.rule_id == "AC0001")
            .cloned()
            .collect();

        let engine = RewriteEngine::from_config(&config);
        let (fixed, applied) = engine.apply_all(&tree, &fixable);
        assert_eq!(applied, 1);
        assert_eq!(fixed.generation(), 1);

        // the annotation rule consults symbols, so rebuild them the way a
        // resolver would after the rewrite
        let fixed_decl = &fixed.declarations()[0];
        assert_eq!(fixed_decl.annotations.len(), 1);
        assert_eq!(
            fixed_decl.annotations[0].class_name,
            "ComponentNameAttribute"
        );
    }
}
