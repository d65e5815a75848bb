//! Core data model: tree handles, symbols, diagnostics, sinks

pub mod ast;
pub mod cancel;
pub mod reporter;
pub mod symbols;
pub mod types;

pub use ast::{
    Annotation, AnnotationArg, BlockStmt, ExprStmt, IfStmt, LoopStmt, Method, ScopeStmt, Stmt,
    SyntaxTree, TypeDecl, TypeKind,
};
pub use cancel::CancelToken;
pub use reporter::Reporter;
pub use symbols::{AnnotationBinding, SymbolTable, TypeSymbol};
pub use types::{AnalysisResult, Diagnostic, Position, Severity, Span};
