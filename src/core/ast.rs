//! Immutable syntax tree handles
//!
//! The tree is produced by an external parser and is read-only for the
//! duration of an analysis pass. Rewrites never mutate a node in place:
//! they rebuild the spine above the target declaration and share every
//! unaffected subtree through `Arc`.

use std::sync::Arc;

use super::types::{Position, Span};

/// Declaration keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
        }
    }
}

/// Argument of an annotation as written in source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationArg {
    /// String literal; stored unquoted
    Str(String),
    /// Any other expression, stored verbatim
    Expr(String),
}

/// Declarative metadata attached to a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub span: Span,
    pub class_name: String,
    pub arguments: Vec<AnnotationArg>,
}

/// A method member; the body is always a statement (normally a block)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub span: Span,
    pub signature: String,
    pub body: Arc<Stmt>,
}

/// A type declaration with its attached annotations and members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub span: Span,
    pub kind: TypeKind,
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub bases: Vec<String>,
    pub methods: Vec<Method>,
}

/// Closed statement union; rules match exhaustively over the variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    If(IfStmt),
    While(LoopStmt),
    DoWhile(LoopStmt),
    For(LoopStmt),
    ForEach(LoopStmt),
    Using(ScopeStmt),
    Lock(ScopeStmt),
    Block(BlockStmt),
    Expr(ExprStmt),
}

/// Conditional; `else_branch` holding another `If` forms an else-if chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub span: Span,
    pub condition: String,
    pub then_branch: Arc<Stmt>,
    pub else_branch: Option<Arc<Stmt>>,
}

/// while / do-while / for / foreach; `clause` is the text inside the parens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopStmt {
    pub span: Span,
    pub clause: String,
    pub body: Arc<Stmt>,
}

/// using / lock resource scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeStmt {
    pub span: Span,
    pub clause: String,
    pub body: Arc<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStmt {
    pub span: Span,
    pub statements: Vec<Arc<Stmt>>,
}

/// Any other statement, stored verbatim including the trailing semicolon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    pub span: Span,
    pub text: String,
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::If(s) => s.span,
            Stmt::While(s) | Stmt::DoWhile(s) | Stmt::For(s) | Stmt::ForEach(s) => s.span,
            Stmt::Using(s) | Stmt::Lock(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Stmt::Block(_))
    }
}

/// One generation of a parsed source unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    generation: u64,
    declarations: Vec<Arc<TypeDecl>>,
}

impl SyntaxTree {
    pub fn new(declarations: Vec<Arc<TypeDecl>>) -> Self {
        Self {
            generation: 0,
            declarations,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn declarations(&self) -> &[Arc<TypeDecl>] {
        &self.declarations
    }

    /// Find the declaration whose span contains `position`.
    ///
    /// When spans overlap (a rewritten declaration can grow into the line
    /// where its next sibling starts), the declaration with the greatest
    /// start position wins, so a position at a sibling's own start always
    /// resolves to that sibling.
    pub fn find_declaration_at(&self, position: Position) -> Option<&Arc<TypeDecl>> {
        self.declarations
            .iter()
            .filter(|d| d.span.contains(position))
            .max_by_key(|d| d.span.start)
    }

    /// Single-node substitution producing the next tree generation.
    ///
    /// Sibling declarations are shared, not copied. Returns `None` when
    /// `target` is not a declaration of this generation.
    pub fn replace_declaration(
        &self,
        target: &TypeDecl,
        replacement: Arc<TypeDecl>,
    ) -> Option<SyntaxTree> {
        let index = self
            .declarations
            .iter()
            .position(|d| d.span == target.span && d.name == target.name)?;

        let mut declarations = Vec::with_capacity(self.declarations.len());
        for (i, decl) in self.declarations.iter().enumerate() {
            if i == index {
                declarations.push(Arc::clone(&replacement));
            } else {
                declarations.push(Arc::clone(decl));
            }
        }

        Some(SyntaxTree {
            generation: self.generation + 1,
            declarations,
        })
    }
}
