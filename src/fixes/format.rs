//! Canonical rendering of rewritten declarations
//!
//! A rewritten declaration carries placeholder spans on its new nodes.
//! The formatter re-renders the whole declaration in canonical layout,
//! anchored at the declaration's original start position, and rebuilds
//! every node with a span that matches the rendered text. Unbraced child
//! statements stay unbraced; only whitespace is normalized.

use std::sync::Arc;

use crate::core::{
    Annotation, AnnotationArg, BlockStmt, ExprStmt, IfStmt, LoopStmt, Method, Position, ScopeStmt,
    Span, Stmt, TypeDecl,
};

const INDENT: &str = "    ";

/// Position-tracking text builder
struct SpanWriter {
    out: String,
    line: usize,
    column: usize,
    level: usize,
    /// Indentation prefix derived from the anchor column
    base: String,
}

impl SpanWriter {
    fn new(anchor: Position) -> Self {
        Self {
            out: String::new(),
            line: anchor.line,
            column: 1,
            level: 0,
            base: " ".repeat(anchor.column.saturating_sub(1)),
        }
    }

    fn mark(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Statement text may span lines (`ExprStmt` is stored verbatim), so
    /// tracking has to account for embedded newlines
    fn push_str(&mut self, text: &str) {
        self.out.push_str(text);
        match text.rfind('\n') {
            Some(last) => {
                self.line += text.matches('\n').count();
                self.column = text[last + 1..].chars().count() + 1;
            }
            None => self.column += text.chars().count(),
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.line += 1;
        self.column = 1;
    }

    fn write_indent(&mut self) {
        let prefix = self.base.clone();
        self.push_str(&prefix);
        for _ in 0..self.level {
            self.push_str(INDENT);
        }
    }

    fn indent(&mut self) {
        self.level += 1;
    }

    fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Renders a declaration in canonical layout and rebuilds its spans
#[derive(Debug, Default)]
pub struct CanonicalFormatter;

impl CanonicalFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Rebuild `decl` with canonical layout, anchored at `anchor` (the
    /// declaration's position in the tree it will be substituted into)
    pub fn reformat(&self, decl: &TypeDecl, anchor: Position) -> TypeDecl {
        let mut writer = SpanWriter::new(anchor);
        self.write_decl(&mut writer, decl)
    }

    /// Canonical source text for `decl`
    pub fn render(&self, decl: &TypeDecl, anchor: Position) -> String {
        let mut writer = SpanWriter::new(anchor);
        self.write_decl(&mut writer, decl);
        writer.finish()
    }

    fn write_decl(&self, w: &mut SpanWriter, decl: &TypeDecl) -> TypeDecl {
        w.write_indent();
        let decl_start = w.mark();

        let mut annotations = Vec::with_capacity(decl.annotations.len());
        for annotation in &decl.annotations {
            let start = w.mark();
            w.push_str(&format!("[{}", annotation.class_name));
            if !annotation.arguments.is_empty() {
                let rendered: Vec<String> = annotation
                    .arguments
                    .iter()
                    .map(|arg| match arg {
                        AnnotationArg::Str(s) => format!("\"{}\"", s),
                        AnnotationArg::Expr(e) => e.clone(),
                    })
                    .collect();
                w.push_str(&format!("({})", rendered.join(", ")));
            }
            w.push_str("]");
            annotations.push(Annotation {
                span: Span::new(start, w.mark()),
                class_name: annotation.class_name.clone(),
                arguments: annotation.arguments.clone(),
            });
            w.newline();
            w.write_indent();
        }

        w.push_str(decl.kind.keyword());
        w.push_str(" ");
        w.push_str(&decl.name);
        if !decl.bases.is_empty() {
            w.push_str(" : ");
            w.push_str(&decl.bases.join(", "));
        }
        w.newline();
        w.write_indent();
        w.push_str("{");
        w.newline();

        w.indent();
        let mut methods = Vec::with_capacity(decl.methods.len());
        for (i, method) in decl.methods.iter().enumerate() {
            w.write_indent();
            let method_start = w.mark();
            w.push_str(&method.signature);
            w.newline();
            w.write_indent();
            let body = self.write_method_body(w, &method.body);
            methods.push(Method {
                span: Span::new(method_start, w.mark()),
                signature: method.signature.clone(),
                body,
            });
            w.newline();
            if i + 1 < decl.methods.len() {
                w.newline();
            }
        }
        w.dedent();

        w.write_indent();
        w.push_str("}");

        TypeDecl {
            span: Span::new(decl_start, w.mark()),
            kind: decl.kind,
            name: decl.name.clone(),
            annotations,
            bases: decl.bases.clone(),
            methods,
        }
    }

    /// Method bodies are always rendered braced; the writer is positioned
    /// at the indented line where `{` goes
    fn write_method_body(&self, w: &mut SpanWriter, body: &Stmt) -> Arc<Stmt> {
        match body {
            Stmt::Block(block) => self.write_block(w, block),
            other => {
                let start = w.mark();
                w.push_str("{");
                w.newline();
                w.indent();
                w.write_indent();
                let statements = vec![self.write_stmt(w, other)];
                w.newline();
                w.dedent();
                w.write_indent();
                w.push_str("}");
                Arc::new(Stmt::Block(BlockStmt {
                    span: Span::new(start, w.mark()),
                    statements,
                }))
            }
        }
    }

    /// Writer is positioned at the indented line where `{` goes
    fn write_block(&self, w: &mut SpanWriter, block: &BlockStmt) -> Arc<Stmt> {
        let start = w.mark();
        w.push_str("{");
        w.newline();
        w.indent();
        let mut statements = Vec::with_capacity(block.statements.len());
        for stmt in &block.statements {
            w.write_indent();
            statements.push(self.write_stmt(w, stmt));
            w.newline();
        }
        w.dedent();
        w.write_indent();
        w.push_str("}");
        Arc::new(Stmt::Block(BlockStmt {
            span: Span::new(start, w.mark()),
            statements,
        }))
    }

    /// A statement's child body: a block opens on the next line at the
    /// same level, any other statement goes on the next line indented
    fn write_child(&self, w: &mut SpanWriter, child: &Stmt) -> Arc<Stmt> {
        if let Stmt::Block(block) = child {
            w.newline();
            w.write_indent();
            self.write_block(w, block)
        } else {
            w.newline();
            w.indent();
            w.write_indent();
            let rebuilt = self.write_stmt(w, child);
            w.dedent();
            rebuilt
        }
    }

    /// Writer is positioned where the statement starts; writes no
    /// trailing newline
    fn write_stmt(&self, w: &mut SpanWriter, stmt: &Stmt) -> Arc<Stmt> {
        match stmt {
            Stmt::Expr(node) => {
                let start = w.mark();
                w.push_str(&node.text);
                Arc::new(Stmt::Expr(ExprStmt {
                    span: Span::new(start, w.mark()),
                    text: node.text.clone(),
                }))
            }
            Stmt::Block(block) => self.write_block(w, block),
            Stmt::If(node) => self.write_if(w, node),
            Stmt::While(node) => {
                self.write_headed(w, "while", &node.clause, &node.body, |span, clause, body| {
                    Stmt::While(LoopStmt { span, clause, body })
                })
            }
            Stmt::For(node) => {
                self.write_headed(w, "for", &node.clause, &node.body, |span, clause, body| {
                    Stmt::For(LoopStmt { span, clause, body })
                })
            }
            Stmt::ForEach(node) => {
                self.write_headed(w, "foreach", &node.clause, &node.body, |span, clause, body| {
                    Stmt::ForEach(LoopStmt { span, clause, body })
                })
            }
            Stmt::Using(node) => {
                self.write_headed(w, "using", &node.clause, &node.body, |span, clause, body| {
                    Stmt::Using(ScopeStmt { span, clause, body })
                })
            }
            Stmt::Lock(node) => {
                self.write_headed(w, "lock", &node.clause, &node.body, |span, clause, body| {
                    Stmt::Lock(ScopeStmt { span, clause, body })
                })
            }
            Stmt::DoWhile(node) => {
                let start = w.mark();
                w.push_str("do");
                let body = self.write_child(w, &node.body);
                w.newline();
                w.write_indent();
                w.push_str(&format!("while ({});", node.clause));
                Arc::new(Stmt::DoWhile(LoopStmt {
                    span: Span::new(start, w.mark()),
                    clause: node.clause.clone(),
                    body,
                }))
            }
        }
    }

    fn write_headed(
        &self,
        w: &mut SpanWriter,
        keyword: &str,
        clause: &str,
        body: &Stmt,
        build: impl FnOnce(Span, String, Arc<Stmt>) -> Stmt,
    ) -> Arc<Stmt> {
        let start = w.mark();
        w.push_str(&format!("{} ({})", keyword, clause));
        let body = self.write_child(w, body);
        Arc::new(build(
            Span::new(start, w.mark()),
            clause.to_string(),
            body,
        ))
    }

    fn write_if(&self, w: &mut SpanWriter, node: &IfStmt) -> Arc<Stmt> {
        let start = w.mark();
        w.push_str(&format!("if ({})", node.condition));
        let then_branch = self.write_child(w, &node.then_branch);

        let else_branch = match &node.else_branch {
            None => None,
            Some(else_stmt) => {
                w.newline();
                w.write_indent();
                w.push_str("else");
                Some(match &**else_stmt {
                    // else-if stays on the same line
                    Stmt::If(inner) => {
                        w.push_str(" ");
                        self.write_if(w, inner)
                    }
                    other => self.write_child(w, other),
                })
            }
        };

        Arc::new(Stmt::If(IfStmt {
            span: Span::new(start, w.mark()),
            condition: node.condition.clone(),
            then_branch,
            else_branch,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TypeKind;

    fn expr(text: &str) -> Arc<Stmt> {
        Arc::new(Stmt::Expr(ExprStmt {
            span: Span::default(),
            text: text.to_string(),
        }))
    }

    fn block(statements: Vec<Arc<Stmt>>) -> Arc<Stmt> {
        Arc::new(Stmt::Block(BlockStmt {
            span: Span::default(),
            statements,
        }))
    }

    fn simple_decl() -> TypeDecl {
        TypeDecl {
            span: Span::default(),
            kind: TypeKind::Class,
            name: "Widget".to_string(),
            annotations: vec![Annotation {
                span: Span::default(),
                class_name: "ComponentNameAttribute".to_string(),
                arguments: vec![AnnotationArg::Str("WIDGET".to_string())],
            }],
            bases: vec!["Runtime.Contracts.INamedComponent".to_string()],
            methods: vec![Method {
                span: Span::default(),
                signature: "public void Run()".to_string(),
                body: block(vec![expr("Go();")]),
            }],
        }
    }

    #[test]
    fn test_render_simple_declaration() {
        let formatter = CanonicalFormatter::new();
        let text = formatter.render(&simple_decl(), Position::new(1, 1));

        let expected = concat!(
            "[ComponentNameAttribute(\"WIDGET\")]\n",
            "class Widget : Runtime.Contracts.INamedComponent\n",
            "{\n",
            "    public void Run()\n",
            "    {\n",
            "        Go();\n",
            "    }\n",
            "}",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_reformat_assigns_consistent_spans() {
        let formatter = CanonicalFormatter::new();
        let rebuilt = formatter.reformat(&simple_decl(), Position::new(10, 1));

        assert_eq!(rebuilt.span.start, Position::new(10, 1));
        // annotation occupies the first rendered line
        assert_eq!(rebuilt.annotations[0].span.start, Position::new(10, 1));
        assert!(!rebuilt.annotations[0].span.is_multi_line());
        // method starts after annotation, header and open brace lines
        assert_eq!(rebuilt.methods[0].span.start.line, 13);
        // statement inside the body is single-line
        let body = &rebuilt.methods[0].body;
        if let Stmt::Block(b) = &**body {
            assert!(!b.statements[0].span().is_multi_line());
            assert_eq!(b.statements[0].span().start.line, 15);
        } else {
            panic!("method body should be a block");
        }
    }

    #[test]
    fn test_anchor_column_indents_every_line() {
        let decl = TypeDecl {
            bases: Vec::new(),
            annotations: Vec::new(),
            ..simple_decl()
        };
        let formatter = CanonicalFormatter::new();
        let text = formatter.render(&decl, Position::new(3, 5));

        for line in text.lines().filter(|l| !l.is_empty()) {
            assert!(line.starts_with("    "), "line not indented: {:?}", line);
        }
    }

    #[test]
    fn test_unbraced_child_stays_unbraced() {
        let decl = TypeDecl {
            annotations: Vec::new(),
            bases: Vec::new(),
            methods: vec![Method {
                span: Span::default(),
                signature: "void Loop()".to_string(),
                body: block(vec![Arc::new(Stmt::While(LoopStmt {
                    span: Span::default(),
                    clause: "busy".to_string(),
                    body: expr("Spin();"),
                }))]),
            }],
            ..simple_decl()
        };

        let text = CanonicalFormatter::new().render(&decl, Position::new(1, 1));
        assert!(text.contains("        while (busy)\n            Spin();"));
        assert!(!text.contains("while (busy)\n        {"));
    }

    #[test]
    fn test_else_if_chain_renders_inline() {
        let chain = Arc::new(Stmt::If(IfStmt {
            span: Span::default(),
            condition: "a".to_string(),
            then_branch: expr("X();"),
            else_branch: Some(Arc::new(Stmt::If(IfStmt {
                span: Span::default(),
                condition: "b".to_string(),
                then_branch: expr("Y();"),
                else_branch: Some(expr("Z();")),
            }))),
        }));
        let decl = TypeDecl {
            annotations: Vec::new(),
            bases: Vec::new(),
            methods: vec![Method {
                span: Span::default(),
                signature: "void Pick()".to_string(),
                body: block(vec![chain]),
            }],
            ..simple_decl()
        };

        let text = CanonicalFormatter::new().render(&decl, Position::new(1, 1));
        assert!(text.contains("if (a)\n            X();\n        else if (b)\n            Y();\n        else\n            Z();"));
    }

    #[test]
    fn test_do_while_renders_trailing_clause() {
        let decl = TypeDecl {
            annotations: Vec::new(),
            bases: Vec::new(),
            methods: vec![Method {
                span: Span::default(),
                signature: "void Pump()".to_string(),
                body: block(vec![Arc::new(Stmt::DoWhile(LoopStmt {
                    span: Span::default(),
                    clause: "more".to_string(),
                    body: block(vec![expr("Step();")]),
                }))]),
            }],
            ..simple_decl()
        };

        let text = CanonicalFormatter::new().render(&decl, Position::new(1, 1));
        assert!(text.contains("do\n        {\n            Step();\n        }\n        while (more);"));
    }

    #[test]
    fn test_multi_line_statement_keeps_later_spans_in_sync() {
        let decl = TypeDecl {
            annotations: Vec::new(),
            bases: Vec::new(),
            methods: vec![Method {
                span: Span::default(),
                signature: "void Wrap()".to_string(),
                body: block(vec![expr("Work(a,\n    b);"), expr("Done();")]),
            }],
            ..simple_decl()
        };
        let formatter = CanonicalFormatter::new();

        let text = formatter.render(&decl, Position::new(1, 1));
        let rendered_line = text
            .lines()
            .position(|l| l.contains("Done();"))
            .map(|i| i + 1)
            .unwrap();

        let rebuilt = formatter.reformat(&decl, Position::new(1, 1));
        let body = &rebuilt.methods[0].body;
        if let Stmt::Block(b) = &**body {
            assert!(b.statements[0].span().is_multi_line());
            assert_eq!(b.statements[1].span().start.line, rendered_line);
        } else {
            panic!("method body should be a block");
        }
    }

    #[test]
    fn test_annotation_expr_argument_not_quoted() {
        let decl = TypeDecl {
            annotations: vec![Annotation {
                span: Span::default(),
                class_name: "Order".to_string(),
                arguments: vec![AnnotationArg::Expr("Stage.First".to_string())],
            }],
            bases: Vec::new(),
            methods: Vec::new(),
            ..simple_decl()
        };

        let text = CanonicalFormatter::new().render(&decl, Position::new(1, 1));
        assert!(text.starts_with("[Order(Stage.First)]"));
    }
}
