//! Resolved symbol table
//!
//! Produced by an external resolver alongside the syntax tree. Symbols are
//! read-only for the duration of a pass. Unresolved references are modeled
//! as `None` and never treated as errors: a reference that cannot be
//! resolved simply never matches.

use std::collections::{HashMap, HashSet, VecDeque};

use super::types::Span;

/// An annotation as seen by the resolver; `class_name` is `None` when the
/// annotation class reference did not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationBinding {
    pub class_name: Option<String>,
    pub arguments: Vec<String>,
}

impl AnnotationBinding {
    pub fn resolved(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            arguments: Vec::new(),
        }
    }

    pub fn unresolved() -> Self {
        Self {
            class_name: None,
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.arguments = arguments.into_iter().map(|a| a.into()).collect();
        self
    }
}

/// A resolved type declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub name: String,
    /// Directly declared interfaces, fully qualified
    pub declared_interfaces: Vec<String>,
    pub annotations: Vec<AnnotationBinding>,
    /// Primary declaration location in the tree generation
    pub location: Span,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>, location: Span) -> Self {
        Self {
            name: name.into(),
            declared_interfaces: Vec::new(),
            annotations: Vec::new(),
            location,
        }
    }

    pub fn with_interfaces(
        mut self,
        interfaces: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.declared_interfaces = interfaces.into_iter().map(|i| i.into()).collect();
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationBinding) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Symbol table for one analysis pass: type symbols plus the
/// interface-extends graph used to flatten interface sets transitively
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// interface name -> interfaces it extends
    interfaces: HashMap<String, Vec<String>>,
    types: Vec<TypeSymbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_interface(
        &mut self,
        name: impl Into<String>,
        extends: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.interfaces
            .insert(name.into(), extends.into_iter().map(|e| e.into()).collect());
    }

    pub fn add_type(&mut self, symbol: TypeSymbol) {
        self.types.push(symbol);
    }

    pub fn types(&self) -> &[TypeSymbol] {
        &self.types
    }

    /// Transitive closure of a symbol's declared interfaces.
    ///
    /// Cycle-safe; interfaces absent from the extends graph are included
    /// as leaves rather than rejected.
    pub fn all_interfaces(&self, symbol: &TypeSymbol) -> HashSet<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = symbol.declared_interfaces.iter().cloned().collect();

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(extends) = self.interfaces.get(&name) {
                for parent in extends {
                    queue.push_back(parent.clone());
                }
            }
        }

        seen
    }

    /// Whether the symbol implements `interface_name`, directly or through
    /// any chain of intermediate interfaces
    pub fn implements(&self, symbol: &TypeSymbol, interface_name: &str) -> bool {
        self.all_interfaces(symbol).contains(interface_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Span;

    fn span() -> Span {
        Span::single_line(1, 1, 30)
    }

    #[test]
    fn test_direct_interface() {
        let mut table = SymbolTable::new();
        let symbol = TypeSymbol::new("Widget", span()).with_interfaces(["Core.IWidget"]);
        table.add_type(symbol.clone());

        assert!(table.implements(&symbol, "Core.IWidget"));
        assert!(!table.implements(&symbol, "Core.IOther"));
    }

    #[test]
    fn test_transitive_interface() {
        let mut table = SymbolTable::new();
        table.add_interface("Core.IValidator", ["Core.IComponent"]);
        table.add_interface("Core.IComponent", ["Core.INamed"]);

        let symbol = TypeSymbol::new("OrderValidator", span()).with_interfaces(["Core.IValidator"]);

        let all = table.all_interfaces(&symbol);
        assert!(all.contains("Core.IValidator"));
        assert!(all.contains("Core.IComponent"));
        assert!(all.contains("Core.INamed"));
        assert!(table.implements(&symbol, "Core.INamed"));
    }

    #[test]
    fn test_interface_cycle_terminates() {
        let mut table = SymbolTable::new();
        table.add_interface("A", ["B"]);
        table.add_interface("B", ["A"]);

        let symbol = TypeSymbol::new("Looped", span()).with_interfaces(["A"]);
        let all = table.all_interfaces(&symbol);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_unknown_interface_kept_as_leaf() {
        let table = SymbolTable::new();
        let symbol = TypeSymbol::new("Orphan", span()).with_interfaces(["Vendor.IUnknown"]);

        // no extends entry for Vendor.IUnknown; it still counts
        assert!(table.implements(&symbol, "Vendor.IUnknown"));
    }

    #[test]
    fn test_annotation_binding_builders() {
        let resolved = AnnotationBinding::resolved("SerializableAttribute")
            .with_arguments(["true"]);
        assert_eq!(
            resolved.class_name.as_deref(),
            Some("SerializableAttribute")
        );
        assert_eq!(resolved.arguments, vec!["true"]);

        let unresolved = AnnotationBinding::unresolved();
        assert!(unresolved.class_name.is_none());
    }
}
