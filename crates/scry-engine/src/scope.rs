//! Enclosing scopes used to qualify names found in expressions.

/// Names that resolve to themselves rather than to a module member.
const BUILTINS: &[&str] = &[
    "bool", "bytes", "dict", "float", "frozenset", "int", "list", "object",
    "set", "str", "tuple", "type", "len", "print", "range", "super",
    "property", "classmethod", "staticmethod", "Exception", "ValueError",
    "TypeError", "NotImplemented",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Class,
}

/// A module or class that contains the expression being resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Dotted path, e.g. `pkg.models` or `pkg.models.User`.
    pub path: String,
    pub parent: Option<Box<Scope>>,
    /// `alias -> target` pairs, in declaration order.
    pub imports: Vec<(String, String)>,
}

impl Scope {
    pub fn module(path: impl Into<String>) -> Self {
        Self { kind: ScopeKind::Module, path: path.into(), parent: None, imports: Vec::new() }
    }

    /// A class nested in `parent`; its path is `{parent.path}.{name}`.
    pub fn class(name: &str, parent: Scope) -> Self {
        Self {
            kind: ScopeKind::Class,
            path: format!("{}.{}", parent.path, name),
            parent: Some(Box::new(parent)),
            imports: Vec::new(),
        }
    }

    /// Record `import target as alias` (or `from x import target as alias`
    /// with the full dotted target). A later import of the same alias
    /// shadows the earlier one.
    pub fn with_import(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        let alias = alias.into();
        self.imports.retain(|(a, _)| *a != alias);
        self.imports.push((alias, target.into()));
        self
    }

    /// The closest enclosing module.
    pub fn module_scope(&self) -> &Scope {
        let mut scope = self;
        while scope.kind != ScopeKind::Module {
            match scope.parent.as_deref() {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        scope
    }

    /// Canonical path for a bare `name` used inside this scope.
    ///
    /// Imports are checked from the innermost scope outwards. Class bodies
    /// do not form a lookup namespace for nested code, so other names are
    /// qualified against the enclosing module.
    pub fn resolve(&self, name: &str) -> String {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some((_, target)) = current.imports.iter().find(|(alias, _)| alias == name) {
                return target.clone();
            }
            scope = current.parent.as_deref();
        }
        if BUILTINS.contains(&name) {
            return name.to_string();
        }
        format!("{}.{}", self.module_scope().path, name)
    }
}
