use std::sync::{Arc, LazyLock};

use scry_syntax::ast::Call;

use crate::expressions::{safe_get_expression, Expr, ExpressionResolver};
use crate::logging::{get_logger, Logger};
use crate::scope::Scope;

static LOGGER: LazyLock<Arc<Logger>> = LazyLock::new(|| get_logger(module_path!()));

// ── KeywordArguments ──────────────────────────────────────────────────────

/// Keyword argument names mapped to their resolved values, in call order.
///
/// A value is `None` when the resolver could not resolve it. Inserting an
/// existing name replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordArguments {
    entries: Vec<(String, Option<Expr>)>,
}

impl KeywordArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<Expr>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a resolved value by name. Unknown names and unresolved
    /// values both give `None`; use [`contains`](Self::contains) to tell
    /// them apart.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Expr>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for KeywordArguments {
    type Item = (String, Option<Expr>);
    type IntoIter = std::vec::IntoIter<(String, Option<Expr>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ── Extraction ────────────────────────────────────────────────────────────

/// Keyword arguments of `node`, resolved with [`safe_get_expression`].
///
/// `**mapping` expansions have no name and are skipped.
pub fn get_call_keyword_arguments(node: &Call, parent: &Scope) -> KeywordArguments {
    get_call_keyword_arguments_with(node, parent, &safe_get_expression)
}

/// Same as [`get_call_keyword_arguments`] with a caller-supplied resolver.
pub fn get_call_keyword_arguments_with<R>(node: &Call, parent: &Scope, resolver: &R) -> KeywordArguments
where
    R: ExpressionResolver + ?Sized,
{
    let mut out = KeywordArguments::new();
    for keyword in &node.keywords {
        let Some(name) = &keyword.arg else {
            LOGGER.debug(format_args!("skipping ** expansion in call inside {}", parent.path));
            continue;
        };
        out.insert(name.as_str(), resolver.resolve(&keyword.value, parent));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use scry_syntax::{ast, parse_call};

    use super::*;
    use crate::expressions::Constant;

    fn extract(src: &str) -> KeywordArguments {
        get_call_keyword_arguments(&parse_call(src).unwrap(), &Scope::module("pkg"))
    }

    fn int(n: i64) -> Expr { Expr::Constant(Constant::Int(n)) }

    #[test]
    fn named_keywords_in_order() {
        let kwargs = extract("f(a=1, b=2)");
        assert_eq!(kwargs.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(kwargs.get("a"), Some(&int(1)));
        assert_eq!(kwargs.get("b"), Some(&int(2)));
    }

    #[test]
    fn double_star_is_skipped() {
        let kwargs = extract("f(a=1, **kwargs)");
        assert_eq!(kwargs.len(), 1);
        assert_eq!(kwargs.iter().collect::<Vec<_>>(), [("a", Some(&int(1)))]);
    }

    #[test]
    fn only_double_star() {
        assert!(extract("f(**kwargs)").is_empty());
    }

    #[test]
    fn no_keywords() {
        assert!(extract("f()").is_empty());
        assert!(extract("f(1, 2, *rest)").is_empty());
    }

    #[test]
    fn repeated_name_keeps_position_takes_last_value() {
        // Python rejects this at compile time, but hand-built trees can carry it.
        let call = Call {
            func: Box::new(ast::Expr::Name("f".into())),
            args: vec![],
            keywords: vec![
                ast::Keyword { arg: Some("a".into()), value: ast::Expr::Constant(Constant::Int(1)) },
                ast::Keyword { arg: Some("b".into()), value: ast::Expr::Constant(Constant::Int(2)) },
                ast::Keyword { arg: Some("a".into()), value: ast::Expr::Constant(Constant::Int(3)) },
            ],
        };
        let kwargs = get_call_keyword_arguments(&call, &Scope::module("pkg"));
        assert_eq!(kwargs.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(kwargs.get("a"), Some(&int(3)));
    }

    #[test]
    fn values_resolve_in_scope() {
        let module = Scope::module("app.models").with_import("np", "numpy");
        let call = parse_call("field(default_factory=np.zeros, metadata=SCHEMA)").unwrap();
        let kwargs = get_call_keyword_arguments(&call, &Scope::class("Grid", module));

        let path = |name: &str| kwargs.get(name).and_then(Expr::canonical_path);
        assert_eq!(path("default_factory").as_deref(), Some("numpy.zeros"));
        assert_eq!(path("metadata").as_deref(), Some("app.models.SCHEMA"));
    }

    #[test]
    fn unresolved_value_is_kept_as_none() {
        let call = parse_call("f(a=1, b=2)").unwrap();
        let resolver = |node: &ast::Expr, parent: &Scope| match node {
            ast::Expr::Constant(Constant::Int(2)) => None,
            other => safe_get_expression(other, parent),
        };
        let kwargs = get_call_keyword_arguments_with(&call, &Scope::module("pkg"), &resolver);
        assert!(kwargs.contains("b"));
        assert_eq!(kwargs.get("b"), None);
        assert_eq!(kwargs.get("a"), Some(&int(1)));
    }

    #[test]
    fn resolver_sees_each_named_value_once_in_order() {
        let seen = RefCell::new(Vec::new());
        let resolver = |node: &ast::Expr, _: &Scope| -> Option<Expr> {
            seen.borrow_mut().push(node.clone());
            None
        };
        let call = parse_call("f(x, a=1, **skip, b=2)").unwrap();
        get_call_keyword_arguments_with(&call, &Scope::module("pkg"), &resolver);
        assert_eq!(*seen.borrow(), vec![
            ast::Expr::Constant(Constant::Int(1)),
            ast::Expr::Constant(Constant::Int(2)),
        ]);
    }
}
