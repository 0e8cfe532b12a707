use std::sync::{Arc, LazyLock};

use anyhow::{bail, Context, Result};
use scry_syntax::ast;

use super::Expr;
use crate::logging::{get_logger, Logger};
use crate::scope::Scope;

static LOGGER: LazyLock<Arc<Logger>> = LazyLock::new(|| get_logger(module_path!()));

/// Turns a syntax node into a resolved [`Expr`] within a scope.
///
/// Implementations must not panic; an expression that cannot be resolved
/// yields `None`.
pub trait ExpressionResolver {
    fn resolve(&self, node: &ast::Expr, parent: &Scope) -> Option<Expr>;
}

impl<F> ExpressionResolver for F
where
    F: Fn(&ast::Expr, &Scope) -> Option<Expr>,
{
    fn resolve(&self, node: &ast::Expr, parent: &Scope) -> Option<Expr> {
        self(node, parent)
    }
}

/// Deepest syntax tree [`get_expression`] will walk.
pub const MAX_DEPTH: usize = 200;

/// Resolve `node` relative to `parent`.
///
/// Fails on starred expressions outside a call argument list or a
/// list/tuple/dict display, and on trees nested deeper than [`MAX_DEPTH`].
pub fn get_expression(node: &ast::Expr, parent: &Scope) -> Result<Expr> {
    resolve_at(node, parent, 0)
}

/// Like [`get_expression`], but logs the failure and returns `None`.
pub fn safe_get_expression(node: &ast::Expr, parent: &Scope) -> Option<Expr> {
    match get_expression(node, parent) {
        Ok(expr) => Some(expr),
        Err(err) => {
            LOGGER.debug(format_args!("could not resolve expression in {}: {:#}", parent.path, err));
            None
        }
    }
}

fn resolve_at(node: &ast::Expr, parent: &Scope, depth: usize) -> Result<Expr> {
    if depth >= MAX_DEPTH {
        bail!("expression nested too deeply");
    }
    if let ast::Expr::Starred(_) = node {
        bail!("starred expression is only valid as a call argument or display element");
    }
    convert(node, parent, depth + 1)
}

fn boxed(node: &ast::Expr, parent: &Scope, depth: usize) -> Result<Box<Expr>> {
    resolve_at(node, parent, depth).map(Box::new)
}

/// Element of a display or argument list, where `*value` is allowed.
fn convert_item(node: &ast::Expr, parent: &Scope, depth: usize) -> Result<Expr> {
    match node {
        ast::Expr::Starred(value) => Ok(Expr::Starred(boxed(value, parent, depth)?)),
        other => resolve_at(other, parent, depth),
    }
}

fn convert_items(items: &[ast::Expr], parent: &Scope, depth: usize) -> Result<Vec<Expr>> {
    items.iter().map(|item| convert_item(item, parent, depth)).collect()
}

fn convert(node: &ast::Expr, parent: &Scope, depth: usize) -> Result<Expr> {
    Ok(match node {
        ast::Expr::Name(name) => Expr::Name {
            name: name.clone(),
            canonical: parent.resolve(name),
        },
        ast::Expr::Constant(c) => Expr::Constant(c.clone()),
        ast::Expr::Attribute { value, attr } => Expr::Attribute {
            value: boxed(value, parent, depth).with_context(|| format!("in base of .{attr}"))?,
            attr: attr.clone(),
        },
        ast::Expr::Call(call) => convert_call(call, parent, depth)?,
        ast::Expr::Subscript { value, slice } => Expr::Subscript {
            value: boxed(value, parent, depth)?,
            slice: boxed(slice, parent, depth).context("in subscript")?,
        },
        ast::Expr::List(items) => Expr::List(convert_items(items, parent, depth)?),
        ast::Expr::Tuple(items) => Expr::Tuple(convert_items(items, parent, depth)?),
        ast::Expr::Dict(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let key = key.as_ref().map(|k| resolve_at(k, parent, depth)).transpose()?;
                out.push((key, resolve_at(value, parent, depth)?));
            }
            Expr::Dict(out)
        }
        ast::Expr::Unary { op, operand } => Expr::Unary { op: *op, operand: boxed(operand, parent, depth)? },
        ast::Expr::Binary { left, op, right } => Expr::Binary {
            left: boxed(left, parent, depth)?,
            op: *op,
            right: boxed(right, parent, depth)?,
        },
        ast::Expr::Compare { left, comparators } => Expr::Compare {
            left: boxed(left, parent, depth)?,
            comparators: comparators
                .iter()
                .map(|(op, operand)| resolve_at(operand, parent, depth).map(|e| (*op, e)))
                .collect::<Result<_>>()?,
        },
        ast::Expr::Starred(_) => bail!("unexpected starred expression"),
    })
}

fn convert_call(call: &ast::Call, parent: &Scope, depth: usize) -> Result<Expr> {
    let function = boxed(&call.func, parent, depth).context("in called expression")?;
    let mut arguments = Vec::with_capacity(call.args.len() + call.keywords.len());
    for (i, arg) in call.args.iter().enumerate() {
        arguments.push(convert_item(arg, parent, depth).with_context(|| format!("in argument {i}"))?);
    }
    for keyword in &call.keywords {
        let value = boxed(&keyword.value, parent, depth);
        arguments.push(match &keyword.arg {
            Some(name) => Expr::Keyword {
                name: name.clone(),
                value: value.with_context(|| format!("in keyword argument {name}"))?,
            },
            None => Expr::DoubleStarred(value.context("in ** argument")?),
        });
    }
    Ok(Expr::Call { function, arguments })
}
