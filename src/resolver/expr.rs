// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use thiserror::Error;

/// Internal invariant violations while working with expression trees.
///
/// These indicate a bug in whoever built or walked the tree, never an
/// unsatisfiable problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("Variable '{0}' has not been replaced")]
    UnresolvedVariable(String),
}

/// A boolean expression over named variables.
///
/// Trees are never mutated: `substitute` builds a new tree, so search branches
/// cannot observe each other's assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    True,
    False,
    Var(String),
    Not(Box<Expr>),
    /// n-ary conjunction; the empty conjunction is true
    And(Vec<Expr>),
    /// n-ary disjunction; the empty disjunction is false
    Or(Vec<Expr>),
    Implies(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn constant(value: bool) -> Self {
        if value {
            Expr::True
        } else {
            Expr::False
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    pub fn and<I: IntoIterator<Item = Expr>>(exprs: I) -> Self {
        Expr::And(exprs.into_iter().collect())
    }

    pub fn or<I: IntoIterator<Item = Expr>>(exprs: I) -> Self {
        Expr::Or(exprs.into_iter().collect())
    }

    pub fn implies(p: Expr, q: Expr) -> Self {
        Expr::Implies(Box::new(p), Box::new(q))
    }

    /// Names of the variables that are still unresolved, sorted ascending.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_free(&mut names);
        names
    }

    fn collect_free(&self, names: &mut BTreeSet<String>) {
        match self {
            Expr::True | Expr::False => {}
            Expr::Var(name) => {
                names.insert(name.clone());
            }
            Expr::Not(inner) => inner.collect_free(names),
            Expr::And(exprs) | Expr::Or(exprs) => {
                for expr in exprs {
                    expr.collect_free(names);
                }
            }
            Expr::Implies(p, q) => {
                p.collect_free(names);
                q.collect_free(names);
            }
        }
    }

    /// A new tree with every occurrence of `name` replaced by the constant `value`.
    pub fn substitute(&self, name: &str, value: bool) -> Expr {
        match self {
            Expr::True => Expr::True,
            Expr::False => Expr::False,
            Expr::Var(var) if var == name => Expr::constant(value),
            Expr::Var(var) => Expr::Var(var.clone()),
            Expr::Not(inner) => Expr::not(inner.substitute(name, value)),
            Expr::And(exprs) => {
                Expr::And(exprs.iter().map(|e| e.substitute(name, value)).collect())
            }
            Expr::Or(exprs) => Expr::Or(exprs.iter().map(|e| e.substitute(name, value)).collect()),
            Expr::Implies(p, q) => {
                Expr::implies(p.substitute(name, value), q.substitute(name, value))
            }
        }
    }

    /// Evaluate a fully constant tree.
    pub fn evaluate(&self) -> Result<bool, ExprError> {
        match self {
            Expr::True => Ok(true),
            Expr::False => Ok(false),
            Expr::Var(name) => Err(ExprError::UnresolvedVariable(name.clone())),
            Expr::Not(inner) => Ok(!inner.evaluate()?),
            Expr::And(exprs) => {
                for expr in exprs {
                    if !expr.evaluate()? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Expr::Or(exprs) => {
                for expr in exprs {
                    if expr.evaluate()? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expr::Implies(p, q) => Ok(!p.evaluate()? || q.evaluate()?),
        }
    }
}
