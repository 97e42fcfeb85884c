// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backtracking search for a satisfying assignment.
//!
//! The search branches on the lexicographically smallest free variable, tries
//! `true` before `false`, and stops at the first complete assignment that makes
//! the expression true. There is no unit propagation and no clause learning:
//! problems here have one variable per candidate package of a single request,
//! so the exponential worst case stays small in practice.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::observability::messages::resolver::ConstraintSolveCompleted;
use crate::observability::messages::StructuredLog;
use crate::resolver::{Expr, ExprError};

/// Variable name to assigned value.
pub type Assignment = BTreeMap<String, bool>;

/// Outcome of a search. Unsatisfiability is an ordinary result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    Satisfiable(Assignment),
    Unsatisfiable,
}

impl Solution {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, Solution::Satisfiable(_))
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Solution::Satisfiable(assignment) => Some(assignment),
            Solution::Unsatisfiable => None,
        }
    }

    /// Names assigned `true`, in ascending order.
    pub fn selected(&self) -> Vec<&str> {
        self.assignment()
            .map(|a| {
                a.iter()
                    .filter(|(_, value)| **value)
                    .map(|(name, _)| name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Find an assignment of every free variable of `expr` that makes it true.
pub fn solve(expr: &Expr) -> Result<Solution, ExprError> {
    let started = Instant::now();
    let variables = expr.free_variables().len();

    let solution = match search(expr.clone(), Assignment::new())? {
        Some(assignment) => Solution::Satisfiable(assignment),
        None => Solution::Unsatisfiable,
    };

    ConstraintSolveCompleted {
        variables,
        satisfiable: solution.is_satisfiable(),
        duration: started.elapsed(),
    }
    .log();

    Ok(solution)
}

fn search(expr: Expr, bindings: Assignment) -> Result<Option<Assignment>, ExprError> {
    let Some(name) = expr.free_variables().into_iter().next() else {
        return Ok(if expr.evaluate()? { Some(bindings) } else { None });
    };

    for value in [true, false] {
        let branch = expr.substitute(&name, value);
        let mut branch_bindings = bindings.clone();
        branch_bindings.insert(name.clone(), value);
        if let Some(found) = search(branch, branch_bindings)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

/// Package selection expressed as dependencies and conflicts.
///
/// Every package is a boolean variable meaning "installed". A dependency
/// `a -> b` is the implication `a => b`, a conflict between `a` and `b` is
/// `!(a && b)`. `require` forces a package to be installed and `clause` adds an
/// arbitrary extra constraint over package variables.
///
/// # Example
/// ```
/// use wasm_fleet::resolver::ConstraintProblem;
///
/// let solution = ConstraintProblem::new()
///     .package("foo")
///     .package("bar")
///     .depends("foo", "bar")
///     .require("foo")
///     .solve()
///     .unwrap();
///
/// assert_eq!(solution.selected(), vec!["bar", "foo"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintProblem {
    packages: Vec<String>,
    dependencies: Vec<(String, String)>,
    conflicts: Vec<(String, String)>,
    required: Vec<String>,
    clauses: Vec<Expr>,
}

impl ConstraintProblem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.packages.contains(&name) {
            self.packages.push(name);
        }
        self
    }

    pub fn depends(mut self, dependent: impl Into<String>, dependency: impl Into<String>) -> Self {
        self.dependencies.push((dependent.into(), dependency.into()));
        self
    }

    pub fn conflicts(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.conflicts.push((a.into(), b.into()));
        self
    }

    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn clause(mut self, expr: Expr) -> Self {
        self.clauses.push(expr);
        self
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// The whole problem as a single conjunction.
    pub fn to_expr(&self) -> Expr {
        let dependencies = self
            .dependencies
            .iter()
            .map(|(a, b)| Expr::implies(Expr::var(a), Expr::var(b)));
        let conflicts = self
            .conflicts
            .iter()
            .map(|(a, b)| Expr::not(Expr::and([Expr::var(a), Expr::var(b)])));
        let required = self.required.iter().map(Expr::var);

        Expr::and([
            Expr::and(dependencies),
            Expr::and(conflicts),
            Expr::and(required),
            Expr::and(self.clauses.iter().cloned()),
        ])
    }

    /// Solve the problem. The assignment of a satisfiable result covers every
    /// declared package; packages no constraint mentions are left uninstalled.
    pub fn solve(&self) -> Result<Solution, ExprError> {
        let solution = solve(&self.to_expr())?;
        Ok(match solution {
            Solution::Satisfiable(mut assignment) => {
                for package in &self.packages {
                    assignment.entry(package.clone()).or_insert(false);
                }
                Solution::Satisfiable(assignment)
            }
            Solution::Unsatisfiable => Solution::Unsatisfiable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holds(assignment: &Assignment, name: &str) -> bool {
        assignment.get(name).copied().unwrap_or(false)
    }

    #[test]
    fn test_dependency_implication_holds() {
        let problem = ConstraintProblem::new()
            .package("foo")
            .package("bar")
            .depends("foo", "bar");

        let solution = problem.solve().unwrap();
        let assignment = solution.assignment().expect("problem is satisfiable");

        assert_eq!(assignment.len(), 2);
        assert!(!holds(assignment, "foo") || holds(assignment, "bar"));
    }

    #[test]
    fn test_dependency_on_conflicting_package_is_unsatisfiable_when_forced() {
        let problem = ConstraintProblem::new()
            .package("a")
            .package("b")
            .depends("a", "b")
            .conflicts("a", "b")
            .require("a");

        assert_eq!(problem.solve().unwrap(), Solution::Unsatisfiable);
    }

    #[test]
    fn test_same_problem_without_forcing_is_satisfiable() {
        let problem = ConstraintProblem::new()
            .package("a")
            .package("b")
            .depends("a", "b")
            .conflicts("a", "b");

        let solution = problem.solve().unwrap();
        let assignment = solution.assignment().unwrap();
        assert!(!holds(assignment, "a"));
    }

    #[test]
    fn test_every_constraint_is_satisfied() {
        // Package versions from the classic foo/bar example.
        let problem = ConstraintProblem::new()
            .package("foo-1.0")
            .package("foo-2.0")
            .package("bar-1.0")
            .package("bar-2.0")
            .depends("foo-1.0", "bar-1.0")
            .depends("foo-2.0", "bar-2.0")
            .conflicts("foo-1.0", "foo-2.0")
            .conflicts("bar-1.0", "bar-2.0");

        let solution = problem.solve().unwrap();
        let a = solution.assignment().unwrap();

        for (dependent, dependency) in [("foo-1.0", "bar-1.0"), ("foo-2.0", "bar-2.0")] {
            assert!(!holds(a, dependent) || holds(a, dependency));
        }
        for (x, y) in [("foo-1.0", "foo-2.0"), ("bar-1.0", "bar-2.0")] {
            assert!(!(holds(a, x) && holds(a, y)));
        }
    }

    #[test]
    fn test_branches_on_smallest_name_true_first() {
        // With no constraints the first branch tried always succeeds, so every
        // variable ends up true; the order of assignment is deterministic.
        let expr = Expr::or([Expr::var("b"), Expr::var("a")]);
        let solution = solve(&expr).unwrap();
        assert_eq!(solution.selected(), vec!["a", "b"]);
    }

    #[test]
    fn test_backtracks_to_false() {
        let expr = Expr::and([
            Expr::not(Expr::var("a")),
            Expr::implies(Expr::not(Expr::var("a")), Expr::var("b")),
        ]);
        let solution = solve(&expr).unwrap();
        let a = solution.assignment().unwrap();
        assert_eq!(a.get("a"), Some(&false));
        assert_eq!(a.get("b"), Some(&true));
    }

    #[test]
    fn test_constant_problems() {
        assert_eq!(solve(&Expr::True).unwrap(), Solution::Satisfiable(Assignment::new()));
        assert_eq!(solve(&Expr::False).unwrap(), Solution::Unsatisfiable);
    }

    #[test]
    fn test_unconstrained_packages_are_not_installed() {
        let solution = ConstraintProblem::new()
            .package("lonely")
            .package("x")
            .require("x")
            .solve()
            .unwrap();
        let a = solution.assignment().unwrap();
        assert_eq!(a.get("lonely"), Some(&false));
        assert_eq!(a.get("x"), Some(&true));
    }
}
