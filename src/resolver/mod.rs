// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Boolean constraint resolution for package selection.
//!
//! * `expr` - immutable boolean expression trees and their primitive operations
//! * `solver` - backtracking search and the dependency/conflict problem builder
//! * `packages` - versioned package sets lowered into constraint problems

mod expr;
mod packages;
mod solver;

pub use expr::{Expr, ExprError};
pub use packages::{
    resolve_packages, PackageDependency, PackageResolution, PackageSpec, ResolveOptions,
};
pub use solver::{solve, Assignment, ConstraintProblem, Solution};
