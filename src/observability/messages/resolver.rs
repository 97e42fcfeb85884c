// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for constraint resolution.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A constraint problem was searched to completion.
///
/// # Log Level
/// `debug!` - Resolution is a normal, frequent outcome either way
pub struct ConstraintSolveCompleted {
    pub variables: usize,
    pub satisfiable: bool,
    pub duration: Duration,
}

impl Display for ConstraintSolveCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let outcome = if self.satisfiable { "SAT" } else { "UNSAT" };
        write!(
            f,
            "Constraint search over {} variables finished in {:?}: {}",
            self.variables, self.duration, outcome
        )
    }
}

impl StructuredLog for ConstraintSolveCompleted {
    fn log(&self) {
        tracing::debug!(
            variables = self.variables,
            satisfiable = self.satisfiable,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "constraint_solve",
            span_name = name,
            variables = self.variables,
            satisfiable = self.satisfiable,
        )
    }
}
