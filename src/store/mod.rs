// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Storage collections, filters and the in-memory [`Persistence`] backend.
//!
//! [`Persistence`]: crate::traits::Persistence

mod memory;

pub use memory::MemoryStore;

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Device,
    Module,
    Deployment,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Device => "device",
            Collection::Module => "module",
            Collection::Deployment => "deployment",
        };
        f.write_str(name)
    }
}

/// Equality filter on top-level document fields. The empty filter matches
/// every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(BTreeMap<String, Value>);

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Documents in '{collection}' must be JSON objects")]
    NotAnObject { collection: Collection },

    #[error("Document '{id}' already exists in '{collection}'")]
    DuplicateId { collection: Collection, id: String },

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matching() {
        struct TestCase {
            filter: Filter,
            expected: bool,
        }

        let document = json!({ "id": "d1", "name": "pipeline", "count": 2 });
        let cases = vec![
            TestCase { filter: Filter::all(), expected: true },
            TestCase { filter: Filter::eq("name", "pipeline"), expected: true },
            TestCase { filter: Filter::eq("name", "other"), expected: false },
            TestCase { filter: Filter::eq("id", "d1").and("count", 2), expected: true },
            TestCase { filter: Filter::eq("missing", "x"), expected: false },
        ];

        for (i, case) in cases.into_iter().enumerate() {
            assert_eq!(case.filter.matches(&document), case.expected, "case {}", i);
        }
    }
}
