// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::store::{Collection, Filter, StoreError};

/// Document storage for devices, modules and deployments.
///
/// Documents are JSON objects with a string `id` field. Filters are equality
/// matches on top-level fields.
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn read(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    /// Store new documents, assigning an id to those without one. Returns the
    /// ids in input order.
    async fn create(&self, collection: Collection, values: Vec<Value>)
        -> Result<Vec<String>, StoreError>;

    /// Merge `fields` into every matching document. Returns the match count.
    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: Map<String, Value>,
    ) -> Result<usize, StoreError>;

    /// Returns the number of removed documents.
    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<usize, StoreError>;
}
