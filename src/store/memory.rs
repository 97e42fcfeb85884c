// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{Collection, Filter, StoreError};
use crate::traits::Persistence;

/// Process-local document store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Map<String, Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn read(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        let documents = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|doc| Value::Object(doc.clone()))
                    .filter(|doc| filter.matches(doc))
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn create(
        &self,
        collection: Collection,
        values: Vec<Value>,
    ) -> Result<Vec<String>, StoreError> {
        let mut prepared = Vec::with_capacity(values.len());
        for value in values {
            let Value::Object(mut document) = value else {
                return Err(StoreError::NotAnObject { collection });
            };
            let id = match document.get("id").and_then(Value::as_str) {
                Some(id) => id.to_string(),
                None => {
                    let id = Uuid::new_v4().to_string();
                    document.insert("id".to_string(), Value::String(id.clone()));
                    id
                }
            };
            prepared.push((id, document));
        }

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        for (id, _) in &prepared {
            let exists = documents
                .iter()
                .any(|doc| doc.get("id").and_then(Value::as_str) == Some(id.as_str()));
            if exists {
                return Err(StoreError::DuplicateId {
                    collection,
                    id: id.clone(),
                });
            }
        }

        let mut ids = Vec::with_capacity(prepared.len());
        for (id, document) in prepared {
            documents.push(document);
            ids.push(id);
        }
        Ok(ids)
    }

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: Map<String, Value>,
    ) -> Result<usize, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let mut updated = 0;
        for document in documents.iter_mut() {
            if filter.matches(&Value::Object(document.clone())) {
                for (key, value) in &fields {
                    document.insert(key.clone(), value.clone());
                }
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete(&self, collection: Collection, filter: &Filter) -> Result<usize, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let before = documents.len();
        documents.retain(|doc| !filter.matches(&Value::Object(doc.clone())));
        Ok(before - documents.len())
    }
}
