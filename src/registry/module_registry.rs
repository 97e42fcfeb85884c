// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::Module;

/// Shared collection of uploaded modules.
///
/// Modules are immutable once created, except that auxiliary data files can be
/// attached to them later.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    modules: Arc<RwLock<Vec<Module>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modules(modules: Vec<Module>) -> Self {
        Self {
            modules: Arc::new(RwLock::new(modules)),
        }
    }

    /// Add a module. Returns false, leaving the registry unchanged, if a module
    /// with the same id already exists.
    pub async fn insert(&self, module: Module) -> bool {
        let mut modules = self.modules.write().await;
        if modules.iter().any(|m| m.id == module.id) {
            return false;
        }
        modules.push(module);
        true
    }

    /// Attach an auxiliary data file to a module. Returns false when the module
    /// does not exist.
    pub async fn attach_data_file(&self, id: &str, file_name: impl Into<String>) -> bool {
        let mut modules = self.modules.write().await;
        match modules.iter_mut().find(|m| m.id == id) {
            Some(module) => {
                let file_name = file_name.into();
                if !module.data_files.contains(&file_name) {
                    module.data_files.push(file_name);
                }
                true
            }
            None => false,
        }
    }

    pub async fn get(&self, id: &str) -> Option<Module> {
        self.modules.read().await.iter().find(|m| m.id == id).cloned()
    }

    pub async fn snapshot(&self) -> Vec<Module> {
        self.modules.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fixtures::module;

    #[tokio::test]
    async fn test_insert_rejects_duplicate_ids() {
        let registry = ModuleRegistry::new();
        assert!(registry.insert(module("m1", &["add"], &[])).await);
        assert!(!registry.insert(module("m1", &["mul"], &[])).await);

        let stored = registry.get("m1").await.unwrap();
        assert!(stored.export("add").is_some());
        assert_eq!(registry.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_attach_data_file() {
        let registry = ModuleRegistry::with_modules(vec![module("m1", &["infer"], &[])]);
        assert!(registry.attach_data_file("m1", "model.pb").await);
        assert!(registry.attach_data_file("m1", "model.pb").await);
        assert!(!registry.attach_data_file("missing", "model.pb").await);

        let stored = registry.get("m1").await.unwrap();
        assert_eq!(stored.data_files, vec!["model.pb".to_string()]);
    }
}
