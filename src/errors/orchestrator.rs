// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::{DispatchError, MatchError};
use crate::store::StoreError;

/// Top level error for the orchestrator facade.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Deployment name '{0}' already exists")]
    DuplicateDeploymentName(String),

    #[error("No deployment matches id '{0}'")]
    DeploymentNotFound(String),

    /// A stored record no longer deserializes into its model type
    #[error("Stored {kind} record is malformed: {reason}")]
    CorruptRecord { kind: &'static str, reason: String },
}
