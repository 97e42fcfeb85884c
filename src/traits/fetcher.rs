// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::DiscoveryError;
use crate::model::{Communication, DeviceDescription};

/// Retrieves the capability description a device serves about itself.
#[async_trait]
pub trait DescriptionFetcher: Send + Sync {
    async fn fetch(
        &self,
        device: &str,
        communication: &Communication,
    ) -> Result<DeviceDescription, DiscoveryError>;
}
