// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::timeout;

use crate::errors::DiscoveryError;
use crate::model::{Communication, DeviceDescription};
use crate::traits::DescriptionFetcher;

/// Fetches `GET http://{address}:{port}{description_path}` over HTTP.
pub struct HttpDescriptionFetcher {
    client: reqwest::Client,
    description_path: String,
    timeout: Duration,
}

impl HttpDescriptionFetcher {
    pub fn new(
        description_path: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DiscoveryError> {
        let description_path = description_path.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiscoveryError::Transport {
                url: description_path.clone(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            description_path,
            timeout,
        })
    }
}

#[async_trait]
impl DescriptionFetcher for HttpDescriptionFetcher {
    async fn fetch(
        &self,
        device: &str,
        communication: &Communication,
    ) -> Result<DeviceDescription, DiscoveryError> {
        let base = communication
            .base_url()
            .ok_or_else(|| DiscoveryError::NoAddress {
                device: device.to_string(),
            })?;
        let url = format!("{}{}", base, self.description_path);

        let response = match timeout(self.timeout, self.client.get(&url).send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => {
                return Err(DiscoveryError::Timeout {
                    url,
                    timeout: self.timeout,
                })
            }
            Ok(Err(e)) => {
                return Err(DiscoveryError::Transport {
                    url,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(DiscoveryError::Timeout {
                    url,
                    timeout: self.timeout,
                })
            }
        };

        if response.status() != StatusCode::OK {
            return Err(DiscoveryError::UnexpectedStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| DiscoveryError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| DiscoveryError::MalformedDescription {
            url,
            reason: e.to_string(),
        })
    }
}
