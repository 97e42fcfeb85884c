// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::DispatchError;
use crate::model::Device;

/// What a device answered to a manifest or other JSON message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceResponse {
    pub status: u16,
    /// Parsed JSON, or the raw text as a JSON string when it was not JSON
    pub body: serde_json::Value,
}

impl DeviceResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A file supplied with an execution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionBody {
    Empty,
    Json(serde_json::Map<String, serde_json::Value>),
    /// Text fields plus one file part named `file`
    Multipart {
        fields: serde_json::Map<String, serde_json::Value>,
        file: FileInput,
    },
}

/// A fully built request to a deployment's entry device.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRequest {
    pub device: String,
    pub method: HttpMethod,
    pub url: reqwest::Url,
    pub body: ExecutionBody,
}

/// The entry device's answer, passed back untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Outbound messaging to devices.
#[async_trait]
pub trait DeviceMessenger: Send + Sync {
    /// POST a JSON document to `path` on the device.
    async fn post_json(
        &self,
        device: &Device,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<DeviceResponse, DispatchError>;

    /// Send exactly one execution request.
    async fn send_execution(
        &self,
        request: ExecutionRequest,
    ) -> Result<ExecutionResponse, DispatchError>;
}
