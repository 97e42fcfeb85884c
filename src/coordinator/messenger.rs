// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

use crate::coordinator::execution::value_to_text;
use crate::errors::DispatchError;
use crate::model::Device;
use crate::traits::{
    DeviceMessenger, DeviceResponse, ExecutionBody, ExecutionRequest, ExecutionResponse,
    HttpMethod,
};

/// [`DeviceMessenger`] speaking plain HTTP to device supervisors.
pub struct HttpMessenger {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpMessenger {
    pub fn new(timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Transport {
                target: "http client".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { client, timeout })
    }

    fn request_error(&self, target: &str, error: reqwest::Error) -> DispatchError {
        if error.is_timeout() {
            DispatchError::Timeout {
                target: target.to_string(),
                timeout: self.timeout,
            }
        } else {
            DispatchError::Transport {
                target: target.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl DeviceMessenger for HttpMessenger {
    async fn post_json(
        &self,
        device: &Device,
        path: &str,
        body: &Value,
    ) -> Result<DeviceResponse, DispatchError> {
        let base = device
            .communication
            .base_url()
            .ok_or_else(|| DispatchError::Transport {
                target: device.id.clone(),
                reason: "device advertised no address".to_string(),
            })?;
        let url = format!("{}{}", base, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.request_error(&url, e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.request_error(&url, e))?;
        let parsed = serde_json::from_str::<Value>(&text).ok();

        Ok(DeviceResponse {
            status,
            body: parsed.unwrap_or(Value::String(text)),
        })
    }

    async fn send_execution(
        &self,
        request: ExecutionRequest,
    ) -> Result<ExecutionResponse, DispatchError> {
        let target = request.url.to_string();
        let builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
        };

        let builder = match request.body {
            ExecutionBody::Empty => builder,
            ExecutionBody::Json(params) => builder.json(&params),
            ExecutionBody::Multipart { fields, file } => {
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(name, value_to_text(&value));
                }
                let mut part = Part::bytes(file.bytes).file_name(file.file_name);
                if let Some(content_type) = file.content_type {
                    part = part.mime_str(&content_type).map_err(|e| DispatchError::Transport {
                        target: target.clone(),
                        reason: format!("invalid file content type '{}': {}", content_type, e),
                    })?;
                }
                builder.multipart(form.part("file", part))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| self.request_error(&target, e))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| self.request_error(&target, e))?
            .to_vec();

        Ok(ExecutionResponse {
            status,
            content_type,
            body,
        })
    }
}
