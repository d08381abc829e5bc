/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::services::errors::FlickrError;
use crate::services::multipart;
use crate::services::request::{HttpBody, HttpMethod, HttpRequest};
use crate::services::ClientConfig;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Status and body of an HTTP exchange, uninterpreted.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single HTTP exchange.
///
/// Implementations must not retry and must not look at the body.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse, FlickrError>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone)]
pub struct HttpTransport {
    https_client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, FlickrError> {
        let https_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FlickrError::Configuration(format!("unusable http client settings: {e}")))?;
        Ok(Self {
            https_client,
            timeout: config.timeout,
        })
    }

    fn map_err(&self, err: reqwest::Error) -> FlickrError {
        if err.is_timeout() {
            FlickrError::Timeout(self.timeout)
        } else {
            FlickrError::Request(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse, FlickrError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self
            .https_client
            .request(method, request.url.clone())
            .header(ACCEPT, "application/json, text/xml");
        builder = match &request.body {
            HttpBody::Empty => builder,
            HttpBody::Form(body) => builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.clone()),
            HttpBody::Multipart { fields, file } => {
                let fields = fields.iter().map(|(k, v)| (k.as_str(), v.as_str()));
                builder.multipart(multipart::to_form(fields, file)?)
            }
        };

        let resp = builder.send().await.map_err(|e| self.map_err(e))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| self.map_err(e))?;
        log::debug!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.url.path(),
            status,
            body.len()
        );
        Ok(RawResponse { status, body })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish()
    }
}
