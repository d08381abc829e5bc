/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::services::errors::FlickrError;
use crate::services::request::{ApiRequest, HttpMethod};
use crate::services::response::decode_json;
use crate::services::transport::{HttpTransport, RawResponse, Transport};
use crate::services::{ClientConfig, Creds};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// This can be filter types as well as other parameters the specific API method expects
pub type ApiParams<'a> = [(&'a str, &'a str)];

/// Signs, sends and decodes calls to the Flickr API.
///
/// Cloning is cheap and every clone shares the same credentials and connection pool. Calls
/// carry no state between them, so a client can be used from many tasks at once.
#[derive(Clone)]
pub struct Client {
    creds: Arc<Creds>,
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Creates a client talking to the public Flickr endpoints
    pub fn new(creds: Creds) -> Result<Self, FlickrError> {
        Self::with_config(creds, ClientConfig::default())
    }

    pub fn with_config(creds: Creds, config: ClientConfig) -> Result<Self, FlickrError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(creds, config, Arc::new(transport)))
    }

    /// Creates a client that sends through the provided [`Transport`]
    pub fn with_transport(
        creds: Creds,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            creds: Arc::new(creds),
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Calls a REST method with the parameters signed into the query string
    pub async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<&ApiParams<'_>>,
    ) -> Result<T, FlickrError> {
        self.call(HttpMethod::Get, method, params).await
    }

    /// Calls a REST method with the parameters signed into a form body
    pub async fn post<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<&ApiParams<'_>>,
    ) -> Result<T, FlickrError> {
        self.call(HttpMethod::Post, method, params).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        http_method: HttpMethod,
        method: &str,
        params: Option<&ApiParams<'_>>,
    ) -> Result<T, FlickrError> {
        log::debug!("{http_method} {method}");
        let req = ApiRequest::new(http_method, &self.config.rest_url)
            .params(params.unwrap_or_default().iter().copied())
            .param("method", method)
            .param("format", "json")
            .param("nojsoncallback", "1");
        let resp = self.execute(req).await?;
        decode_json(&resp)
    }

    /// Signs and sends a request, returning the undecoded response
    pub async fn execute(&self, req: ApiRequest) -> Result<RawResponse, FlickrError> {
        let signed = req.sign(&self.creds)?;
        let http = signed.to_http();
        self.transport.send(&http).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .finish()
    }
}
