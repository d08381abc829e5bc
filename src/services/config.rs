/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use std::time::Duration;

// Root Flickr API endpoints
pub const API_ORIGIN: &str = "https://api.flickr.com";
pub const UPLOAD_ORIGIN: &str = "https://up.flickr.com";
pub const REST_PATH: &str = "/services/rest";
pub const UPLOAD_PATH: &str = "/services/upload/";
pub const REPLACE_PATH: &str = "/services/replace/";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Endpoints and transport settings used by a [`Client`](crate::services::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rest_url: String,
    pub upload_url: String,
    pub replace_url: String,
    /// Applied to every HTTP exchange. Expiry is reported as a timeout error, never retried.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rest_url: format!("{API_ORIGIN}{REST_PATH}"),
            upload_url: format!("{UPLOAD_ORIGIN}{UPLOAD_PATH}"),
            replace_url: format!("{UPLOAD_ORIGIN}{REPLACE_PATH}"),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ClientConfig {
    /// Points the REST, upload and replace endpoints at a single origin
    pub fn with_origin(mut self, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        self.rest_url = format!("{origin}{REST_PATH}");
        self.upload_url = format!("{origin}{UPLOAD_PATH}");
        self.replace_url = format!("{origin}{REPLACE_PATH}");
        self
    }

    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.rest_url = url.into();
        self
    }

    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }

    pub fn with_replace_url(mut self, url: impl Into<String>) -> Self {
        self.replace_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_override_keeps_paths() {
        let config = ClientConfig::default().with_origin("http://127.0.0.1:4000/");
        assert_eq!(config.rest_url, "http://127.0.0.1:4000/services/rest");
        assert_eq!(config.upload_url, "http://127.0.0.1:4000/services/upload/");
        assert_eq!(config.replace_url, "http://127.0.0.1:4000/services/replace/");
    }
}
