/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum FlickrError {
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("Request network error")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error. {0}")]
    Configuration(String),

    #[error("Expected response missing")]
    ResponseMissing(),

    #[error("API Response was error: {0}, msg: {1}")]
    ApiResponse(u32, String),

    #[error("API Response is malformed: {0}")]
    ApiResponseMalformed(String),

    #[error("HTTP status {0} without an API response body")]
    HttpStatus(u16),

    #[error("Failed decoding field `{path}`: {message}")]
    Decode { path: String, message: String },

    #[error("Upload response is malformed: {0}")]
    Xml(String),

    #[error("Status of upload ticket {0} is unknown")]
    TicketUnknown(String),

    #[error("Upload ticket {0} failed")]
    UploadFailed(String),
}

impl FlickrError {
    /// True when the failure happened before an API response was received
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FlickrError::Request(_) | FlickrError::Timeout(_) | FlickrError::Io(_)
        )
    }

    /// True when asking again later may give a different answer.
    ///
    /// Nothing in this crate retries on its own; this only helps callers that layer a
    /// retry or polling policy on top.
    pub fn is_transient(&self) -> bool {
        match self {
            FlickrError::Timeout(_) | FlickrError::TicketUnknown(_) => true,
            FlickrError::Request(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for FlickrError {
    fn from(err: serde_json::Error) -> Self {
        FlickrError::ApiResponseMalformed(err.to_string())
    }
}

impl<E: std::fmt::Display> From<serde_path_to_error::Error<E>> for FlickrError {
    fn from(err: serde_path_to_error::Error<E>) -> Self {
        FlickrError::Decode {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}

impl From<quick_xml::Error> for FlickrError {
    fn from(err: quick_xml::Error) -> Self {
        FlickrError::Xml(err.to_string())
    }
}
