/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # Flickr
//!
//! This Flickr library was created for working with the Flickr REST and Upload APIs.
//!
//! For further details on the Rest API refer to the [Flickr API Docs](https://www.flickr.com/services/api/)
//!
//! ## Features
//!
//! - OAuth 1.0a request signing (HMAC-SHA1)
//! - Generic signed calls to any REST method, decoded into your own types
//! - Photo upload and replace
//!     - Synchronous, returning the photo id
//!     - Asynchronous, returning a ticket that can be polled
//! - Photo list information (paged)
//! - Lower level interface for handling the raw communication
//!
//! *The Flickr API uses OAuth1. This library handles the request signing.
//! Getting the Access Token/Secret is left up to the consumer of this library*
//!
//! *If you want to use this library for more that is currently implemented,
//! [`services::Client::get`] and [`services::Client::post`] call any method and decode the
//! result into any `serde` type*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! flickr = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! **You will need to acquire an API key/secret from Flickr prior to using the API**
//!
//! ```rust,no_run
//! use flickr::services::{Client, Creds, PhotoSource, UploadParams};
//! use std::time::Duration;
//!
//!async fn upload_and_wait(
//!    api_key: &str,
//!    api_secret: &str,
//!    access_token: &str,
//!    access_token_secret: &str,
//!) -> anyhow::Result<Option<String>> {
//!    // The API key/secret is obtained from your Flickr account
//!    // The Access Token/Secret is obtained via Oauth1 process external to this
//!    let client = Client::new(Creds::from_tokens(
//!        api_key,
//!        api_secret,
//!        access_token,
//!        access_token_secret,
//!    )?)?;
//!
//!    let params = UploadParams::default()
//!        .with_title("Clear Implications")
//!        .with_tag("San Francisco");
//!    let mut tickets = vec![
//!        client.upload_async(PhotoSource::from_path("Clear Implications.jpg"), &params).await?,
//!    ];
//!
//!    // Poll until the ticket settles. Cadence and give up policy are up to you.
//!    for _ in 0..30 {
//!        client.poll_tickets(&mut tickets).await?;
//!        if tickets[0].is_terminal() {
//!            return Ok(tickets[0].outcome()?.map(str::to_string));
//!        }
//!        tokio::time::sleep(Duration::from_secs(2)).await;
//!    }
//!    Ok(None)
//!}
//! ```
//!
pub mod services;
