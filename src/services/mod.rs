/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

pub mod client;
pub mod config;
pub mod creds;
pub mod errors;
mod macros;
pub mod multipart;
pub mod oauth;
mod parsers;
pub mod photo;
pub mod photosets;
pub mod properties;
pub mod request;
pub mod response;
pub mod transport;
pub mod upload;

pub use client::*;
pub use config::*;
pub use creds::*;
pub use errors::*;
pub use photo::*;
pub use photosets::*;
pub use properties::*;
pub use request::{ApiRequest, HttpBody, HttpMethod, HttpRequest, SignedRequest};
pub use response::{ApiEnvelope, Stat, UploadResponse};
pub use transport::*;
pub use upload::*;
