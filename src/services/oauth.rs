/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! OAuth 1.0a HMAC-SHA1 request signing.
//!
//! The signature only depends on its inputs. Nonce and timestamp are ordinary parameters
//! supplied by the request builder, so signing the same parameter set twice always yields
//! the same signature.

use crate::services::Creds;
use crate::services::errors::FlickrError;
use crate::services::request::HttpMethod;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";
pub const SIGNATURE_PARAM: &str = "oauth_signature";

type HmacSha1 = Hmac<Sha1>;

/// Percent-encodes per RFC 3986, leaving only `A-Z a-z 0-9 - . _ ~` untouched.
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Encodes every pair, then sorts by encoded key and encoded value and joins them.
pub fn normalize_params<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the `METHOD&url&params` string the HMAC is computed over.
pub fn signature_base_string<'a, I>(
    method: HttpMethod,
    url: &url::Url,
    params: I,
) -> Result<String, FlickrError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    if url.query().is_some() || url.fragment().is_some() {
        return Err(FlickrError::Configuration(format!(
            "signing url must not carry a query or fragment: {url}"
        )));
    }
    let method: &'static str = method.into();
    Ok(format!(
        "{}&{}&{}",
        method,
        encode(url.as_str()),
        encode(&normalize_params(params))
    ))
}

/// Computes the base64 encoded `oauth_signature` for the parameter set.
///
/// `params` must hold every parameter that is sent except the signature itself and any
/// binary part.
pub fn sign<'a, I>(
    method: HttpMethod,
    url: &url::Url,
    params: I,
    creds: &Creds,
) -> Result<String, FlickrError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let base = signature_base_string(method, url, params)?;
    log::trace!("oauth signature base string: {base}");

    let key = format!(
        "{}&{}",
        encode(creds.consumer_secret()),
        encode(creds.token_secret())
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| FlickrError::Configuration(format!("invalid signing key: {e}")))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
