/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use bytes::Bytes;
use flickr::services::{Client, ClientConfig, Creds};
use futures::stream;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;
use wiremock::{MockServer, Request};

// Smallest JFIF header; enough for content type sniffing
#[allow(dead_code)]
pub(crate) const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00\x01\x01\x00\x00\x01\x00\x01\x00\x00\xFF\xD9";

#[derive(Deserialize, Debug)]
struct FlickrOauth1Token {
    token: String,
    secret: String,
}

fn get_flickr_tokens(path: PathBuf) -> anyhow::Result<FlickrOauth1Token> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

#[allow(dead_code)]
pub(crate) fn get_full_auth_tokens() -> anyhow::Result<Creds> {
    let api_key = std::env::var("FLICKR_API_KEY")?;
    let api_secret = std::env::var("FLICKR_API_SECRET")?;
    let token_cache = std::env::var("FLICKR_AUTH_CACHE")?;
    let tokens = get_flickr_tokens(token_cache.into())?;

    Ok(Creds::from_tokens(
        &api_key,
        &api_secret,
        &tokens.token,
        &tokens.secret,
    )?)
}

#[allow(dead_code)]
pub(crate) fn test_creds() -> Creds {
    Creds::from_tokens("test-key", "test-secret", "test-token", "test-token-secret").unwrap()
}

/// Client pointed at the mock server for every endpoint
#[allow(dead_code)]
pub(crate) fn mock_client(server: &MockServer) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = ClientConfig::default()
        .with_origin(&server.uri())
        .with_timeout(Duration::from_secs(5));
    Client::with_config(test_creds(), config).unwrap()
}

/// One part of a captured `multipart/form-data` body
#[allow(dead_code)]
#[derive(Debug)]
pub(crate) struct FormField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Parses the multipart body a mock server received, in wire order
#[allow(dead_code)]
pub(crate) async fn multipart_fields(request: &Request) -> anyhow::Result<Vec<FormField>> {
    let content_type = request
        .headers
        .get("content-type")
        .ok_or_else(|| anyhow::anyhow!("request has no content type"))?
        .to_str()?;
    let boundary = multer::parse_boundary(content_type)?;
    let body = Bytes::from(request.body.clone());
    let stream = stream::once(async move { Ok::<_, std::io::Error>(body) });

    let mut multipart = multer::Multipart::new(stream, boundary);
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(|m| m.to_string());
        let data = field.bytes().await?;
        fields.push(FormField {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(fields)
}

/// Text value of a named field
#[allow(dead_code)]
pub(crate) fn form_text<'a>(fields: &'a [FormField], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|f| f.name == name)
        .and_then(|f| std::str::from_utf8(&f.data).ok())
}
