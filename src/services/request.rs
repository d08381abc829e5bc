/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::services::errors::FlickrError;
use crate::services::multipart::BinaryPart;
use crate::services::oauth::{self, OAUTH_VERSION, SIGNATURE_METHOD, SIGNATURE_PARAM};
use crate::services::Creds;
use bytes::Bytes;
use std::collections::BTreeMap;
use strum_macros::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

/// An unsigned call: target, business parameters and an optional file.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: HttpMethod,
    url: String,
    params: BTreeMap<String, String>,
    binary: Option<BinaryPart>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.into(),
            params: BTreeMap::new(),
            binary: None,
        }
    }

    /// Adds a parameter, replacing an earlier value for the same name
    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn params<'a, I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    /// Attaches a file. The request is then sent as `multipart/form-data`.
    pub fn binary(mut self, part: BinaryPart) -> Self {
        self.binary = Some(part);
        self
    }

    /// Signs with a fresh nonce and the current time
    pub fn sign(self, creds: &Creds) -> Result<SignedRequest, FlickrError> {
        let nonce = format!("{:016x}{:016x}", rand::random::<u64>(), rand::random::<u64>());
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.sign_with(creds, &nonce, &timestamp)
    }

    /// Signs with the provided nonce and timestamp
    pub fn sign_with(
        self,
        creds: &Creds,
        nonce: &str,
        timestamp: &str,
    ) -> Result<SignedRequest, FlickrError> {
        if self.params.contains_key(SIGNATURE_PARAM) {
            return Err(FlickrError::Configuration(format!(
                "`{SIGNATURE_PARAM}` is reserved and computed during signing"
            )));
        }
        if self.binary.is_some() && self.method != HttpMethod::Post {
            return Err(FlickrError::Configuration(format!(
                "a file can only be sent with POST, not {}",
                self.method
            )));
        }
        let url = url::Url::parse(&self.url).map_err(|e| {
            FlickrError::Configuration(format!("invalid endpoint url `{}`: {e}", self.url))
        })?;

        let mut params = self.params;
        params.insert("oauth_consumer_key".into(), creds.consumer_key().into());
        params.insert("oauth_token".into(), creds.access_token().into());
        params.insert("oauth_nonce".into(), nonce.into());
        params.insert("oauth_timestamp".into(), timestamp.into());
        params.insert("oauth_signature_method".into(), SIGNATURE_METHOD.into());
        params.insert("oauth_version".into(), OAUTH_VERSION.into());

        let signature = oauth::sign(
            self.method,
            &url,
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            creds,
        )?;
        params.insert(SIGNATURE_PARAM.into(), signature);

        Ok(SignedRequest {
            method: self.method,
            url,
            params,
            binary: self.binary,
        })
    }
}

/// A signed request ready to be serialized onto the wire.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: HttpMethod,
    pub url: url::Url,
    pub params: BTreeMap<String, String>,
    pub binary: Option<BinaryPart>,
}

impl SignedRequest {
    pub fn signature(&self) -> Option<&str> {
        self.params.get(SIGNATURE_PARAM).map(String::as_str)
    }

    /// Serializes into the exchange handed to the transport.
    ///
    /// `GET` carries the parameters in the query string, `POST` in a url-encoded form body,
    /// and a request with a file as `multipart/form-data`.
    pub fn to_http(&self) -> HttpRequest {
        let fields = self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()));

        if let Some(binary) = &self.binary {
            return HttpRequest {
                method: HttpMethod::Post,
                url: self.url.clone(),
                body: HttpBody::Multipart {
                    fields: self.params.clone(),
                    file: binary.clone(),
                },
            };
        }

        let encoded = encode_pairs(fields);
        match self.method {
            HttpMethod::Get => {
                let mut url = self.url.clone();
                url.set_query(Some(&encoded));
                HttpRequest {
                    method: HttpMethod::Get,
                    url,
                    body: HttpBody::Empty,
                }
            }
            HttpMethod::Post => HttpRequest {
                method: HttpMethod::Post,
                url: self.url.clone(),
                body: HttpBody::Form(Bytes::from(encoded)),
            },
        }
    }
}

fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", oauth::encode(k), oauth::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Body of an exchange, still in the shape it was signed in.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    Empty,
    /// `application/x-www-form-urlencoded` pairs
    Form(Bytes),
    /// Text fields followed by the file, sent as `multipart/form-data`
    Multipart {
        fields: BTreeMap<String, String>,
        file: BinaryPart,
    },
}

/// Raw HTTP exchange as sent by a [`Transport`](crate::services::Transport).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: url::Url,
    pub body: HttpBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Creds {
        Creds::from_tokens("consumer", "consumer-secret", "token", "token-secret").unwrap()
    }

    fn rest_request() -> ApiRequest {
        ApiRequest::new(HttpMethod::Post, "https://api.flickr.com/services/rest")
            .param("method", "flickr.photos.getInfo")
            .param("photo_id", "14673464538")
    }

    #[test]
    fn adds_oauth_parameters_and_signature() {
        let signed = rest_request().sign(&creds()).unwrap();
        for key in [
            "oauth_consumer_key",
            "oauth_token",
            "oauth_nonce",
            "oauth_timestamp",
            "oauth_signature_method",
            "oauth_version",
            "oauth_signature",
        ] {
            assert!(signed.params.contains_key(key), "missing {key}");
        }
        assert_eq!(signed.params["oauth_signature_method"], "HMAC-SHA1");
        assert_eq!(signed.params["oauth_consumer_key"], "consumer");
        assert_eq!(signed.params["photo_id"], "14673464538");
    }

    #[test]
    fn fixed_nonce_and_timestamp_sign_identically() {
        let first = rest_request().sign_with(&creds(), "nonce", "1407299391").unwrap();
        let second = rest_request().sign_with(&creds(), "nonce", "1407299391").unwrap();
        assert_eq!(first.signature(), second.signature());

        let later = rest_request().sign_with(&creds(), "nonce", "1407299392").unwrap();
        assert_ne!(first.signature(), later.signature());
    }

    #[test]
    fn fresh_nonce_per_request() {
        let first = rest_request().sign(&creds()).unwrap();
        let second = rest_request().sign(&creds()).unwrap();
        assert_ne!(first.params["oauth_nonce"], second.params["oauth_nonce"]);
    }

    #[test]
    fn signature_parameter_is_reserved() {
        let err = rest_request()
            .param("oauth_signature", "forged")
            .sign(&creds())
            .unwrap_err();
        assert!(matches!(err, FlickrError::Configuration(_)));
    }

    #[test]
    fn get_uses_query_string() {
        let signed = ApiRequest::new(HttpMethod::Get, "https://api.flickr.com/services/rest")
            .param("text", "golden gate")
            .sign(&creds())
            .unwrap();
        let http = signed.to_http();
        assert_eq!(http.method, HttpMethod::Get);
        assert_eq!(http.body, HttpBody::Empty);
        let query = http.url.query().unwrap();
        assert!(query.contains("text=golden%20gate"));
        assert!(query.contains("oauth_signature="));
    }

    #[test]
    fn post_uses_form_body() {
        let http = rest_request().sign(&creds()).unwrap().to_http();
        assert!(http.url.query().is_none());
        let HttpBody::Form(body) = http.body else {
            panic!("expected a form body");
        };
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("method=flickr.photos.getInfo"));
        assert!(body.contains("oauth_signature="));
    }

    #[test]
    fn binary_is_sent_as_multipart_and_left_out_of_the_signature() {
        let data = Bytes::from_static(b"\xFF\xD8\xFFphoto-bytes");
        let photo = BinaryPart::new("photo", "photo.jpg", None, data.clone());

        let without = ApiRequest::new(HttpMethod::Post, "https://up.flickr.com/services/upload/")
            .param("title", "Clear Implications")
            .sign_with(&creds(), "n", "1")
            .unwrap();
        let with = ApiRequest::new(HttpMethod::Post, "https://up.flickr.com/services/upload/")
            .param("title", "Clear Implications")
            .binary(photo)
            .sign_with(&creds(), "n", "1")
            .unwrap();
        assert_eq!(without.signature(), with.signature());

        let http = with.to_http();
        assert_eq!(http.method, HttpMethod::Post);
        let HttpBody::Multipart { fields, file } = http.body else {
            panic!("expected a multipart body");
        };
        assert_eq!(fields["title"], "Clear Implications");
        assert_eq!(fields.get("oauth_signature").map(String::as_str), with.signature());
        assert!(!fields.contains_key("photo"));
        assert_eq!(file.file_name, "photo.jpg");
        assert_eq!(file.data, data);
    }

    #[test]
    fn file_on_a_get_is_rejected() {
        let photo = BinaryPart::new("photo", "photo.jpg", None, Bytes::from_static(b"\xFF\xD8\xFF"));
        let err = ApiRequest::new(HttpMethod::Get, "https://up.flickr.com/services/upload/")
            .binary(photo)
            .sign(&creds())
            .unwrap_err();
        assert!(matches!(err, FlickrError::Configuration(msg) if msg.contains("POST")));
    }

    #[test]
    fn unparseable_endpoint_is_a_configuration_error() {
        let err = ApiRequest::new(HttpMethod::Get, "not a url")
            .sign(&creds())
            .unwrap_err();
        assert!(matches!(err, FlickrError::Configuration(_)));
    }
}
