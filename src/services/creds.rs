/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::services::errors::FlickrError;

/// The consumer key pair and the access token pair used to sign every request.
///
/// Getting the Access Token/Secret through the OAuth1 authorization dance is left up to the
/// consumer of this library. Once built the credentials never change, so a single instance
/// can be shared freely between concurrent calls.
#[derive(Clone)]
pub struct Creds {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    token_secret: String,
}

impl Creds {
    /// Creates the credentials from the provided tokens
    pub fn from_tokens(
        consumer_key: &str,
        consumer_secret: &str,
        access_token: &str,
        token_secret: &str,
    ) -> Result<Self, FlickrError> {
        let fields = [
            ("consumer key", consumer_key),
            ("consumer secret", consumer_secret),
            ("access token", access_token),
            ("access token secret", token_secret),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(FlickrError::Configuration(format!("{name} is empty")));
        }

        Ok(Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            token_secret: token_secret.into(),
        })
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_secret(&self) -> &str {
        &self.token_secret
    }
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("consumer_key", &"xxx")
            .field("consumer_secret", &"xxx")
            .field("access_token", &"xxx")
            .field("token_secret", &"xxx")
            .finish()
    }
}
