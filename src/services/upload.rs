/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Synchronous and asynchronous photo uploads and upload ticket polling.
//!
//! An asynchronous upload hands back an [`UploadTicket`] straight away. The ticket moves
//! `queued -> inProgress -> completed | failed | replaced` as it is polled with
//! [`Client::poll_tickets`] or [`Client::check_tickets`]. How often to poll, and when to
//! give up, is up to the caller: nothing here polls in the background or retries.

use crate::services::errors::FlickrError;
use crate::services::multipart::BinaryPart;
use crate::services::parsers::{from_flag, from_lenient_number, from_lenient_string};
use crate::services::request::{ApiRequest, HttpMethod};
use crate::services::response::{UploadResponse, decode_upload};
use crate::services::{Client, ContentType, HiddenLevel, SafetyLevel, TicketCode, TicketStatus};
use bytes::Bytes;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

const PHOTO_FIELD: &str = "photo";
const DEFAULT_FILE_NAME: &str = "photo";

/// Where the bytes of an upload come from.
#[derive(Debug, Clone)]
pub enum PhotoSource {
    Bytes {
        data: Bytes,
        file_name: Option<String>,
    },
    File(PathBuf),
}

impl PhotoSource {
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        PhotoSource::Bytes {
            data: data.into(),
            file_name: None,
        }
    }

    /// In-memory photo with a file name, which is also used to infer its content type
    pub fn from_named_bytes(data: impl Into<Bytes>, file_name: &str) -> Self {
        PhotoSource::Bytes {
            data: data.into(),
            file_name: Some(file_name.into()),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        PhotoSource::File(path.into())
    }

    async fn into_part(self) -> Result<BinaryPart, FlickrError> {
        let (data, file_name) = match self {
            PhotoSource::Bytes { data, file_name } => (data, file_name),
            PhotoSource::File(path) => {
                let data = tokio::fs::read(&path).await?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                (Bytes::from(data), file_name)
            }
        };
        let file_name = file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.into());
        Ok(BinaryPart::new(PHOTO_FIELD, &file_name, None, data))
    }
}

/// Optional metadata sent along with an upload. Only fields that are set are sent.
#[derive(Debug, Clone, Default)]
pub struct UploadParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub is_public: Option<bool>,
    pub is_friend: Option<bool>,
    pub is_family: Option<bool>,
    pub safety_level: Option<SafetyLevel>,
    pub content_type: Option<ContentType>,
    pub hidden: Option<HiddenLevel>,
}

impl UploadParams {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.into());
        self
    }

    fn to_params(&self) -> Vec<(&'static str, String)> {
        let flag = |v: bool| String::from(if v { "1" } else { "0" });

        let mut params = Vec::new();
        if let Some(title) = &self.title {
            params.push(("title", title.clone()));
        }
        if let Some(description) = &self.description {
            params.push(("description", description.clone()));
        }
        if !self.tags.is_empty() {
            params.push(("tags", format_tags(&self.tags)));
        }
        if let Some(v) = self.is_public {
            params.push(("is_public", flag(v)));
        }
        if let Some(v) = self.is_friend {
            params.push(("is_friend", flag(v)));
        }
        if let Some(v) = self.is_family {
            params.push(("is_family", flag(v)));
        }
        if let Some(v) = self.safety_level {
            params.push(("safety_level", u8::from(v).to_string()));
        }
        if let Some(v) = self.content_type {
            params.push(("content_type", u8::from(v).to_string()));
        }
        if let Some(v) = self.hidden {
            params.push(("hidden", u8::from(v).to_string()));
        }
        params
    }
}

// Tags are space separated; multi word tags are quoted
fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| t.replace('"', ""))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(|t| if t.contains(' ') { format!("\"{t}\"") } else { t })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Handle on an asynchronously processed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub ticket_id: String,
    pub photo_id: Option<String>,
    /// Unix time the photo was imported at
    pub imported: Option<String>,
    pub status: TicketStatus,
}

impl UploadTicket {
    /// A ticket just handed out by an asynchronous upload or replace
    pub fn queued(ticket_id: &str) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            photo_id: None,
            imported: None,
            status: TicketStatus::Queued,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Resolves the ticket into its result.
    ///
    /// `Ok(None)` while still being processed, the photo id once completed or replaced.
    /// A failed upload is [`FlickrError::UploadFailed`]; an unrecognised status is
    /// [`FlickrError::TicketUnknown`], which is transient.
    pub fn outcome(&self) -> Result<Option<&str>, FlickrError> {
        match self.status {
            TicketStatus::Queued | TicketStatus::InProgress => Ok(None),
            TicketStatus::Completed | TicketStatus::Replaced => self
                .photo_id
                .as_deref()
                .map(Some)
                .ok_or(FlickrError::ResponseMissing()),
            TicketStatus::Failed => Err(FlickrError::UploadFailed(self.ticket_id.clone())),
            TicketStatus::Unknown => Err(FlickrError::TicketUnknown(self.ticket_id.clone())),
        }
    }

    // Terminal tickets are never moved again
    fn observe(&mut self, observed: &TicketObservation) {
        if self.is_terminal() {
            log::trace!("ticket {} already {}, ignoring poll", self.ticket_id, self.status);
            return;
        }
        self.status = observed.status();
        if observed.photo_id.is_some() {
            self.photo_id = observed.photo_id.clone();
        }
        if observed.imported.is_some() {
            self.imported = observed.imported.clone();
        }
    }

    fn unreported(&mut self) {
        if !self.is_terminal() {
            self.status = TicketStatus::Unknown;
        }
    }
}

// One entry of `uploader.ticket` in a checkTickets response
#[derive(Deserialize, Debug)]
struct TicketObservation {
    #[serde(deserialize_with = "from_lenient_string_required")]
    id: String,

    #[serde(default, deserialize_with = "from_lenient_number")]
    complete: Option<u32>,

    #[serde(default, rename = "photoid", deserialize_with = "from_lenient_string")]
    photo_id: Option<String>,

    #[serde(default, deserialize_with = "from_lenient_string")]
    imported: Option<String>,

    #[serde(default, deserialize_with = "from_flag")]
    invalid: Option<bool>,
}

fn from_lenient_string_required<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    from_lenient_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("ticket id is null"))
}

impl TicketObservation {
    fn status(&self) -> TicketStatus {
        if self.invalid.unwrap_or(false) {
            return TicketStatus::Unknown;
        }
        match self.complete.map(TicketCode::from) {
            Some(TicketCode::Unrecognized(code)) => {
                log::warn!("ticket {} has unrecognized status code {code}", self.id);
                TicketStatus::Unknown
            }
            Some(code) => code.into(),
            None => TicketStatus::Unknown,
        }
    }
}

// Expected response from a checkTickets request
#[derive(Deserialize, Debug)]
struct CheckTicketsResponse {
    uploader: Uploader,
}

#[derive(Deserialize, Debug)]
struct Uploader {
    #[serde(default)]
    ticket: Vec<TicketObservation>,
}

impl Client {
    /// Uploads a photo and waits for Flickr to process it, returning the new photo id
    pub async fn upload(
        &self,
        photo: PhotoSource,
        params: &UploadParams,
    ) -> Result<String, FlickrError> {
        let url = self.config().upload_url.clone();
        self.send_upload(&url, photo, params.to_params(), false)
            .await?
            .photo_id
            .ok_or(FlickrError::ResponseMissing())
    }

    /// Uploads a photo for asynchronous processing. Does not wait for the photo to be
    /// processed; poll the returned ticket instead.
    pub async fn upload_async(
        &self,
        photo: PhotoSource,
        params: &UploadParams,
    ) -> Result<UploadTicket, FlickrError> {
        let url = self.config().upload_url.clone();
        let ticket_id = self
            .send_upload(&url, photo, params.to_params(), true)
            .await?
            .ticket_id
            .ok_or(FlickrError::ResponseMissing())?;
        Ok(UploadTicket::queued(&ticket_id))
    }

    /// Replaces the image of an existing photo, returning its id
    pub async fn replace(&self, photo_id: &str, photo: PhotoSource) -> Result<String, FlickrError> {
        let url = self.config().replace_url.clone();
        self.send_upload(&url, photo, vec![("photo_id", photo_id.into())], false)
            .await?
            .photo_id
            .ok_or(FlickrError::ResponseMissing())
    }

    /// Replaces the image of an existing photo with asynchronous processing
    pub async fn replace_async(
        &self,
        photo_id: &str,
        photo: PhotoSource,
    ) -> Result<UploadTicket, FlickrError> {
        let url = self.config().replace_url.clone();
        let ticket_id = self
            .send_upload(&url, photo, vec![("photo_id", photo_id.into())], true)
            .await?
            .ticket_id
            .ok_or(FlickrError::ResponseMissing())?;
        Ok(UploadTicket::queued(&ticket_id))
    }

    async fn send_upload(
        &self,
        url: &str,
        photo: PhotoSource,
        params: Vec<(&'static str, String)>,
        is_async: bool,
    ) -> Result<UploadResponse, FlickrError> {
        let part = photo.into_part().await?;
        log::debug!(
            "uploading {} ({} bytes, {}) to {url}",
            part.file_name,
            part.data.len(),
            part.content_type
        );

        let mut req = ApiRequest::new(HttpMethod::Post, url).binary(part);
        for (name, value) in params {
            req = req.param(name, value);
        }
        if is_async {
            req = req.param("async", "1");
        }
        let resp = self.execute(req).await?;
        decode_upload(&resp)
    }

    /// Fetches the current state of the given tickets with a single call.
    ///
    /// Tickets come back in the order of `ticket_ids`, each matched by id. Ids the server
    /// does not report, or reports as invalid, come back as [`TicketStatus::Unknown`].
    pub async fn check_tickets<S: AsRef<str>>(
        &self,
        ticket_ids: &[S],
    ) -> Result<Vec<UploadTicket>, FlickrError> {
        let mut tickets: Vec<UploadTicket> = ticket_ids
            .iter()
            .map(|id| UploadTicket::queued(id.as_ref()))
            .collect();
        self.poll_tickets(&mut tickets).await?;
        Ok(tickets)
    }

    /// Polls every non-terminal ticket once and updates it in place.
    ///
    /// No call is made when all tickets are already terminal.
    pub async fn poll_tickets(&self, tickets: &mut [UploadTicket]) -> Result<(), FlickrError> {
        let mut pending: Vec<&str> = tickets
            .iter()
            .filter(|t| !t.is_terminal())
            .map(|t| t.ticket_id.as_str())
            .collect();
        pending.sort_unstable();
        pending.dedup();
        if pending.is_empty() {
            return Ok(());
        }

        let ids = pending.join(",");
        let resp = self
            .get::<CheckTicketsResponse>(
                "flickr.photos.upload.checkTickets",
                Some(&[("tickets", ids.as_str())]),
            )
            .await?;

        let observed: HashMap<&str, &TicketObservation> = resp
            .uploader
            .ticket
            .iter()
            .map(|t| (t.id.as_str(), t))
            .collect();
        for ticket in tickets.iter_mut().filter(|t| !t.is_terminal()) {
            match observed.get(ticket.ticket_id.as_str()) {
                Some(observation) => ticket.observe(observation),
                None => {
                    log::warn!("ticket {} missing from checkTickets response", ticket.ticket_id);
                    ticket.unreported();
                }
            }
        }
        Ok(())
    }
}
