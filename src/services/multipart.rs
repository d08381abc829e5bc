/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::services::errors::FlickrError;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// The binary file part of an upload.
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryPart {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl BinaryPart {
    /// Creates a part, inferring the content type when none is given
    pub fn new(
        field_name: &str,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Self {
        let content_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| infer_content_type(file_name, &data).to_string());
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content_type,
            data,
        }
    }
}

impl std::fmt::Debug for BinaryPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryPart")
            .field("field_name", &self.field_name)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Builds the `multipart/form-data` body of an upload: every signed text field, then the file.
pub fn to_form<'a, I>(fields: I, binary: &BinaryPart) -> Result<Form, FlickrError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let file = Part::bytes(binary.data.to_vec())
        .file_name(binary.file_name.clone())
        .mime_str(&binary.content_type)
        .map_err(|e| {
            FlickrError::Configuration(format!(
                "invalid content type `{}`: {e}",
                binary.content_type
            ))
        })?;

    let form = fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name.to_string(), value.to_string())
        });
    Ok(form.part(binary.field_name.clone(), file))
}

/// Guesses the media type of an upload, first by file extension then by its leading bytes.
pub fn infer_content_type(file_name: &str, data: &[u8]) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    let by_extension = match extension.as_deref() {
        Some("jpg" | "jpeg" | "jpe") => Some("image/jpeg"),
        Some("png") => Some("image/png"),
        Some("gif") => Some("image/gif"),
        Some("tif" | "tiff") => Some("image/tiff"),
        Some("heic") => Some("image/heic"),
        Some("webp") => Some("image/webp"),
        Some("mov") => Some("video/quicktime"),
        Some("mp4" | "m4v") => Some("video/mp4"),
        Some("avi") => Some("video/x-msvideo"),
        Some("mpg" | "mpeg") => Some("video/mpeg"),
        _ => None,
    };
    by_extension.unwrap_or_else(|| sniff_content_type(data))
}

fn sniff_content_type(data: &[u8]) -> &'static str {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => "image/tiff",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [_, _, _, _, b'f', b't', b'y', b'p', brand @ ..] => match brand {
            [b'q', b't', ..] => "video/quicktime",
            [b'h', b'e', b'i', b'c', ..] | [b'h', b'e', b'i', b'x', ..] | [b'm', b'i', b'f', b'1', ..] => {
                "image/heic"
            }
            _ => "video/mp4",
        },
        _ => FALLBACK_CONTENT_TYPE,
    }
}
