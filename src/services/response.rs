/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::services::errors::FlickrError;
use crate::services::transport::RawResponse;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::str::FromStr;
use strum_macros::{Display, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Stat {
    Ok,
    Fail,
}

/// Outer part common to every response: `stat`, plus `code`/`message` on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEnvelope {
    pub stat: Stat,
    pub code: Option<u32>,
    pub message: Option<String>,
}

impl ApiEnvelope {
    fn from_object(obj: &Map<String, Value>) -> Result<Self, FlickrError> {
        let stat = obj
            .get("stat")
            .and_then(Value::as_str)
            .ok_or_else(|| FlickrError::ApiResponseMalformed("missing `stat`".into()))?;
        let stat = Stat::from_str(stat)
            .map_err(|_| FlickrError::ApiResponseMalformed(format!("unexpected stat `{stat}`")))?;

        match stat {
            Stat::Ok => Ok(Self {
                stat,
                code: None,
                message: None,
            }),
            Stat::Fail => {
                let code = obj
                    .get("code")
                    .and_then(code_from_value)
                    .ok_or_else(|| FlickrError::ApiResponseMalformed("fail without `code`".into()))?;
                let message = obj
                    .get("message")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        FlickrError::ApiResponseMalformed("fail without `message`".into())
                    })?;
                Ok(Self {
                    stat,
                    code: Some(code),
                    message: Some(message.to_string()),
                })
            }
        }
    }

    /// Turns a `fail` envelope into the API error it carries
    pub fn into_result(self) -> Result<(), FlickrError> {
        match (self.stat, self.code, self.message) {
            (Stat::Ok, _, _) => Ok(()),
            (Stat::Fail, Some(code), Some(message)) => Err(FlickrError::ApiResponse(code, message)),
            (Stat::Fail, _, _) => Err(FlickrError::ApiResponseMalformed(
                "fail without code and message".into(),
            )),
        }
    }
}

fn code_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decodes a JSON response into `T`.
///
/// A `fail` envelope becomes [`FlickrError::ApiResponse`] and `T` is never touched. On `ok`
/// the whole object (payload fields sit beside `stat`) is decoded into `T`; a field of the
/// wrong type is reported with its path.
pub fn decode_json<T: DeserializeOwned>(resp: &RawResponse) -> Result<T, FlickrError> {
    let value = match serde_json::from_slice::<Value>(&resp.body) {
        Ok(value) => value,
        Err(_) if !resp.is_success() => return Err(FlickrError::HttpStatus(resp.status)),
        Err(err) => return Err(err.into()),
    };
    let envelope = match &value {
        Value::Object(obj) => ApiEnvelope::from_object(obj),
        _ => Err(FlickrError::ApiResponseMalformed(
            "response is not a JSON object".into(),
        )),
    };
    // Error pages that happen to be JSON carry no envelope
    let envelope = match envelope {
        Err(FlickrError::ApiResponseMalformed(_)) if !resp.is_success() => {
            return Err(FlickrError::HttpStatus(resp.status));
        }
        other => other?,
    };
    envelope.into_result()?;

    Ok(serde_path_to_error::deserialize(value)?)
}

/// What the upload and replace endpoints answer with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResponse {
    pub photo_id: Option<String>,
    pub ticket_id: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum UploadField {
    PhotoId,
    TicketId,
}

/// Decodes the XML envelope of the upload endpoints:
/// `<rsp stat="ok"><photoid>..</photoid></rsp>`, `<rsp stat="ok"><ticketid>..</ticketid></rsp>`
/// or `<rsp stat="fail"><err code=".." msg=".."/></rsp>`.
pub fn decode_upload(resp: &RawResponse) -> Result<UploadResponse, FlickrError> {
    let text = match std::str::from_utf8(&resp.body) {
        Ok(text) => text,
        Err(_) if !resp.is_success() => return Err(FlickrError::HttpStatus(resp.status)),
        Err(err) => return Err(FlickrError::Xml(err.to_string())),
    };
    match parse_upload_xml(text) {
        Err(FlickrError::Xml(_)) if !resp.is_success() => Err(FlickrError::HttpStatus(resp.status)),
        other => other,
    }
}

fn parse_upload_xml(xml: &str) -> Result<UploadResponse, FlickrError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stat: Option<Stat> = None;
    let mut error: Option<(u32, String)> = None;
    let mut current: Option<UploadField> = None;
    let mut upload = UploadResponse::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"rsp" => stat = Some(stat_attr(&e)?),
                b"photoid" => current = Some(UploadField::PhotoId),
                b"ticketid" => current = Some(UploadField::TicketId),
                b"err" => error = Some(err_attrs(&e)?),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"rsp" => stat = Some(stat_attr(&e)?),
                b"err" => error = Some(err_attrs(&e)?),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Some(field) = current {
                    let text = e.unescape()?.trim().to_string();
                    match field {
                        UploadField::PhotoId => upload.photo_id = Some(text),
                        UploadField::TicketId => upload.ticket_id = Some(text),
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FlickrError::Xml(format!(
                    "error at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    match stat {
        None => Err(FlickrError::Xml("missing <rsp stat=..> element".into())),
        Some(Stat::Fail) => {
            let (code, msg) =
                error.ok_or_else(|| FlickrError::Xml("fail without <err> element".into()))?;
            Err(FlickrError::ApiResponse(code, msg))
        }
        Some(Stat::Ok) => Ok(upload),
    }
}

fn attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>, FlickrError> {
    for a in e.attributes() {
        let a = a.map_err(|err| FlickrError::Xml(err.to_string()))?;
        if a.key.as_ref() == name {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn stat_attr(e: &BytesStart) -> Result<Stat, FlickrError> {
    let stat = attr(e, b"stat")?.ok_or_else(|| FlickrError::Xml("<rsp> without stat".into()))?;
    Stat::from_str(&stat).map_err(|_| FlickrError::Xml(format!("unexpected stat `{stat}`")))
}

fn err_attrs(e: &BytesStart) -> Result<(u32, String), FlickrError> {
    let code = attr(e, b"code")?
        .and_then(|c| c.trim().parse().ok())
        .ok_or_else(|| FlickrError::Xml("<err> without numeric code".into()))?;
    let msg = attr(e, b"msg")?.unwrap_or_default();
    Ok((code, msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde::Deserialize;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: Bytes::from(body.to_string()),
        }
    }

    #[derive(Deserialize, Debug)]
    struct CommentResponse {
        comment: Comment,
    }

    #[derive(Deserialize, Debug)]
    struct Comment {
        id: String,
    }

    #[test]
    fn ok_payload_sits_beside_stat() {
        let resp = raw(200, r#"{"comment":{"id":"97777-72057594037941949-72157626154232016"},"stat":"ok"}"#);
        let decoded: CommentResponse = decode_json(&resp).unwrap();
        assert_eq!(decoded.comment.id, "97777-72057594037941949-72157626154232016");
    }

    #[test]
    fn fail_envelope_is_an_api_error() {
        let resp = raw(200, r#"{"stat":"fail","code":1,"message":"Photo not found"}"#);
        let err = decode_json::<CommentResponse>(&resp).unwrap_err();
        match err {
            FlickrError::ApiResponse(code, msg) => {
                assert_eq!(code, 1);
                assert_eq!(msg, "Photo not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn fail_envelope_is_not_decoded_into_the_target() {
        // A target that would accept anything still must not be produced
        let resp = raw(200, r#"{"stat":"fail","code":1,"message":"Photo not found"}"#);
        assert!(matches!(
            decode_json::<Value>(&resp),
            Err(FlickrError::ApiResponse(1, _))
        ));
    }

    #[test]
    fn fail_without_code_is_malformed() {
        let resp = raw(200, r#"{"stat":"fail","message":"Photo not found"}"#);
        assert!(matches!(
            decode_json::<Value>(&resp),
            Err(FlickrError::ApiResponseMalformed(_))
        ));
    }

    #[test]
    fn missing_or_unknown_stat_is_malformed() {
        for body in [r#"{"comment":{}}"#, r#"{"stat":"maybe"}"#, r#"[1,2]"#] {
            assert!(matches!(
                decode_json::<Value>(&raw(200, body)),
                Err(FlickrError::ApiResponseMalformed(_))
            ));
        }
    }

    #[test]
    fn wrong_field_type_names_the_field() {
        let resp = raw(200, r#"{"comment":{"id":42},"stat":"ok"}"#);
        match decode_json::<CommentResponse>(&resp).unwrap_err() {
            FlickrError::Decode { path, .. } => assert_eq!(path, "comment.id"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_json_error_page_reports_status() {
        let resp = raw(502, "<html>Bad Gateway</html>");
        assert!(matches!(
            decode_json::<Value>(&resp),
            Err(FlickrError::HttpStatus(502))
        ));
    }

    #[test]
    fn json_error_page_without_envelope_reports_status() {
        let resp = raw(500, r#"{"error":"x"}"#);
        assert!(matches!(
            decode_json::<Value>(&resp),
            Err(FlickrError::HttpStatus(500))
        ));

        // An envelope still wins over the status
        let resp = raw(500, r#"{"stat":"fail","code":105,"message":"Service currently unavailable"}"#);
        assert!(matches!(
            decode_json::<Value>(&resp),
            Err(FlickrError::ApiResponse(105, _))
        ));
    }

    #[test]
    fn upload_photo_id() {
        let resp = raw(
            200,
            "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<rsp stat=\"ok\">\n<photoid>14673464538</photoid>\n</rsp>\n",
        );
        let upload = decode_upload(&resp).unwrap();
        assert_eq!(upload.photo_id.as_deref(), Some("14673464538"));
        assert!(upload.ticket_id.is_none());
    }

    #[test]
    fn upload_ticket_id() {
        let resp = raw(200, r#"<rsp stat="ok"><ticketid>124834485-72157645804301208</ticketid></rsp>"#);
        let upload = decode_upload(&resp).unwrap();
        assert_eq!(upload.ticket_id.as_deref(), Some("124834485-72157645804301208"));
        assert!(upload.photo_id.is_none());
    }

    #[test]
    fn upload_failure() {
        let resp = raw(200, r#"<rsp stat="fail"><err code="3" msg="General upload failure"/></rsp>"#);
        match decode_upload(&resp).unwrap_err() {
            FlickrError::ApiResponse(code, msg) => {
                assert_eq!(code, 3);
                assert_eq!(msg, "General upload failure");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn upload_without_rsp_is_malformed() {
        assert!(matches!(
            decode_upload(&raw(200, "<photoid>1</photoid>")),
            Err(FlickrError::Xml(_))
        ));
    }
}
