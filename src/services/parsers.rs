/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

// Field rules shared by every response type. Use with `#[serde(default, deserialize_with = ..)]`
// so an absent field stays `None`.

use serde::de::{Error, Unexpected};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

// Parses 0/1 flags (as numbers, numeric strings or booleans)
pub fn from_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Bool(b)) => Ok(Some(b)),
        Some(Scalar::Int(n)) => Ok(Some(n == 1)),
        Some(Scalar::Float(f)) => Err(D::Error::invalid_type(Unexpected::Float(f), &"a 0/1 flag")),
        Some(Scalar::Str(s)) => match s.trim() {
            "" => Ok(None),
            "1" | "true" => Ok(Some(true)),
            "0" | "false" => Ok(Some(false)),
            other => Err(D::Error::invalid_value(Unexpected::Str(other), &"a 0/1 flag")),
        },
    }
}

// Parses numbers that may also be delivered as strings. "" is unset.
pub fn from_lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let text = match Option::<Scalar>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Scalar::Bool(b)) => {
            return Err(D::Error::invalid_type(Unexpected::Bool(b), &"a number"));
        }
        Some(Scalar::Int(n)) => n.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
        Some(Scalar::Str(s)) => s,
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<T>()
        .map(Some)
        .map_err(|e| D::Error::custom(format!("invalid number `{text}`: {e}")))
}

// Parses strings that may be delivered as numbers (ids, unix timestamps)
pub fn from_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Bool(b)) => Err(D::Error::invalid_type(Unexpected::Bool(b), &"a string")),
        Some(Scalar::Int(n)) => Ok(Some(n.to_string())),
        Some(Scalar::Float(f)) => Ok(Some(f.to_string())),
        Some(Scalar::Str(s)) => Ok(Some(s)),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Wrapped {
    Plain(String),
    Content {
        #[serde(rename = "_content")]
        content: Option<String>,
    },
}

// Unwraps `{"_content": "..."}` into its text
pub fn from_content<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Wrapped>::deserialize(deserializer)? {
        None => None,
        Some(Wrapped::Plain(s)) => Some(s),
        Some(Wrapped::Content { content }) => content,
    })
}

// Parses strings that may be "" and sets to None
pub fn from_empty_str_to_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize, Debug)]
    struct Sample {
        #[serde(default, deserialize_with = "from_flag")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "from_lenient_number")]
        count: Option<u32>,
        #[serde(default, deserialize_with = "from_lenient_number")]
        latitude: Option<f64>,
        #[serde(default, deserialize_with = "from_lenient_string")]
        imported: Option<String>,
        #[serde(default, deserialize_with = "from_content")]
        description: Option<String>,
        #[serde(default, deserialize_with = "from_empty_str_to_none")]
        path_alias: Option<String>,
    }

    fn decode(value: serde_json::Value) -> Result<Sample, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn absent_fields_stay_unset() {
        let sample = decode(json!({})).unwrap();
        assert!(sample.flag.is_none());
        assert!(sample.count.is_none());
        assert!(sample.latitude.is_none());
        assert!(sample.imported.is_none());
        assert!(sample.description.is_none());
        assert!(sample.path_alias.is_none());
    }

    #[test]
    fn nulls_stay_unset() {
        let sample = decode(json!({"flag": null, "count": null, "description": null})).unwrap();
        assert!(sample.flag.is_none());
        assert!(sample.count.is_none());
        assert!(sample.description.is_none());
    }

    #[test]
    fn flags() {
        assert_eq!(decode(json!({"flag": 1})).unwrap().flag, Some(true));
        assert_eq!(decode(json!({"flag": 0})).unwrap().flag, Some(false));
        assert_eq!(decode(json!({"flag": "1"})).unwrap().flag, Some(true));
        assert_eq!(decode(json!({"flag": true})).unwrap().flag, Some(true));
        assert!(decode(json!({"flag": "yes"})).is_err());
    }

    #[test]
    fn lenient_numbers() {
        let sample = decode(json!({"count": "75", "latitude": 37.271})).unwrap();
        assert_eq!(sample.count, Some(75));
        assert_eq!(sample.latitude, Some(37.271));

        let sample = decode(json!({"count": 0, "latitude": "-119.270"})).unwrap();
        assert_eq!(sample.count, Some(0));
        assert_eq!(sample.latitude, Some(-119.27));

        assert!(decode(json!({"count": ""})).unwrap().count.is_none());
        assert!(decode(json!({"count": "many"})).is_err());
        assert!(decode(json!({"count": true})).is_err());
        assert!(decode(json!({"count": -1})).is_err());
    }

    #[test]
    fn lenient_strings() {
        assert_eq!(
            decode(json!({"imported": 1407299391})).unwrap().imported.as_deref(),
            Some("1407299391")
        );
        assert_eq!(
            decode(json!({"imported": "1407299391"})).unwrap().imported.as_deref(),
            Some("1407299391")
        );
    }

    #[test]
    fn content_wrapper_is_unwrapped() {
        let sample = decode(json!({"description": {"_content": "Reflections"}})).unwrap();
        assert_eq!(sample.description.as_deref(), Some("Reflections"));

        let sample = decode(json!({"description": "Plain"})).unwrap();
        assert_eq!(sample.description.as_deref(), Some("Plain"));

        let sample = decode(json!({"description": {}})).unwrap();
        assert!(sample.description.is_none());

        assert!(decode(json!({"description": 5})).is_err());
    }

    #[test]
    fn empty_strings_are_unset() {
        assert!(decode(json!({"path_alias": ""})).unwrap().path_alias.is_none());
        assert_eq!(
            decode(json!({"path_alias": "jeremybrooks"})).unwrap().path_alias.as_deref(),
            Some("jeremybrooks")
        );
    }
}
