/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::services::errors::FlickrError;
use crate::services::macros::flag_accessors;
use crate::services::parsers::{
    from_content, from_empty_str_to_none, from_flag, from_lenient_number, from_lenient_string,
};
use crate::services::{Client, PhotoSize};
use async_stream::try_stream;
use chrono::{DateTime, NaiveDateTime, Utc};
use futures::Stream;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use strum::IntoEnumIterator;

pub(crate) const NUM_TO_GET: usize = 100;
pub(crate) const NUM_TO_GET_STRING: &str = "100";

/// A photo as returned in photo lists (`flickr.photos.search`, `flickr.photos.getRecent`, ..).
///
/// Which fields are present depends on the `extras` requested, so everything is optional.
/// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.photos.search.html) for
/// more details on the individual fields.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(from = "RawPhoto")]
pub struct Photo {
    pub identity: PhotoIdentity,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub geo: Geo,
    pub timestamps: Timestamps,
    pub sizes: SizeVariants,
}

#[derive(Debug, Clone, Default)]
pub struct PhotoIdentity {
    pub photo_id: Option<String>,
    pub secret: Option<String>,
    pub server: Option<String>,
    pub farm: Option<u32>,
    pub owner: Option<String>,
    pub username: Option<String>,
    pub owner_name: Option<String>,
    pub title: Option<String>,
    pub path_alias: Option<String>,
    pub icon_server: Option<String>,
    pub icon_farm: Option<u32>,
    pub license: Option<u32>,
    pub original_secret: Option<String>,
    pub original_format: Option<String>,
    pub views: Option<u64>,
    pub tags: Option<String>,
    pub machine_tags: Option<String>,
    pub media: Option<String>,
    pub media_status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Visibility {
    pub is_public: Option<bool>,
    pub is_friend: Option<bool>,
    pub is_family: Option<bool>,
    pub is_primary: Option<bool>,
}

flag_accessors!(Visibility {
    is_public,
    is_friend,
    is_family,
    /// Primary photo of the photoset it was listed from
    is_primary,
});

#[derive(Debug, Clone, Default)]
pub struct Geo {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy: Option<u32>,
    pub context: Option<u32>,
    pub place_id: Option<String>,
    pub woe_id: Option<String>,
    pub is_family: Option<bool>,
    pub is_friend: Option<bool>,
    pub is_contact: Option<bool>,
    pub is_public: Option<bool>,
}

flag_accessors!(Geo {
    is_family,
    is_friend,
    is_contact,
    is_public,
});

impl Geo {
    /// Latitude/longitude when the photo is geotagged. The API sends `0` for both otherwise.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 || lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Timestamps {
    /// Unix time
    pub date_upload: Option<String>,
    /// Unix time
    pub last_update: Option<String>,
    /// `YYYY-MM-DD hh:mm:ss` in the photographer's local time
    pub date_taken: Option<String>,
    pub date_taken_granularity: Option<u32>,
}

// Wire shape of a photo. Every scalar sits at the top level so a decode error keeps the
// field's name in its path; only the size variants are collected from what is left.
#[derive(Deserialize)]
struct RawPhoto {
    #[serde(default, deserialize_with = "from_lenient_string")]
    id: Option<String>,
    secret: Option<String>,
    #[serde(default, deserialize_with = "from_lenient_string")]
    server: Option<String>,
    #[serde(default, deserialize_with = "from_lenient_number")]
    farm: Option<u32>,
    owner: Option<String>,
    username: Option<String>,
    ownername: Option<String>,
    title: Option<String>,
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pathalias: Option<String>,
    #[serde(default, deserialize_with = "from_lenient_string")]
    iconserver: Option<String>,
    #[serde(default, deserialize_with = "from_lenient_number")]
    iconfarm: Option<u32>,
    #[serde(default, deserialize_with = "from_lenient_number")]
    license: Option<u32>,
    originalsecret: Option<String>,
    originalformat: Option<String>,
    #[serde(default, deserialize_with = "from_lenient_number")]
    views: Option<u64>,
    tags: Option<String>,
    machine_tags: Option<String>,
    media: Option<String>,
    media_status: Option<String>,

    #[serde(default, deserialize_with = "from_content")]
    description: Option<String>,

    #[serde(default, deserialize_with = "from_flag")]
    ispublic: Option<bool>,
    #[serde(default, deserialize_with = "from_flag")]
    isfriend: Option<bool>,
    #[serde(default, deserialize_with = "from_flag")]
    isfamily: Option<bool>,
    #[serde(default, deserialize_with = "from_flag")]
    isprimary: Option<bool>,

    #[serde(default, deserialize_with = "from_lenient_number")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "from_lenient_number")]
    longitude: Option<f64>,
    #[serde(default, deserialize_with = "from_lenient_number")]
    accuracy: Option<u32>,
    #[serde(default, deserialize_with = "from_lenient_number")]
    context: Option<u32>,
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    place_id: Option<String>,
    #[serde(default, deserialize_with = "from_lenient_string")]
    woeid: Option<String>,
    #[serde(default, deserialize_with = "from_flag")]
    geo_is_family: Option<bool>,
    #[serde(default, deserialize_with = "from_flag")]
    geo_is_friend: Option<bool>,
    #[serde(default, deserialize_with = "from_flag")]
    geo_is_contact: Option<bool>,
    #[serde(default, deserialize_with = "from_flag")]
    geo_is_public: Option<bool>,

    #[serde(default, deserialize_with = "from_lenient_string")]
    dateupload: Option<String>,
    #[serde(default, deserialize_with = "from_lenient_string")]
    lastupdate: Option<String>,
    datetaken: Option<String>,
    #[serde(default, deserialize_with = "from_lenient_number")]
    datetakengranularity: Option<u32>,

    #[serde(flatten)]
    sizes: SizeVariants,
}

impl From<RawPhoto> for Photo {
    fn from(raw: RawPhoto) -> Self {
        Self {
            identity: PhotoIdentity {
                photo_id: raw.id,
                secret: raw.secret,
                server: raw.server,
                farm: raw.farm,
                owner: raw.owner,
                username: raw.username,
                owner_name: raw.ownername,
                title: raw.title,
                path_alias: raw.pathalias,
                icon_server: raw.iconserver,
                icon_farm: raw.iconfarm,
                license: raw.license,
                original_secret: raw.originalsecret,
                original_format: raw.originalformat,
                views: raw.views,
                tags: raw.tags,
                machine_tags: raw.machine_tags,
                media: raw.media,
                media_status: raw.media_status,
            },
            description: raw.description,
            visibility: Visibility {
                is_public: raw.ispublic,
                is_friend: raw.isfriend,
                is_family: raw.isfamily,
                is_primary: raw.isprimary,
            },
            geo: Geo {
                latitude: raw.latitude,
                longitude: raw.longitude,
                accuracy: raw.accuracy,
                context: raw.context,
                place_id: raw.place_id,
                woe_id: raw.woeid,
                is_family: raw.geo_is_family,
                is_friend: raw.geo_is_friend,
                is_contact: raw.geo_is_contact,
                is_public: raw.geo_is_public,
            },
            timestamps: Timestamps {
                date_upload: raw.dateupload,
                last_update: raw.lastupdate,
                date_taken: raw.datetaken,
                date_taken_granularity: raw.datetakengranularity,
            },
            sizes: raw.sizes,
        }
    }
}

impl Timestamps {
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.date_upload.as_deref())
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.last_update.as_deref())
    }

    pub fn taken_at(&self) -> Option<NaiveDateTime> {
        self.date_taken
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
    }
}

fn unix_to_utc(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Url and dimensions of one size of a photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeVariant {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// All size variants present in the response, keyed by size
#[derive(Debug, Clone, Default)]
pub struct SizeVariants {
    variants: HashMap<PhotoSize, SizeVariant>,
    /// `o_width`/`o_height`, sent even when `url_o` is not
    pub original_dimensions: Option<(u32, u32)>,
}

impl SizeVariants {
    pub fn get(&self, size: PhotoSize) -> Option<&SizeVariant> {
        self.variants.get(&size)
    }

    /// The biggest variant that was returned
    pub fn largest(&self) -> Option<(PhotoSize, &SizeVariant)> {
        PhotoSize::iter()
            .rev()
            .find_map(|size| self.variants.get(&size).map(|v| (size, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

fn dimension<E: serde::de::Error>(
    fields: &HashMap<String, Value>,
    name: &str,
) -> Result<Option<u32>, E> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => from_lenient_number::<_, u32>(value.clone())
            .map_err(|e| E::custom(format!("{name}: {e}"))),
    }
}

impl<'de> Deserialize<'de> for SizeVariants {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields: HashMap<String, Value> = HashMap::deserialize(deserializer)?;

        let mut variants = HashMap::new();
        for size in PhotoSize::iter() {
            let suffix = size.suffix();
            let url_field = format!("url_{suffix}");
            let url = match fields.get(&url_field) {
                None | Some(Value::Null) => continue,
                Some(Value::String(url)) if url.is_empty() => continue,
                Some(Value::String(url)) => url.clone(),
                Some(other) => {
                    return Err(D::Error::custom(format!(
                        "{url_field}: expected a string, found {other}"
                    )));
                }
            };
            let width = dimension::<D::Error>(&fields, &format!("width_{suffix}"))?;
            let height = dimension::<D::Error>(&fields, &format!("height_{suffix}"))?;
            variants.insert(size, SizeVariant { url, width, height });
        }

        let original_dimensions = match (
            dimension::<D::Error>(&fields, "o_width")?,
            dimension::<D::Error>(&fields, "o_height")?,
        ) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        };

        Ok(Self {
            variants,
            original_dimensions,
        })
    }
}

impl std::fmt::Display for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "title: {}, id: {}",
            self.identity.title.as_deref().unwrap_or_default(),
            self.identity.photo_id.as_deref().unwrap_or_default()
        )
    }
}

/// One page of a photo list
#[derive(Deserialize, Debug, Clone)]
pub struct PhotoPage {
    #[serde(default, deserialize_with = "from_lenient_number")]
    pub page: Option<u32>,

    #[serde(default, deserialize_with = "from_lenient_number")]
    pub pages: Option<u32>,

    #[serde(default, rename = "perpage", deserialize_with = "from_lenient_number")]
    pub per_page: Option<u32>,

    #[serde(default, deserialize_with = "from_lenient_number")]
    pub total: Option<u64>,

    #[serde(default, rename = "photo")]
    pub photos: Vec<Photo>,
}

impl PhotoPage {
    fn is_last(&self) -> bool {
        match (self.page, self.pages) {
            (Some(page), Some(pages)) => page >= pages,
            _ => {
                let per_page = self.per_page.map_or(NUM_TO_GET, |n| n as usize);
                self.photos.len() < per_page
            }
        }
    }
}

// Expected response for a photo list request
#[derive(Deserialize, Debug)]
pub(crate) struct PhotosResponse {
    pub(crate) photos: PhotoPage,
}

impl Client {
    /// Retrieves one page of a photo list method such as `flickr.photos.search`
    pub async fn photo_page(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<PhotoPage, FlickrError> {
        Ok(self.get::<PhotosResponse>(method, Some(params)).await?.photos)
    }

    /// Walks the latest public photos page by page.
    ///
    /// `extras` are passed through (e.g. `["description", "url_z", "geo"]`).
    pub fn recent_photos(&self, extras: &[&str]) -> impl Stream<Item = Result<Photo, FlickrError>> {
        let extras = extras.join(",");

        try_stream! {
            let mut page: u32 = 1;
            loop {
                let page_str = page.to_string();
                let mut params = vec![("per_page", NUM_TO_GET_STRING), ("page", page_str.as_str())];
                if !extras.is_empty() {
                    params.push(("extras", extras.as_str()));
                }

                let resp = self.photo_page("flickr.photos.getRecent", &params).await?;
                let is_done = resp.is_last() || resp.photos.is_empty();
                for photo in resp.photos {
                    yield photo
                }

                if is_done {
                    break;
                }
                page += 1;
            }
        }
    }
}
