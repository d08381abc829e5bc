/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::services::Client;
use crate::services::errors::FlickrError;
use serde::Deserialize;

/// Result of `flickr.photosets.comments.addComment`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CommentAdd {
    comment: Option<CommentRef>,
}

#[derive(Deserialize, Debug, Clone)]
struct CommentRef {
    id: String,
}

impl CommentAdd {
    pub fn comment_id(&self) -> Option<&str> {
        self.comment.as_ref().map(|c| c.id.as_str())
    }
}

impl Client {
    /// Adds a comment to a photoset, returning the new comment's id
    pub async fn add_photoset_comment(
        &self,
        photoset_id: &str,
        comment_text: &str,
    ) -> Result<String, FlickrError> {
        let params = vec![("photoset_id", photoset_id), ("comment_text", comment_text)];
        self.post::<CommentAdd>("flickr.photosets.comments.addComment", Some(&params))
            .await?
            .comment_id()
            .map(str::to_string)
            .ok_or(FlickrError::ResponseMissing())
    }
}
