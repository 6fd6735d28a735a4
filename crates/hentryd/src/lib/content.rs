use std::marker::PhantomData;

use bytes::Bytes;
use mime::Mime;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
    HTTP_CLIENT,
    page::Page,
    parser::{ParserError, identify},
};

pub trait ContentState {}
pub struct Content<S>
where
    S: ContentState,
{
    url: Url,
    bytes: Option<Bytes>,
    content_type: Option<Mime>,
    _state: PhantomData<S>,
}

impl<S> Content<S>
where
    S: ContentState,
{
    pub fn new(url: Url) -> Content<Unfetched> {
        Content {
            url,
            bytes: None,
            content_type: None,
            _state: PhantomData::<Unfetched>,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to fetch URL {url}: {error}")]
    FetchError { error: reqwest::Error, url: String },
    #[error("Empty body. URL: {url}")]
    EmptyBody { url: String },
    #[error("Failed to parse body. URL: {url}: {source}")]
    ParseError {
        url: String,
        #[source]
        source: ParserError,
    },
}

pub struct Unfetched;
impl ContentState for Unfetched {}
impl Content<Unfetched> {
    pub async fn fetch(self) -> Result<Content<Fetched>, ContentError> {
        let raw_response = HTTP_CLIENT
            .get(self.url.as_str())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| ContentError::FetchError {
                error,
                url: self.url.to_string(),
            })?;

        let content_type = raw_response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<Mime>().ok());

        let bytes = raw_response
            .bytes()
            .await
            .map_err(|error| ContentError::FetchError {
                error,
                url: self.url.to_string(),
            })?;

        let Content { url, .. } = self;
        Ok(Content::from_parts(url, bytes, content_type))
    }
}

pub struct Fetched;
impl ContentState for Fetched {}
impl Content<Fetched> {
    /// A body obtained elsewhere, e.g. posted by a client.
    pub fn from_parts(url: Url, bytes: Bytes, content_type: Option<Mime>) -> Self {
        Content {
            url,
            bytes: Some(bytes),
            content_type,
            _state: PhantomData::<Fetched>,
        }
    }

    pub fn parse(self) -> Result<Page, ContentError> {
        let bytes = self
            .bytes
            .as_ref()
            .ok_or_else(|| ContentError::EmptyBody {
                url: self.url.to_string(),
            })?;
        info!(len = bytes.len(), content_type = ?self.content_type, "parsing body");

        let parser = identify(bytes, self.content_type.as_ref(), &self.url).ok_or_else(|| {
            ContentError::ParseError {
                url: self.url.to_string(),
                source: ParserError::Unsupported,
            }
        })?;
        let document = parser.parse().map_err(|source| ContentError::ParseError {
            url: self.url.to_string(),
            source,
        })?;

        Ok(Page::new(self.url, document))
    }
}
