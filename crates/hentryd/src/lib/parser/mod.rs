use bytes::Bytes;
use mime::Mime;
use thiserror::Error;
use url::Url;

use crate::mf2::Document;

pub mod html;
pub mod json;

pub use html::HtmlParser;
pub use json::JsonParser;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("body is not a supported document type")]
    Unsupported,
    #[error("no h-entry found on {url}")]
    NoEntry { url: String },
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// A source of microformats trees. `new` inspects the body and declines
/// content it cannot handle.
pub trait Parser {
    fn new(bytes: &Bytes, content_type: Option<&Mime>, url: &Url) -> Option<Box<Self>>
    where
        Self: Sized;

    fn parse(&self) -> Result<Document, ParserError>;
}

/// Picks the parser for a body: mf2 JSON when declared, otherwise HTML.
pub fn identify(bytes: &Bytes, content_type: Option<&Mime>, url: &Url) -> Option<Box<dyn Parser>> {
    JsonParser::new(bytes, content_type, url)
        .map(|p| p as Box<dyn Parser>)
        .or_else(|| HtmlParser::new(bytes, content_type, url).map(|p| p as Box<dyn Parser>))
}

/// Parses an HTML document, resolving relative URLs against `base_url`.
pub fn parse_html(html: &str, base_url: &Url) -> Result<Document, ParserError> {
    let bytes = Bytes::copy_from_slice(html.as_bytes());
    HtmlParser::new(&bytes, Some(&mime::TEXT_HTML_UTF_8), base_url)
        .ok_or(ParserError::Unsupported)?
        .parse()
}
