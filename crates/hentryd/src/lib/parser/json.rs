use bytes::Bytes;
use mime::Mime;
use tracing::debug;
use url::Url;

use crate::{
    mf2::Document,
    parser::{Parser, ParserError},
};

/// Accepts mf2 JSON already produced by an external parser.
pub struct JsonParser {
    url: Url,
    bytes: Bytes,
}

impl Parser for JsonParser {
    fn new(bytes: &Bytes, content_type: Option<&Mime>, url: &Url) -> Option<Box<Self>>
    where
        Self: Sized,
    {
        let is_json = content_type.is_some_and(|m| {
            m.essence_str().eq_ignore_ascii_case("application/mf2+json")
                || (m.type_() == mime::APPLICATION && m.subtype() == mime::JSON)
        });
        is_json.then(|| {
            Box::new(Self {
                url: url.clone(),
                bytes: bytes.clone(),
            })
        })
    }

    fn parse(&self) -> Result<Document, ParserError> {
        let (url_host, url_path) = crate::url_host_and_path(&self.url);
        debug!(parser = "json", %url_host, %url_path, "parse");
        serde_json::from_slice(&self.bytes).map_err(|e| ParserError::Upstream(anyhow::Error::new(e)))
    }
}
