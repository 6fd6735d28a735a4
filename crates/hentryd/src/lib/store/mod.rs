//! Where canonical records end up.
//!
//! The entry model itself never touches storage; callers persist records
//! through a [`Publisher`]. [`MemoryPublisher`] is the in-process backend used
//! by tests and development.

use bytes::Bytes;
use chrono::Local;
use tracing::debug;

use crate::entry::Entry;

mod error;
mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryPublisher;

const COMMIT_LOG: &str = "log.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct Stored {
    pub body: Bytes,
    pub content_type: String,
}

pub trait Publisher {
    /// Store `body` under `path`. Without a content type one is inferred from
    /// the path's extension.
    fn put(&mut self, path: &str, body: Bytes, content_type: Option<&str>) -> StoreResult<()>;

    /// Returns `StoreError::NotFound` for unknown paths.
    fn get(&self, path: &str) -> StoreResult<Stored>;

    fn exists(&self, path: &str) -> StoreResult<bool> {
        match self.get(path) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn list(&self) -> StoreResult<Vec<String>>;

    fn delete(&mut self, path: &str) -> StoreResult<()>;

    /// Appends a timestamped line to the commit log.
    fn commit(&mut self, msg: &str) -> StoreResult<()> {
        let log = if self.exists(COMMIT_LOG)? {
            String::from_utf8_lossy(&self.get(COMMIT_LOG)?.body).into_owned()
        } else {
            String::new()
        };
        let line = format!("{log}{} {msg}\n", Local::now().format("%Y-%m-%d %H:%M:%S"));
        self.put(COMMIT_LOG, Bytes::from(line), Some("text/plain"))
    }
}

/// Object-store style key: no leading, trailing or repeated slashes.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn infer_mimetype(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("html" | "htm") => "text/html",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("xml") => "application/xml",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

pub fn save_entry<P: Publisher + ?Sized>(
    publisher: &mut P,
    path: &str,
    entry: &Entry,
) -> StoreResult<()> {
    debug!(path, "save entry");
    let json = entry.to_json()?;
    publisher.put(path, Bytes::from(json), Some("application/json"))
}

pub fn load_entry<P: Publisher + ?Sized>(publisher: &P, path: &str) -> StoreResult<Entry> {
    debug!(path, "load entry");
    let stored = publisher.get(path)?;
    let record: serde_json::Value = serde_json::from_slice(&stored.body)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(Entry::from_record(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_paths() {
        assert_eq!(normalize_path("/2015//06/post/"), "2015/06/post");
        assert_eq!(normalize_path("post"), "post");
        assert_eq!(normalize_path("/"), "");
    }

    #[test]
    fn infers_mimetypes() {
        assert_eq!(infer_mimetype("index.html"), "text/html");
        assert_eq!(infer_mimetype("a/b/photo.JPG"), "image/jpeg");
        assert_eq!(infer_mimetype("entries/1.json"), "application/json");
        assert_eq!(infer_mimetype("post"), "application/octet-stream");
    }
}
