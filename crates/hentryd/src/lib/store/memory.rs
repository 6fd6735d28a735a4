use std::collections::BTreeMap;

use bytes::Bytes;
use tracing::debug;

use crate::store::{
    Publisher, Stored, infer_mimetype, normalize_path,
    error::{StoreError, StoreResult},
};

/// Objects kept in a map, listed in path order. Nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    objects: BTreeMap<String, Stored>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Publisher for MemoryPublisher {
    fn put(&mut self, path: &str, body: Bytes, content_type: Option<&str>) -> StoreResult<()> {
        let key = normalize_path(path);
        debug!(path = %key, "put");
        let content_type = content_type
            .unwrap_or_else(|| infer_mimetype(&key))
            .to_owned();
        self.objects.insert(key, Stored { body, content_type });
        Ok(())
    }

    fn get(&self, path: &str) -> StoreResult<Stored> {
        let key = normalize_path(path);
        debug!(path = %key, "get");
        self.objects
            .get(&key)
            .cloned()
            .ok_or(StoreError::NotFound(key))
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.objects.keys().cloned().collect())
    }

    fn delete(&mut self, path: &str) -> StoreResult<()> {
        let key = normalize_path(path);
        debug!(path = %key, "delete");
        self.objects
            .remove(&key)
            .map(|_| ())
            .ok_or(StoreError::NotFound(key))
    }
}
