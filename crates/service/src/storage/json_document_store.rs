use std::{marker::PhantomData, path::{Path, PathBuf}};
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::debug;

use crate::errors::ServiceError;

/// Generic JSON file-backed document store.
///
/// Every `read` parses the file from scratch and every `write` replaces the
/// whole file; nothing is cached between calls. Writes go to `<file>.tmp`
/// first and are renamed over the target, so a reader sees either the old
/// or the new document, never a partial one.
#[derive(Clone, Debug)]
pub struct JsonDocumentStore<T> {
    file_path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonDocumentStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _doc: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read and parse the whole document.
    pub async fn read(&self) -> Result<T, ServiceError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::Storage(format!("read {}: {e}", self.file_path.display())))?;
        let doc = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Storage(format!("parse {}: {e}", self.file_path.display())))?;
        debug!(path = %self.file_path.display(), bytes = bytes.len(), "document loaded");
        Ok(doc)
    }

    /// Serialize `doc` (pretty, two-space indent) and replace the file with it.
    pub async fn write(&self, doc: &T) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(doc).map_err(|e| ServiceError::Storage(e.to_string()))?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &data)
            .await
            .map_err(|e| ServiceError::Storage(format!("write {}: {e}", tmp.display())))?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Storage(format!("replace {}: {e}", self.file_path.display())));
        }
        debug!(path = %self.file_path.display(), bytes = data.len(), "document written");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let ext = self.file_path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        self.file_path.with_extension(format!("{ext}.tmp"))
    }
}
