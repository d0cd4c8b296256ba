use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::product::errors::ImageStoreError;
use crate::domain::product::ports::ImageStore;

/// Image store writing into a single local directory.
///
/// The same directory is served read-only under `/uploads/`.
pub struct FilesystemImageStore {
    directory: PathBuf,
}

impl FilesystemImageStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ImageStoreError> {
        let file_name = format!("{}.{}", Uuid::new_v4().simple(), extension);

        tokio::fs::write(self.directory.join(&file_name), bytes)
            .await
            .map_err(|e| ImageStoreError::WriteFailed {
                file_name: file_name.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(file_name = %file_name, size = bytes.len(), "Image stored");

        Ok(file_name)
    }

    async fn remove(&self, file_name: &str) -> Result<(), ImageStoreError> {
        tokio::fs::remove_file(self.directory.join(file_name))
            .await
            .map_err(|e| ImageStoreError::RemoveFailed {
                file_name: file_name.to_string(),
                reason: e.to_string(),
            })
    }
}
