use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::images::{
    ImageProcessor, ImageStore, ProcessedImage, StoredImage, UploadedImage,
};
use crate::modules::storage::MinIOClient;

/// Normalizes review photos and uploads them to the public area of the bucket
pub struct ReviewImageStore {
    storage: Arc<MinIOClient>,
    processor: ImageProcessor,
}

impl ReviewImageStore {
    pub fn new(storage: Arc<MinIOClient>, processor: ImageProcessor) -> Self {
        Self { storage, processor }
    }
}

#[async_trait]
impl ImageStore for ReviewImageStore {
    async fn process(&self, image: UploadedImage) -> Result<ProcessedImage> {
        let processor = self.processor.clone();
        let source_size = image.data.len();
        let jpeg = tokio::task::spawn_blocking(move || processor.process(&image.data))
            .await
            .map_err(|e| AppError::Internal(format!("Image processing task failed: {}", e)))??;

        Ok(ProcessedImage { jpeg, source_size })
    }

    async fn store(&self, owner: &str, image: ProcessedImage) -> Result<StoredImage> {
        let key = self.storage.public_key(&object_path(owner, Uuid::new_v4()));
        self.storage.upload(&key, &image.jpeg, "image/jpeg").await?;

        tracing::debug!(
            "Stored review photo {} ({} -> {} bytes)",
            key,
            image.source_size,
            image.jpeg.len()
        );

        let url = self.storage.public_url(&key);
        Ok(StoredImage { key, url })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.storage.delete(key).await
    }
}

/// `reviews/{owner}/{id}.jpg`, with the owner reduced to a safe path segment
fn object_path(owner: &str, id: Uuid) -> String {
    let owner: String = owner
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("reviews/{}/{}.jpg", owner, id)
}
