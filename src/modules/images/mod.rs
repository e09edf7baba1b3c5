//! Review photo pipeline: validate, normalize to JPEG and store

mod orientation;
mod processor;
mod review_image_store;

use async_trait::async_trait;

use crate::core::error::Result;

pub use processor::ImageProcessor;
pub use review_image_store::ReviewImageStore;

/// A photo received in a multipart upload, not yet processed
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A decoded and re-encoded photo, ready to be written
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub jpeg: Vec<u8>,
    pub source_size: usize,
}

/// Location of a written photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub key: String,
    pub url: String,
}

/// Photo storage. Processing writes nothing, so a submission can reject a bad
/// photo before any object exists.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn process(&self, image: UploadedImage) -> Result<ProcessedImage>;

    async fn store(&self, owner: &str, image: ProcessedImage) -> Result<StoredImage>;

    async fn remove(&self, key: &str) -> Result<()>;
}
