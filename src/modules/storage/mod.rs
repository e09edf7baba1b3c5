//! Object storage for uploaded review photos

mod minio_client;

pub use minio_client::MinIOClient;
