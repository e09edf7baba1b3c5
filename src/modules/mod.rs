//! Infrastructure components for external integrations
//!
//! Object storage and the image pipeline that feeds it.

pub mod images;
pub mod storage;
