//! Media host port for gym and profile images.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::DomainError;

/// Content types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredMedia {
    /// Public HTTPS URL.
    pub url: String,
    /// Host-side identifier.
    pub public_id: String,
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// # Errors
    ///
    /// - `MediaUploadError` if the host rejects the upload
    async fn upload(&self, file: MediaUpload) -> Result<StoredMedia, DomainError>;
}
