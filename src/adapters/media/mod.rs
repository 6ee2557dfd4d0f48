//! Media host adapters.

mod cloudinary;

pub use cloudinary::CloudinaryStorage;

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{MediaStorage, MediaUpload, StoredMedia};

/// Keeps uploads in memory and returns fake URLs.
#[derive(Default)]
pub struct InMemoryMediaStorage {
    uploads: Mutex<Vec<MediaUpload>>,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().map(|u| u.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn upload(&self, file: MediaUpload) -> Result<StoredMedia, DomainError> {
        let public_id = format!("test/{}", uuid::Uuid::new_v4().simple());
        let stored = StoredMedia {
            url: format!("https://media.test/{}/{}", public_id, file.file_name),
            public_id,
        };
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(file);
        }
        Ok(stored)
    }
}
