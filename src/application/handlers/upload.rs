//! UploadMediaHandler - Validates and forwards image uploads.

use std::sync::Arc;

use crate::domain::foundation::{CurrentUser, DomainError};
use crate::ports::{MediaStorage, MediaUpload, StoredMedia, ALLOWED_CONTENT_TYPES};

pub struct UploadMediaHandler {
    storage: Arc<dyn MediaStorage>,
    max_bytes: usize,
}

impl UploadMediaHandler {
    pub fn new(storage: Arc<dyn MediaStorage>, max_bytes: usize) -> Self {
        Self { storage, max_bytes }
    }

    pub async fn handle(&self, user: &CurrentUser, file: MediaUpload) -> Result<StoredMedia, DomainError> {
        if file.bytes.is_empty() {
            return Err(DomainError::validation("file", "File is empty"));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(DomainError::validation(
                "file",
                format!("File exceeds {} bytes", self.max_bytes),
            ));
        }
        if !ALLOWED_CONTENT_TYPES.contains(&file.content_type.as_str()) {
            return Err(DomainError::validation(
                "file",
                format!("Unsupported content type '{}'", file.content_type),
            ));
        }

        let size = file.bytes.len();
        let stored = self.storage.upload(file).await?;
        tracing::info!(user_id = %user.id, public_id = %stored.public_id, size, "Media uploaded");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::media::InMemoryMediaStorage;
    use crate::application::handlers::test_support::World;
    use crate::domain::foundation::{ErrorCode, Role};

    fn upload(content_type: &str, size: usize) -> MediaUpload {
        MediaUpload {
            file_name: "front.jpg".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![7u8; size],
        }
    }

    #[tokio::test]
    async fn validates_before_uploading() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let storage = Arc::new(InMemoryMediaStorage::new());
        let handler = UploadMediaHandler::new(storage.clone(), 1024);

        for bad in [upload("image/jpeg", 0), upload("image/jpeg", 2048), upload("application/pdf", 10)] {
            let err = handler.handle(&owner, bad).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
        }
        assert_eq!(storage.upload_count(), 0);

        let stored = handler.handle(&owner, upload("image/png", 512)).await.unwrap();
        assert!(stored.url.starts_with("https://"));
        assert_eq!(storage.upload_count(), 1);
    }
}
