//! Cloudinary signed-upload adapter.
//!
//! Uploads are signed server-side: the signed parameters are sorted,
//! joined as `k=v&k=v`, suffixed with the API secret and hashed with
//! SHA-256.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::MediaConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{MediaStorage, MediaUpload, StoredMedia};

/// Signature over already-sorted `params`.
pub fn sign_params(params: &[(&str, String)], secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

pub struct CloudinaryStorage {
    upload_url: String,
    api_key: String,
    api_secret: SecretString,
    folder: String,
    http_client: reqwest::Client,
}

impl CloudinaryStorage {
    pub fn new(config: &MediaConfig) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DomainError::new(ErrorCode::MediaUploadError, e.to_string()))?;
        Ok(Self {
            upload_url: config.upload_url(),
            api_key: config.api_key.clone(),
            api_secret: SecretString::new(config.api_secret.clone()),
            folder: config.folder.clone(),
            http_client,
        })
    }
}

fn upload_error(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::MediaUploadError, message)
}

#[async_trait]
impl MediaStorage for CloudinaryStorage {
    async fn upload(&self, file: MediaUpload) -> Result<StoredMedia, DomainError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        // Alphabetical order.
        let signed = [("folder", self.folder.clone()), ("timestamp", timestamp.clone())];
        let signature = sign_params(&signed, self.api_secret.expose_secret());

        let size = file.bytes.len();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| upload_error(format!("Invalid content type: {}", e)))?;
        let form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("folder", self.folder.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .http_client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| upload_error(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %error_text, file = %file.file_name, "Media upload rejected");
            return Err(upload_error(format!("Media host returned {}", status)));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| upload_error(format!("Failed to parse upload response: {}", e)))?;

        tracing::info!(public_id = %uploaded.public_id, bytes = size, "Media uploaded");

        Ok(StoredMedia {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_sha256_of_params_and_secret() {
        let params = [("folder", "gymhub".to_string()), ("timestamp", "1700000000".to_string())];
        let mut hasher = Sha256::new();
        hasher.update(b"folder=gymhub&timestamp=1700000000secret");
        let expected = hex::encode(hasher.finalize());
        assert_eq!(sign_params(&params, "secret"), expected);
    }

    #[test]
    fn signature_changes_with_secret() {
        let params = [("timestamp", "1".to_string())];
        assert_ne!(sign_params(&params, "a"), sign_params(&params, "b"));
    }
}
