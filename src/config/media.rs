//! Media host configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Media host configuration (signed uploads)
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub cloud_name: String,

    pub api_key: String,

    pub api_secret: String,

    /// Folder uploads are stored under
    #[serde(default = "default_folder")]
    pub folder: String,

    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl MediaConfig {
    /// Upload endpoint for auto-detected resource types (image or video).
    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}/auto/upload",
            self.api_base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cloud_name.is_empty() {
            return Err(ValidationError::MissingRequired("MEDIA_CLOUD_NAME"));
        }
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("MEDIA_API_KEY"));
        }
        if self.api_secret.is_empty() {
            return Err(ValidationError::MissingRequired("MEDIA_API_SECRET"));
        }
        if self.max_upload_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: default_folder(),
            max_upload_bytes: default_max_upload_bytes(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_folder() -> String {
    "gymhub".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_api_base_url() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}
