//! MinIO/S3-compatible storage backend
//!
//! Objects are kept under `<prefix>/<name>`; the web path handed back to
//! callers stays `/uploads/<name>` so switching backends does not change
//! stored profile data.
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::{generate_file_name, normalize_file_name, web_path, FileStorage};
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    prefix: String,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration, creating the bucket
    /// if it doesn't exist
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            prefix: config.prefix.trim_matches('/').to_string(),
        };

        client.ensure_bucket_exists().await?;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.prefix
        );

        Ok(client)
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        match self.create_bucket().await {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
                Ok(())
            }
        }
    }

    async fn create_bucket(&self) -> Result<(), AppError> {
        Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        .map_err(|e| {
            AppError::Internal(format!(
                "Failed to create bucket '{}': {}",
                self.bucket.name(),
                e
            ))
        })?;

        Ok(())
    }

    /// Object key for a stored file name
    fn key_for(&self, file_name: &str) -> String {
        object_key(&self.prefix, file_name)
    }
}

fn object_key(prefix: &str, file_name: &str) -> String {
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", prefix, file_name)
    }
}

fn is_missing_object(error: &str) -> bool {
    error.contains("404") || error.contains("NoSuchKey")
}

#[async_trait]
impl FileStorage for MinIOClient {
    async fn save(
        &self,
        data: Vec<u8>,
        original_filename: Option<&str>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let name = generate_file_name(original_filename);
        let key = self.key_for(&name);

        self.bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to upload file '{}': {}", key, e)))?;

        info!(
            "Uploaded file '{}' to bucket '{}' ({} bytes)",
            key,
            self.bucket.name(),
            data.len()
        );
        Ok(web_path(&name))
    }

    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, AppError> {
        let Some(name) = normalize_file_name(file_name) else {
            return Ok(None);
        };
        let key = self.key_for(name);

        match self.bucket.get_object(&key).await {
            Ok(response) if response.status_code() == 404 => Ok(None),
            Ok(response) => Ok(Some(response.to_vec())),
            Err(e) if is_missing_object(&e.to_string()) => Ok(None),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to download file '{}': {}",
                key, e
            ))),
        }
    }

    async fn delete(&self, web_path: &str) -> Result<(), AppError> {
        let name = normalize_file_name(web_path)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid file name '{}'", web_path)))?;
        let key = self.key_for(name);

        self.bucket
            .delete_object(&key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete file '{}': {}", key, e)))?;

        debug!(
            "Deleted file '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(())
    }
}
