//! Local filesystem storage under `<upload_root>/uploads`

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{generate_file_name, normalize_file_name, web_path, FileStorage};
use crate::core::error::AppError;

pub struct LocalStorage {
    upload_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(upload_root: impl AsRef<Path>) -> Self {
        Self {
            upload_dir: upload_root.as_ref().join("uploads"),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, AppError> {
        normalize_file_name(name)
            .map(|n| self.upload_dir.join(n))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid file name '{}'", name)))
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn save(
        &self,
        data: Vec<u8>,
        original_filename: Option<&str>,
        _content_type: &str,
    ) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| {
                AppError::Internal(format!(
                    "Failed to create upload directory '{}': {}",
                    self.upload_dir.display(),
                    e
                ))
            })?;

        let name = generate_file_name(original_filename);
        let path = self.upload_dir.join(&name);

        tokio::fs::write(&path, &data).await.map_err(|e| {
            AppError::Internal(format!("Failed to store file '{}': {}", path.display(), e))
        })?;

        info!("Stored file '{}' ({} bytes)", name, data.len());
        Ok(web_path(&name))
    }

    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, AppError> {
        let Some(name) = normalize_file_name(file_name) else {
            return Ok(None);
        };

        match tokio::fs::read(self.upload_dir.join(name)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to read file '{}': {}",
                name, e
            ))),
        }
    }

    async fn delete(&self, web_path: &str) -> Result<(), AppError> {
        let path = self.path_for(web_path)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted file '{}'", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("File '{}' already absent", path.display());
                Ok(())
            }
            Err(e) => Err(AppError::Internal(format!(
                "Failed to delete file '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}
