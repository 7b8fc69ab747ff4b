//! In-memory [`FileStorage`] used by service and handler tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{generate_file_name, normalize_file_name, web_path, FileStorage};
use crate::core::error::AppError;

#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    saves: AtomicUsize,
    fail_deletes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent delete fail
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn insert(&self, name: &str, data: &[u8]) -> String {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), data.to_vec());
        web_path(name)
    }

    pub fn contains(&self, web_path: &str) -> bool {
        normalize_file_name(web_path)
            .is_some_and(|name| self.files.lock().unwrap().contains_key(name))
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn save(
        &self,
        data: Vec<u8>,
        original_filename: Option<&str>,
        _content_type: &str,
    ) -> Result<String, AppError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let name = generate_file_name(original_filename);
        self.files.lock().unwrap().insert(name.clone(), data);
        Ok(web_path(&name))
    }

    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(normalize_file_name(file_name)
            .and_then(|name| self.files.lock().unwrap().get(name).cloned()))
    }

    async fn delete(&self, web_path: &str) -> Result<(), AppError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("storage unavailable".to_string()));
        }
        if let Some(name) = normalize_file_name(web_path) {
            self.files.lock().unwrap().remove(name);
        }
        Ok(())
    }
}
