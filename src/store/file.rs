//! Local file system blob store.
//!
//! Each blob is a `<name>.json` file under the base directory. Writes land in
//! a sibling temp file first and are renamed into place, so a reader sees
//! either the previous value or the new one, never a torn write.

use super::{BlobStore, StoreError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Blob store backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    base_path: PathBuf,
}

impl FileBlobStore {
    /// Open the store at `base_path`, creating the directory if needed.
    pub async fn open(base_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = base_path.as_ref().to_path_buf();

        fs::create_dir_all(&path)
            .await
            .map_err(|e| StoreError::io(&path.display().to_string(), e))?;

        info!("File blob store initialized at: {}", path.display());
        Ok(Self { base_path: path })
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", name))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!(".{}.json.tmp", name))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.blob_path(name)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                Err(StoreError::malformed(name, "blob is not valid UTF-8"))
            }
            Err(e) => Err(StoreError::io(name, e)),
        }
    }

    async fn set(&self, name: &str, value: String) -> Result<(), StoreError> {
        let temp_path = self.temp_path(name);

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| StoreError::io(name, e))?;
        file.write_all(value.as_bytes())
            .await
            .map_err(|e| StoreError::io(name, e))?;
        file.sync_all().await.map_err(|e| StoreError::io(name, e))?;
        drop(file);

        fs::rename(&temp_path, self.blob_path(name))
            .await
            .map_err(|e| StoreError::io(name, e))?;

        debug!(blob = name, bytes = value.len(), "Blob written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_blob_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::open(temp_dir.path()).await.unwrap();

        // First run: nothing written yet
        assert_eq!(store.get("keys").await.unwrap(), None);

        store.set("keys", r#"[{"id":"1"}]"#.to_string()).await.unwrap();
        assert_eq!(
            store.get("keys").await.unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );

        // No temp file left behind
        assert!(!temp_dir.path().join(".keys.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileBlobStore::open(temp_dir.path()).await.unwrap();
            store.set("checkoutLogs", "[]".to_string()).await.unwrap();
        }

        let reopened = FileBlobStore::open(temp_dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("checkoutLogs").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_open_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        FileBlobStore::open(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_non_utf8_blob_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::open(temp_dir.path()).await.unwrap();
        std::fs::write(temp_dir.path().join("keys.json"), [0xff, 0xfe, 0x00]).unwrap();

        let err = store.get("keys").await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
