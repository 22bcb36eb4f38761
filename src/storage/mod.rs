use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("empty file data")]
    EmptyFile,
}

/// On-disk store for uploaded bytes (profile images). Metadata lives in
/// the `files` table; this only moves bytes under the storage root.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root from `HRBANK_STORAGE_ROOT`, defaulting to `./storage`.
    pub fn from_env() -> Self {
        let root = std::env::var("HRBANK_STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string());
        Self::new(root)
    }

    /// Write `data` under the root with a collision-free name derived
    /// from the upload time and a sanitized file name. Returns the
    /// stored path for the metadata row.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        if data.is_empty() {
            return Err(StorageError::EmptyFile);
        }

        tokio::fs::create_dir_all(&self.root).await?;

        let stamp = chrono::Utc::now().timestamp_micros();
        let path = self
            .root
            .join(format!("{stamp}_{}", sanitize_file_name(file_name)));
        tokio::fs::write(&path, data).await?;

        Ok(path)
    }

    /// Best-effort removal of stored bytes; missing files are not an
    /// error (the metadata row is already gone).
    pub async fn delete(&self, path: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(Path::new(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keep only a safe subset of characters so the stored name can never
/// escape the root.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_separators() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name("photo.png"), "photo.png");
        assert_eq!(sanitize_file_name(""), "unnamed");
    }

    #[tokio::test]
    async fn save_and_delete_round_trip() {
        let root = std::env::temp_dir().join(format!(
            "hrbank-storage-test-{}",
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let storage = FileStorage::new(&root);

        let path = storage.save("avatar.png", b"png-bytes").await.unwrap();
        assert!(path.exists());

        storage.delete(path.to_str().unwrap()).await.unwrap();
        assert!(!path.exists());

        // Deleting again is not an error.
        storage.delete(path.to_str().unwrap()).await.unwrap();

        tokio::fs::remove_dir_all(&root).await.ok();
    }

    #[tokio::test]
    async fn empty_payload_is_rejected() {
        let storage = FileStorage::new(std::env::temp_dir());
        let err = storage.save("empty.bin", b"").await.unwrap_err();
        assert!(matches!(err, StorageError::EmptyFile));
    }
}
