//! Upload file storage.
//!
//! Stores uploaded files (gallery images, sponsor logos, guideline PDFs)
//! under a configurable directory. Names on disk are generated uuid-hex
//! strings, so client-supplied names never touch the filesystem.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::config::UploadsConfig;

/// Error type for file storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file name")]
    InvalidFileName,
}

/// File storage rooted at the configured uploads directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a new storage rooted at the configured directory.
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
        }
    }

    #[cfg(test)]
    fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Save bytes under a fresh uuid-hex name with the given extension.
    /// Returns the generated file name.
    pub async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, StorageError> {
        fs::create_dir_all(&self.root).await?;

        let filename = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let path = self.root.join(&filename);
        fs::write(&path, bytes).await?;

        tracing::debug!(file = %filename, size = bytes.len(), "Stored upload");
        Ok(filename)
    }

    /// Read a stored file. Returns None when it does not exist.
    pub async fn load(&self, filename: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(filename)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file. Missing files are not an error.
    pub async fn delete(&self, filename: &str) -> Result<(), StorageError> {
        let path = self.path_for(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a stored file name to its on-disk path.
    ///
    /// Rejects anything that is not a plain file name, which keeps
    /// client-supplied values from escaping the uploads directory.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if !is_plain_filename(filename) {
            return Err(StorageError::InvalidFileName);
        }
        Ok(self.root.join(filename))
    }
}

/// True for names without separators or parent components.
fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// Map an accepted image content type to the stored file extension.
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// True for the PDF content type accepted on guideline uploads.
pub fn is_pdf(content_type: &str) -> bool {
    content_type == "application/pdf"
}

/// Content type for serving a stored file, derived from its extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> FileStorage {
        let dir = std::env::temp_dir().join(format!("gs-uploads-{}", Uuid::new_v4().simple()));
        FileStorage::with_root(dir)
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let storage = temp_storage();
        let filename = storage.save("png", b"not-really-a-png").await.unwrap();

        assert!(filename.ends_with(".png"));
        assert_eq!(filename.len(), 32 + ".png".len());

        let loaded = storage.load(&filename).await.unwrap();
        assert_eq!(loaded.as_deref(), Some(b"not-really-a-png".as_ref()));
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let storage = temp_storage();
        // Root never created, so nothing can exist
        let loaded = storage.load("missing.png").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let storage = temp_storage();
        let filename = storage.save("pdf", b"%PDF-1.4").await.unwrap();

        storage.delete(&filename).await.unwrap();
        storage.delete(&filename).await.unwrap();

        assert!(storage.load(&filename).await.unwrap().is_none());
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let storage = temp_storage();
        assert!(storage.path_for("../etc/passwd").is_err());
        assert!(storage.path_for("a/b.png").is_err());
        assert!(storage.path_for("a\\b.png").is_err());
        assert!(storage.path_for("..").is_err());
        assert!(storage.path_for("").is_err());
        assert!(storage.path_for("plain.png").is_ok());
    }

    #[test]
    fn test_image_extension_mapping() {
        assert_eq!(image_extension("image/jpeg"), Some("jpg"));
        assert_eq!(image_extension("image/png"), Some("png"));
        assert_eq!(image_extension("image/webp"), Some("webp"));
        assert_eq!(image_extension("image/gif"), Some("gif"));
        assert_eq!(image_extension("application/pdf"), None);
        assert_eq!(image_extension("text/html"), None);
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf("application/pdf"));
        assert!(!is_pdf("image/png"));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.svg"), "image/svg+xml");
        assert_eq!(content_type_for("a.pdf"), "application/pdf");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
