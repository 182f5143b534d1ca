//! Local directory storage for uploaded files.

use std::path::{Component, Path, PathBuf};

use alumni_config::UploadsConfig;
use tokio::fs;
use tracing::debug;

use crate::types::{ContentError, ContentResult};

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_name: String,
    /// Path relative to the upload root, `/`-separated.
    pub relative_path: String,
    pub public_url: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    public_path: String,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            root: PathBuf::from(&config.directory),
            public_path: config.public_path.trim_end_matches('/').to_string(),
            max_bytes: config.max_upload_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub async fn save(&self, folder: &str, file_name: &str, bytes: &[u8]) -> ContentResult<StoredFile> {
        if bytes.is_empty() {
            return Err(ContentError::validation("Uploaded file is empty"));
        }
        if bytes.len() > self.max_bytes {
            return Err(ContentError::validation(format!(
                "File exceeds the {} byte upload limit",
                self.max_bytes
            )));
        }

        let path = self.resolve(folder, file_name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;

        let relative_path = format!("{folder}/{file_name}");
        debug!(path = %path.display(), size = bytes.len(), "upload stored");
        Ok(StoredFile {
            file_name: file_name.to_string(),
            public_url: format!("{}/{}", self.public_path, relative_path),
            relative_path,
            size: bytes.len() as u64,
        })
    }

    pub async fn read(&self, folder: &str, file_name: &str) -> ContentResult<Vec<u8>> {
        let path = self.resolve(folder, file_name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(ContentError::FileNotFound)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Only single plain path segments are accepted, so nothing escapes the root.
    fn resolve(&self, folder: &str, file_name: &str) -> ContentResult<PathBuf> {
        for segment in [folder, file_name] {
            let mut components = Path::new(segment).components();
            let plain = matches!(components.next(), Some(Component::Normal(_)))
                && components.next().is_none();
            if !plain {
                return Err(ContentError::validation("Invalid file name"));
            }
        }
        Ok(self.root.join(folder).join(file_name))
    }
}

/// File extension, lower-cased, without the dot.
pub fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Keep alphanumerics, dots, dashes and underscores from a client file name.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
